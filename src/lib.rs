//! Payroll engine for salon staff
//!
//! This crate turns a pay period's timecard and point-of-sale exports into a
//! payroll report: hourly pay, commission against hourly for senior
//! stylists, tips, service addings and the stylist's share of customer
//! discounts, each with an audit trail.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod report;
pub mod run;
pub mod sources;
