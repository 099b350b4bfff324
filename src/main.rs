//! Command line entry point for the salon payroll engine.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use salon_payroll::api::{AppState, create_router};
use salon_payroll::calculation::names_match;
use salon_payroll::config::ConfigLoader;
use salon_payroll::context::RunContext;
use salon_payroll::models::PayrollReport;
use salon_payroll::report::{ReportFormat, write_report};
use salon_payroll::run::PayrollRunner;
use salon_payroll::sources::{
    CsvDirectorySource, TabularSource, TimecardSource, XlsxTimecard, load_adjustments,
};

#[derive(Parser)]
#[command(
    name = "salon-payroll",
    version,
    about = "Salon payroll from timecards and point-of-sale exports."
)]
struct Cli {
    /// Payroll configuration file
    #[arg(long, global = true, default_value = "payroll.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run payroll for a timecard and write the report.
    Run {
        /// Timecard workbook (.xlsx)
        #[arg(long)]
        timecard: PathBuf,
        /// Report destination
        #[arg(long, default_value = "payroll_report.csv")]
        output: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Manual adjustments (.yaml or .json)
        #[arg(long)]
        adjustments: Option<PathBuf>,
        /// Write the report even when employees are unresolved
        #[arg(long = "acknowledge-unresolved")]
        acknowledge_unresolved: bool,
    },
    /// Show how one employee's pay was derived.
    Breakdown {
        /// Timecard workbook (.xlsx)
        #[arg(long)]
        timecard: PathBuf,
        /// Employee name; the first name is enough
        #[arg(long)]
        employee: String,
        /// Manual adjustments (.yaml or .json)
        #[arg(long)]
        adjustments: Option<PathBuf>,
    },
    /// Summarize hours on a timecard.
    Timecard {
        /// Timecard workbook (.xlsx)
        timecard: PathBuf,
    },
    /// List the tables under the storage root.
    Tables,
    /// Serve the HTTP API.
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            timecard,
            output,
            format,
            adjustments,
            acknowledge_unresolved,
        } => {
            let report = generate(&cli.config, &timecard, adjustments.as_deref())?;
            print_summary(&report);
            for employee in &report.unresolved {
                warn!(
                    employee = %employee.name,
                    reason = ?employee.reason,
                    hours = %employee.hours,
                    "Unresolved employee"
                );
            }
            let finalized = report.finalize(acknowledge_unresolved)?;
            let written = write_report(&finalized, &output, format.into())
                .with_context(|| format!("writing report to {}", output.display()))?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        Command::Breakdown {
            timecard,
            employee,
            adjustments,
        } => {
            let report = generate(&cli.config, &timecard, adjustments.as_deref())?;
            let result = report
                .results
                .iter()
                .find(|r| names_match(&employee, &r.employee_name))
                .ok_or_else(|| anyhow!("no pay result for '{}'", employee))?;

            println!("{} ({})", result.employee_name, result.employee_type);
            for step in &result.audit_steps {
                println!(
                    "{:>2}. {} [{}]\n    {}\n    -> {}",
                    step.step_number, step.rule_name, step.rule_id, step.reasoning, step.output
                );
            }
            for warning in &result.warnings {
                println!("warning {}: {}", warning.code, warning.message);
            }
            println!("Final pay: {:.2}", result.final_pay);
        }
        Command::Timecard { timecard } => {
            let timecard = XlsxTimecard::new(&timecard)
                .read()
                .with_context(|| format!("reading timecard {}", timecard.display()))?;
            let mut ctx = RunContext::new();
            println!(
                "Pay period {} to {} (pay date {})",
                timecard.pay_period.start_date(),
                timecard.pay_period.end_date(),
                timecard.pay_period.pay_date()
            );
            for row in timecard.summary(&mut ctx) {
                println!(
                    "{:<24} {:<16} {:>8.2} h  {:>2} day(s), {} with hours",
                    row.employee,
                    row.role.as_deref().unwrap_or("-"),
                    row.total_hours,
                    row.days_worked,
                    row.worked_days_with_hours
                );
            }
        }
        Command::Tables => {
            let loader = load_config(&cli.config)?;
            let source = CsvDirectorySource::new(loader.storage_root());
            for table in source.list_tables()? {
                println!("{}", table);
            }
        }
        Command::Serve { bind } => {
            let loader = load_config(&cli.config)?;
            let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
            runtime.block_on(async {
                let listener = tokio::net::TcpListener::bind(&bind)
                    .await
                    .with_context(|| format!("binding {}", bind))?;
                info!(bind = %bind, "Serving payroll API");
                axum::serve(listener, create_router(AppState::new(loader)))
                    .await
                    .context("serving payroll API")
            })?;
        }
    }
    Ok(())
}

fn generate(
    config: &Path,
    timecard: &Path,
    adjustments: Option<&Path>,
) -> Result<PayrollReport> {
    let loader = load_config(config)?;
    let adjustments = match adjustments {
        Some(path) => load_adjustments(path).context("loading adjustments")?,
        None => Vec::new(),
    };
    let tables = CsvDirectorySource::new(loader.storage_root());
    let runner = PayrollRunner::new(loader.config().clone());
    runner
        .generate(&XlsxTimecard::new(timecard), &tables, adjustments)
        .context("generating payroll")
}

fn load_config(path: &Path) -> Result<ConfigLoader> {
    ConfigLoader::load(path).with_context(|| format!("loading config {}", path.display()))
}

fn print_summary(report: &PayrollReport) {
    println!(
        "Pay period {} to {}, pay date {}",
        report.pay_period.start_date(),
        report.pay_period.end_date(),
        report.pay_date
    );
    for result in &report.results {
        println!(
            "{:<24} {:<22} {:>8.2} h {:>10.2}",
            result.employee_name,
            result.employee_type.as_str(),
            result.total_hours,
            result.final_pay
        );
    }
    for (label, value) in report.summary_rows() {
        println!("{}: {}", label, value);
    }
    if !report.warnings.is_empty() {
        println!("{} warning(s)", report.warnings.len());
    }
}
