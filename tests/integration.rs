//! Integration tests for the salon payroll engine.
//!
//! This test suite drives whole runs:
//! - CSV exports on disk through `CsvDirectorySource`
//! - Provider-id linking with name fallback for discounts
//! - Unresolved employees and report finalization
//! - Manual adjustments
//! - The HTTP endpoint

use std::fs;
use std::path::Path;
use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use salon_payroll::api::{AppState, create_router};
use salon_payroll::config::ConfigLoader;
use salon_payroll::error::PayrollError;
use salon_payroll::models::{
    Adjustment, AdjustmentKind, PayMethod, PayPeriod, PayrollReport, Timecard, TimecardEntry,
    UnresolvedReason,
};
use salon_payroll::report::{ReportFormat, write_report};
use salon_payroll::run::PayrollRunner;
use salon_payroll::sources::{CsvDirectorySource, MemoryTimecard};

// =============================================================================
// Test Helpers
// =============================================================================

const TRANSACTIONS_CSV: &str = "\
TransactionDate,ServiceProviderID,ServiceProviderFirstName,ServiceTitle,Amount,Tip
2025-10-06,P1,Jane,Keratin Treatment,600.00,30.00
2025-10-10,P1,Jane,Women's Cut,400.00,20.00
2025-10-20,P1,Jane,Women's Cut,999.00,99.00
2025-10-07,P2,Sam,Retail,0,0
";

const DISCOUNTS_CSV: &str = "\
TransactionDate,ServiceProviderFirstName,DiscountAmount
2025-10-08,Jane,100.00
2025-09-30,Jane,500.00
";

const PROVIDERS_CSV: &str = "\
ServiceProviderID,FirstName,LastName
P1,Jane,Doe
P2,Sam,Lee
";

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Writes the sample configuration and a set of exports under `root`.
fn write_fixture(root: &Path, with_discounts: bool) -> ConfigLoader {
    let config = fs::read_to_string("./config/payroll.yaml")
        .unwrap()
        .replace("root: ../exports", "root: exports");
    write(root, "payroll.yaml", &config);

    write(
        root,
        "exports/Transaction details/Transaction details.csv",
        TRANSACTIONS_CSV,
    );
    if with_discounts {
        write(
            root,
            "exports/Discount details/Discount details.csv",
            DISCOUNTS_CSV,
        );
    }
    write(
        root,
        "exports/Service provider details/Service provider details.csv",
        PROVIDERS_CSV,
    );

    ConfigLoader::load(root.join("payroll.yaml")).expect("Failed to load config")
}

fn entry(name: &str, date: &str, hours: &str) -> TimecardEntry {
    TimecardEntry {
        employee: name.to_string(),
        role: None,
        entry_date: Some(date.to_string()),
        total_hours: hours.to_string(),
    }
}

fn october_timecard(extra: Vec<TimecardEntry>) -> MemoryTimecard {
    let mut entries = vec![
        entry("Jane Doe", "10/06/2025", "10h"),
        entry("Jane Doe", "10/10/2025", "10h"),
        entry("Sam Lee", "10/07/2025", "9h 18m"),
        entry("Sam Lee", "10/08/2025", "----"),
    ];
    entries.extend(extra);
    MemoryTimecard::new(Timecard {
        pay_period: PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").unwrap(),
        entries,
    })
}

fn run(root: &Path, extra: Vec<TimecardEntry>, adjustments: Vec<Adjustment>) -> PayrollReport {
    let loader = write_fixture(root, true);
    let tables = CsvDirectorySource::new(loader.storage_root());
    PayrollRunner::new(loader.config().clone())
        .generate(&october_timecard(extra), &tables, adjustments)
        .unwrap()
}

// =============================================================================
// SECTION 1: Runs against CSV exports
// =============================================================================

#[test]
fn test_full_run_from_csv_exports() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(dir.path(), vec![], vec![]);

    assert_eq!(report.pay_date.to_string(), "2025-10-25");
    assert_eq!(report.results.len(), 2);

    // 20h at 14.00 = 280.00 loses to 40% of 1000.00 in-period sales
    let jane = report.result_for("Jane Doe").unwrap();
    assert_eq!(jane.total_hours, decimal("20"));
    assert_eq!(jane.total_sales, Some(decimal("1000")));
    assert_eq!(jane.pay_method, Some(PayMethod::Commission));
    assert_eq!(jane.base_pay, Some(decimal("400")));
    assert_eq!(jane.tips, decimal("50"));
    assert_eq!(jane.addings, Some(decimal("15")));
    assert_eq!(jane.discount_deduction, Some(decimal("50")));
    assert_eq!(jane.total_pay, decimal("415.00"));
    assert_eq!(jane.transaction_count, Some(2));

    // Placeholder row contributes no hours
    let sam = report.result_for("Sam Lee").unwrap();
    assert_eq!(sam.total_hours, decimal("9.30"));
    assert_eq!(sam.total_pay, decimal("130.20"));
    assert_eq!(sam.commission, None);

    assert_eq!(report.summary.employee_count, 2);
    assert_eq!(report.summary.total_payroll, decimal("545.20"));
    assert!(report.unresolved.is_empty());
}

#[test]
fn test_missing_discount_table_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let loader = write_fixture(dir.path(), false);
    let tables = CsvDirectorySource::new(loader.storage_root());

    let report = PayrollRunner::new(loader.config().clone())
        .generate(&october_timecard(vec![]), &tables, vec![])
        .unwrap();

    let jane = report.result_for("Jane Doe").unwrap();
    assert_eq!(jane.discount_deduction, Some(Decimal::ZERO));
    assert_eq!(jane.total_pay, decimal("465.00"));
    assert!(report.warnings.iter().any(|w| w.code == "DISCOUNTS_UNAVAILABLE"));
}

#[test]
fn test_missing_transactions_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let loader = write_fixture(dir.path(), true);
    fs::remove_dir_all(loader.storage_root().join("Transaction details")).unwrap();
    let tables = CsvDirectorySource::new(loader.storage_root());

    let result = PayrollRunner::new(loader.config().clone()).generate(
        &october_timecard(vec![]),
        &tables,
        vec![],
    );
    assert!(matches!(result, Err(PayrollError::SourceUnavailable { .. })));
}

// =============================================================================
// SECTION 2: Unresolved employees and finalization
// =============================================================================

#[test]
fn test_unconfigured_employee_blocks_finalization() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(
        dir.path(),
        vec![entry("Kim Ho", "10/09/2025", "4h 30m")],
        vec![],
    );

    assert!(report.result_for("Kim Ho").is_none());
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].reason, UnresolvedReason::NoProfile);
    assert_eq!(report.unresolved[0].hours, decimal("4.50"));

    match report.clone().finalize(false) {
        Err(PayrollError::UnresolvedEmployees { names }) => {
            assert_eq!(names, vec!["Kim Ho".to_string()]);
        }
        other => panic!("Expected UnresolvedEmployees, got {:?}", other),
    }

    let finalized = report.finalize(true).unwrap();
    let output = dir.path().join("out/payroll_report.csv");
    let written = write_report(&finalized, &output, ReportFormat::Csv).unwrap();
    assert!(written.contains(&dir.path().join("out/payroll_report_unresolved.csv")));
    assert!(written.contains(&dir.path().join("out/payroll_report_addings.csv")));

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("Kim Ho"));
}

// =============================================================================
// SECTION 3: Adjustments
// =============================================================================

#[test]
fn test_adjustments_change_final_pay_only() {
    let dir = tempfile::tempdir().unwrap();
    let adjustments = vec![
        Adjustment {
            employee: "Jane".to_string(),
            kind: AdjustmentKind::Bonus,
            amount: decimal("25.00"),
            reason: Some("Referral".to_string()),
        },
        Adjustment {
            employee: "Sam Lee".to_string(),
            kind: AdjustmentKind::Deduction,
            amount: decimal("10.00"),
            reason: None,
        },
    ];
    let report = run(dir.path(), vec![], adjustments);

    let jane = report.result_for("Jane Doe").unwrap();
    assert_eq!(jane.total_pay, decimal("415.00"));
    assert_eq!(jane.final_pay, decimal("440.00"));

    let sam = report.result_for("Sam Lee").unwrap();
    assert_eq!(sam.final_pay, decimal("120.20"));

    assert_eq!(report.summary.total_payroll, decimal("560.20"));
}

// =============================================================================
// SECTION 4: HTTP API
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/payroll.yaml").expect("Failed to load config");
    create_router(AppState::new(config))
}

async fn post_payroll(router: Router, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payroll")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn payroll_request(start: &str, end: &str) -> Value {
    json!({
        "pay_period": { "start_date": start, "end_date": end },
        "timecard": [
            { "employee": "Jane Doe", "entry_date": "10/06/2025", "total_hours": "20h" },
            { "employee": "Maria Lopez", "entry_date": "10/06/2025", "total_hours": "6h 45m" }
        ],
        "transactions": [
            { "TransactionDate": "2025-10-06", "ServiceProviderID": "P1", "ServiceTitle": "Keratin", "Amount": 1000, "Tip": 50 },
            { "TransactionDate": "2025-10-06", "ServiceProviderID": "P3", "ServiceTitle": "Cut", "Amount": 80, "Tip": 12 }
        ],
        "discounts": [
            { "ServiceProviderFirstName": "Jane", "DiscountAmount": 100 }
        ],
        "service_providers": [
            { "ServiceProviderID": "P1", "FirstName": "Jane" },
            { "ServiceProviderID": "P3", "FirstName": "Maria" }
        ]
    })
}

#[tokio::test]
async fn test_api_runs_payroll_over_inline_tables() {
    let router = create_router_for_test();

    let (status, report) =
        post_payroll(router, payroll_request("2025-10-05", "2025-10-18").to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let jane = &results[0];
    assert_eq!(jane["employee_name"], "Jane Doe");
    assert_eq!(jane["pay_method"], "commission");
    assert_eq!(decimal(jane["total_pay"].as_str().unwrap()), decimal("415"));

    // Hourly stylist: 6.75h at 14.00 plus linked tips
    let maria = &results[1];
    assert_eq!(maria["employee_name"], "Maria Lopez");
    assert_eq!(decimal(maria["total_pay"].as_str().unwrap()), decimal("106.50"));

    assert_eq!(report["pay_date"], "2025-10-25");
    assert!(report["unresolved"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_ignores_transactions_outside_period() {
    let router = create_router_for_test();
    let mut request = payroll_request("2025-10-05", "2025-10-18");
    request["transactions"].as_array_mut().unwrap().push(json!({
        "TransactionDate": "2025-12-25", "ServiceProviderID": "P1",
        "ServiceTitle": "Color", "Amount": 900, "Tip": 40
    }));

    let (status, report) = post_payroll(router, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let jane = &report["results"][0];
    assert_eq!(jane["employee_name"], "Jane Doe");
    assert_eq!(decimal(jane["total_sales"].as_str().unwrap()), decimal("1000"));
    assert_eq!(jane["transaction_count"], 1);
    assert_eq!(decimal(jane["total_pay"].as_str().unwrap()), decimal("415"));
}

#[tokio::test]
async fn test_api_malformed_json_returns_400() {
    let router = create_router_for_test();

    let (status, error) = post_payroll(router, "{\"pay_period\": ".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_api_reversed_period_returns_400() {
    let router = create_router_for_test();

    let (status, error) =
        post_payroll(router, payroll_request("2025-10-18", "2025-10-05").to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PAY_PERIOD");
    assert!(error["details"].as_str().unwrap().contains("after"));
}

#[tokio::test]
async fn test_api_requires_json_content_type() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payroll")
                .body(Body::from(payroll_request("2025-10-05", "2025-10-18").to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}
