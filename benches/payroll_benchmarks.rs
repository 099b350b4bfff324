//! Performance benchmarks for the salon payroll engine.
//!
//! This benchmark suite covers:
//! - A full run for a typical salon (12 employees, 2,000 transactions)
//! - Scaling with transaction volume
//! - The HTTP endpoint end to end
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use salon_payroll::api::{AppState, create_router};
use salon_payroll::config::{ConfigLoader, PayrollConfig};
use salon_payroll::context::RunContext;
use salon_payroll::models::{
    EmployeeGroup, EmployeeProfile, PayPeriod, PayType, Table, Timecard, TimecardEntry,
};
use salon_payroll::run::{PayrollRunner, RunInputs};
use salon_payroll::sources::table_from_json_rows;

use axum::{body::Body, http::Request};
use rust_decimal::Decimal;
use tower::ServiceExt;

const FIRST_NAMES: [&str; 12] = [
    "Ana", "Bea", "Cleo", "Dani", "Eve", "Fay", "Gia", "Hope", "Ivy", "Jade", "Kai", "Lia",
];

/// A roster with four senior stylists, four stylists and four front desk staff.
fn create_config() -> PayrollConfig {
    let mut config = PayrollConfig::default();
    for (i, name) in FIRST_NAMES.iter().enumerate() {
        let full_name = format!("{} Stylist{}", name, i);
        match i % 3 {
            0 => {
                let mut profile = EmployeeProfile::new(
                    full_name,
                    PayType::CommissionVsHourly,
                    EmployeeGroup::SeniorStylist,
                );
                profile.addings.insert("Keratin".to_string(), Decimal::new(1500, 2));
                config.employees.senior_stylists.push(profile);
            }
            1 => config.employees.stylists.push(EmployeeProfile::new(
                full_name,
                PayType::Hourly,
                EmployeeGroup::Stylist,
            )),
            _ => config.employees.front_desk.push(EmployeeProfile::new(
                full_name,
                PayType::Hourly,
                EmployeeGroup::FrontDesk,
            )),
        }
    }
    config
}

fn period() -> PayPeriod {
    PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").expect("valid period")
}

/// Ten shifts per employee across the period.
fn create_timecard() -> Vec<serde_json::Value> {
    FIRST_NAMES
        .iter()
        .enumerate()
        .flat_map(|(i, name)| {
            (6..16).map(move |day| {
                serde_json::json!({
                    "employee": format!("{} Stylist{}", name, i),
                    "role": "Stylist",
                    "entry_date": format!("10/{:02}/2025", day),
                    "total_hours": format!("{}h {}m", 6 + day % 3, (day * 7) % 60),
                })
            })
        })
        .collect()
}

fn create_transactions(count: usize) -> Vec<serde_json::Map<String, serde_json::Value>> {
    (0..count)
        .map(|i| {
            let value = serde_json::json!({
                "TransactionDate": format!("2025-10-{:02}", 6 + i % 12),
                "ServiceProviderFirstName": FIRST_NAMES[i % FIRST_NAMES.len()],
                "ServiceTitle": if i % 5 == 0 { "Keratin Treatment" } else { "Women's Cut" },
                "Amount": format!("{}.{:02}", 40 + i % 160, i % 100),
                "Tip": format!("{}.00", i % 20),
                "Discount": if i % 9 == 0 { "10.00" } else { "" },
            });
            serde_json::from_value(value).expect("object row")
        })
        .collect()
}

fn create_inputs(transaction_count: usize) -> RunInputs {
    let entries: Vec<TimecardEntry> =
        serde_json::from_value(serde_json::Value::Array(create_timecard())).expect("entries");
    RunInputs {
        timecard: Timecard {
            pay_period: period(),
            entries,
        },
        transactions: table_from_json_rows(&create_transactions(transaction_count)),
        discounts: Table::empty(),
        providers: None,
        adjustments: vec![],
    }
}

/// Benchmark: Full run for a typical two-week period.
fn bench_full_run(c: &mut Criterion) {
    let runner = PayrollRunner::new(create_config());
    let inputs = create_inputs(2_000);

    c.bench_function("full_run_2000_transactions", |b| {
        b.iter(|| {
            let report = runner.calculate(black_box(inputs.clone()), RunContext::new());
            black_box(report)
        })
    });
}

/// Benchmark: Transaction volume scaling.
fn bench_scaling(c: &mut Criterion) {
    let runner = PayrollRunner::new(create_config());
    let mut group = c.benchmark_group("scaling");

    for transaction_count in [100usize, 1_000, 5_000, 20_000].iter() {
        let inputs = create_inputs(*transaction_count);
        group.throughput(Throughput::Elements(*transaction_count as u64));
        group.bench_with_input(
            BenchmarkId::new("transactions", transaction_count),
            transaction_count,
            |b, _| {
                b.iter(|| black_box(runner.calculate(inputs.clone(), RunContext::new())))
            },
        );
    }

    group.finish();
}

/// Benchmark: POST /payroll including JSON decoding and encoding.
fn bench_api_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let loader = ConfigLoader::from_config(create_config()).expect("valid config");
    let router = create_router(AppState::new(loader));
    let body = serde_json::json!({
        "pay_period": { "start_date": "2025-10-05", "end_date": "2025-10-18" },
        "timecard": create_timecard(),
        "transactions": create_transactions(2_000),
    })
    .to_string();

    c.bench_function("api_payroll_2000_transactions", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(benches, bench_full_run, bench_scaling, bench_api_request);
criterion_main!(benches);
