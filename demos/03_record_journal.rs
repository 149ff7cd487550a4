/// record journal - transactions persisted to a sequential log file
use chrono::{Duration, TimeZone, Utc};
use payroll_credit_rs::eligibility::{PayFrequency, SalaryAdvanceRequest};
use payroll_credit_rs::{
    AdvancePolicy, CreditService, JournalStore, LoanTermsConfig, Money, PersonalLoanRequest, Rate,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== record journal example ===\n");

    // controlled time keeps the journal deterministic
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let journal = std::env::temp_dir().join("payroll-credit-demo.jsonl");
    let _ = std::fs::remove_file(&journal);

    let store = JournalStore::open(&journal)?;
    let mut service = CreditService::new(
        AdvancePolicy::default(),
        LoanTermsConfig::default(),
        store,
    );

    let outcome = service.request_advance(
        &SalaryAdvanceRequest {
            employee_id: "EMP001".to_string(),
            gross_salary: Money::from_major(3_000),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(1_200),
        },
        &time,
    )?;
    println!("advance for EMP001 recorded: {:?}", outcome.persistence);

    controller.advance(Duration::days(7));

    let outcome = service.request_loan(
        &PersonalLoanRequest {
            employee_id: "EMP002".to_string(),
            principal: Money::from_major(5_000),
            annual_rate: Rate::from_percentage(7),
            term_months: 6,
        },
        &time,
    )?;
    println!("loan for EMP002 recorded:    {:?}", outcome.persistence);

    println!("\njournal at {}:", journal.display());
    for record in service.list_records()? {
        println!(
            "  #{} {} {:?} created {}",
            record.record_id,
            record.employee_id,
            record.status,
            record.created_at.format("%Y-%m-%d"),
        );
    }

    // reopening the journal continues the same id sequence
    drop(service);
    let store = JournalStore::open(&journal)?;
    let mut service = CreditService::new(
        AdvancePolicy::default(),
        LoanTermsConfig::default(),
        store,
    );
    let outcome = service.request_advance(
        &SalaryAdvanceRequest {
            employee_id: "EMP003".to_string(),
            gross_salary: Money::from_major(4_000),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(500),
        },
        &time,
    )?;
    println!("\nafter reopen, next record: {:?}", outcome.persistence);

    Ok(())
}
