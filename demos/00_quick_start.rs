/// quick start - minimal example to get started
use payroll_credit_rs::{
    AdvancePolicy, CreditService, LoanTermsConfig, MemoryStore, Money, PersonalLoanRequest, Rate,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let mut service = CreditService::new(
        AdvancePolicy::default(),
        LoanTermsConfig::default(),
        MemoryStore::new(),
    );

    // a 12,000 personal loan at 12% over a year
    let outcome = service.request_loan(
        &PersonalLoanRequest {
            employee_id: "EMP001".to_string(),
            principal: Money::from_major(12_000),
            annual_rate: Rate::from_percentage(12),
            term_months: 12,
        },
        &time,
    )?;

    println!("periodic payment: {}", outcome.periodic_payment);
    println!("total interest:   {}", outcome.total_interest);
    println!("total repayable:  {}", outcome.total_repayable);
    println!("recorded as:      {:?}", outcome.persistence);

    Ok(())
}
