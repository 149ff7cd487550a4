/// eligibility - how policy shapes advance decisions
use payroll_credit_rs::eligibility::{evaluate, PayFrequency, SalaryAdvanceRequest};
use payroll_credit_rs::{AdvancePolicy, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== eligibility example ===\n");

    let policy = AdvancePolicy::default();

    // within the 50% cap
    let decision = evaluate(
        &SalaryAdvanceRequest {
            employee_id: "EMP001".to_string(),
            gross_salary: Money::from_major(3_000),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(1_200),
        },
        &policy,
    )?;
    println!(
        "1,200 of 3,000/month: eligible={} (cap {})",
        decision.eligible, decision.max_allowed
    );

    // over the cap
    let decision = evaluate(
        &SalaryAdvanceRequest {
            employee_id: "EMP001".to_string(),
            gross_salary: Money::from_major(3_000),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(1_800),
        },
        &policy,
    )?;
    println!(
        "1,800 of 3,000/month: eligible={} (cap {})",
        decision.eligible, decision.max_allowed
    );
    for criterion in &decision.failed_criteria {
        println!("  - {}", criterion);
    }

    // weekly pay is normalized to a monthly figure first
    let decision = evaluate(
        &SalaryAdvanceRequest {
            employee_id: "EMP002".to_string(),
            gross_salary: Money::from_major(800),
            pay_frequency: PayFrequency::Weekly,
            requested_amount: Money::from_major(1_500),
        },
        &policy,
    )?;
    println!(
        "\n800/week normalizes to {} monthly, cap {}",
        decision.monthly_gross, decision.max_allowed
    );

    // a stricter policy with a salary floor
    let strict = AdvancePolicy::new(Rate::from_percentage(30))
        .with_minimum_salary(Money::from_major(2_000));
    let decision = evaluate(
        &SalaryAdvanceRequest {
            employee_id: "EMP003".to_string(),
            gross_salary: Money::from_major(1_500),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(400),
        },
        &strict,
    )?;
    println!("\nunder a 30% cap with a 2,000 floor:");
    for criterion in &decision.failed_criteria {
        println!("  - {}", criterion);
    }

    Ok(())
}
