/// schedule walkthrough - lazy amortization rows and their invariants
use chrono::{TimeZone, Utc};
use payroll_credit_rs::{AmortizationSchedule, CompoundingFrequency, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== schedule walkthrough ===\n");

    let schedule = AmortizationSchedule::new(
        Money::from_major(12_000),
        Rate::from_percentage(12),
        12,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        CompoundingFrequency::Monthly,
    )?;

    println!(
        "{} at {} over {} periods",
        schedule.principal(),
        schedule.annual_rate(),
        schedule.term()
    );
    println!("periodic payment: {}\n", schedule.periodic_payment());
    println!("per  date        payment   interest  principal  balance");

    // rows are computed on demand; nothing is materialized up front
    for row in schedule.rows() {
        println!(
            "{:>3}  {}  {:>8}  {:>8}  {:>9}  {:>9}",
            row.period,
            row.payment_date.format("%Y-%m-%d"),
            row.payment.to_string(),
            row.interest.to_string(),
            row.principal.to_string(),
            row.ending_balance.to_string(),
        );
    }

    println!("\ntotal interest: {}", schedule.total_interest());
    println!("total paid:     {}", schedule.total_paid());

    // the walk restarts cleanly
    let principal_sum = schedule
        .rows()
        .fold(Money::ZERO, |acc, row| acc + row.principal);
    println!("principal portions sum to {}", principal_sum);

    // an interest-free schedule splits the principal evenly
    let interest_free = AmortizationSchedule::new(
        Money::from_major(1_200),
        Rate::ZERO,
        4,
        Utc::now(),
        CompoundingFrequency::Monthly,
    )?;
    println!(
        "\ninterest-free 1,200 over 4 periods: {} per period",
        interest_free.periodic_payment()
    );

    Ok(())
}
