use serde::{Deserialize, Serialize};

use crate::config::AdvancePolicy;
use crate::decimal::Money;
use crate::errors::{CreditError, Result};

/// how often an employee is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PayFrequency {
    Weekly,
    BiWeekly,
    SemiMonthly,
    #[default]
    Monthly,
}

impl PayFrequency {
    /// pay periods per calendar month, used to normalize gross salary
    pub fn monthly_multiplier(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 4,
            PayFrequency::BiWeekly => 2,
            PayFrequency::SemiMonthly => 2,
            PayFrequency::Monthly => 1,
        }
    }
}

/// salary advance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryAdvanceRequest {
    pub employee_id: String,
    /// gross salary per pay period, before deductions
    pub gross_salary: Money,
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    pub requested_amount: Money,
}

/// outcome of an eligibility evaluation
///
/// Carries the individual checks so a caller can explain a rejection instead
/// of reporting a bare boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    /// gross salary normalized to a monthly figure
    pub monthly_gross: Money,
    /// cap on the advance: monthly gross times the policy fraction
    pub max_allowed: Money,
    pub salary_floor_check: bool,
    pub limit_check: bool,
    pub failed_criteria: Vec<String>,
}

/// evaluate a salary advance request against policy
///
/// Non-positive salary or requested amount is a validation error; every other
/// shortfall is reported through the decision.
pub fn evaluate(request: &SalaryAdvanceRequest, policy: &AdvancePolicy) -> Result<EligibilityDecision> {
    if !request.gross_salary.is_positive() {
        return Err(CreditError::InvalidSalary {
            amount: request.gross_salary,
        });
    }
    if !request.requested_amount.is_positive() {
        return Err(CreditError::InvalidAdvanceAmount {
            amount: request.requested_amount,
        });
    }

    let multiplier = request.pay_frequency.monthly_multiplier();
    let monthly_gross = Money::from_decimal(
        request.gross_salary.as_decimal() * rust_decimal::Decimal::from(multiplier),
    );
    let max_allowed =
        Money::from_decimal(monthly_gross.as_decimal() * policy.advance_fraction.as_decimal());

    let mut failed_criteria = Vec::new();

    let salary_floor_check = match policy.minimum_monthly_salary {
        Some(floor) if monthly_gross < floor => {
            failed_criteria.push(format!(
                "monthly gross salary {} is below the minimum of {}",
                monthly_gross, floor
            ));
            false
        }
        _ => true,
    };

    let limit_check = request.requested_amount <= max_allowed;
    if !limit_check {
        failed_criteria.push(format!(
            "requested amount {} exceeds the maximum eligible advance of {}",
            request.requested_amount, max_allowed
        ));
    }

    Ok(EligibilityDecision {
        eligible: salary_floor_check && limit_check,
        monthly_gross,
        max_allowed,
        salary_floor_check,
        limit_check,
        failed_criteria,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(salary: i64, amount: i64) -> SalaryAdvanceRequest {
        SalaryAdvanceRequest {
            employee_id: "EMP001".to_string(),
            gross_salary: Money::from_major(salary),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(amount),
        }
    }

    #[test]
    fn test_over_cap_is_rejected() {
        // 3,000 salary at the default 50% cap: max 1,500, so 1,800 fails
        let decision = evaluate(&request(3_000, 1_800), &AdvancePolicy::default()).unwrap();
        assert_eq!(decision.max_allowed, Money::from_major(1_500));
        assert!(!decision.eligible);
        assert!(!decision.limit_check);
        assert_eq!(decision.failed_criteria.len(), 1);
    }

    #[test]
    fn test_at_cap_is_eligible() {
        let decision = evaluate(&request(3_000, 1_500), &AdvancePolicy::default()).unwrap();
        assert!(decision.eligible);
        assert!(decision.failed_criteria.is_empty());

        let decision = evaluate(&request(3_000, 1_499), &AdvancePolicy::default()).unwrap();
        assert!(decision.eligible);
    }

    #[test]
    fn test_pay_frequency_normalization() {
        // 800/week is 3,200/month, capping advances at 1,600
        let mut req = request(800, 1_600);
        req.pay_frequency = PayFrequency::Weekly;
        let decision = evaluate(&req, &AdvancePolicy::default()).unwrap();
        assert_eq!(decision.monthly_gross, Money::from_major(3_200));
        assert!(decision.eligible);

        req.requested_amount = Money::from_decimal(dec!(1600.01));
        let decision = evaluate(&req, &AdvancePolicy::default()).unwrap();
        assert!(!decision.eligible);
    }

    #[test]
    fn test_salary_floor() {
        let policy = AdvancePolicy::default().with_minimum_salary(Money::from_major(2_000));
        let decision = evaluate(&request(1_800, 100), &policy).unwrap();
        assert!(!decision.eligible);
        assert!(!decision.salary_floor_check);
        // the cap itself is still reported
        assert_eq!(decision.max_allowed, Money::from_major(900));
    }

    #[test]
    fn test_multiple_failed_criteria() {
        let policy = AdvancePolicy::default().with_minimum_salary(Money::from_major(2_000));
        let decision = evaluate(&request(1_000, 900), &policy).unwrap();
        assert!(!decision.eligible);
        assert_eq!(decision.failed_criteria.len(), 2);
    }

    #[test]
    fn test_non_positive_inputs_are_validation_errors() {
        assert!(matches!(
            evaluate(&request(0, 100), &AdvancePolicy::default()),
            Err(CreditError::InvalidSalary { .. })
        ));
        assert!(matches!(
            evaluate(&request(3_000, 0), &AdvancePolicy::default()),
            Err(CreditError::InvalidAdvanceAmount { .. })
        ));
    }
}
