use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::interest::CompoundingFrequency;

/// salary advance policy
///
/// Passed explicitly into the eligibility evaluator so decisions stay
/// deterministic under test; nothing is read from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancePolicy {
    /// maximum ratio of requested advance to monthly gross salary
    pub advance_fraction: Rate,
    /// gross monthly salary floor below which no advance is offered
    pub minimum_monthly_salary: Option<Money>,
}

impl AdvancePolicy {
    /// create a policy capping advances at the given fraction of monthly gross
    pub fn new(advance_fraction: Rate) -> Self {
        Self {
            advance_fraction,
            minimum_monthly_salary: None,
        }
    }

    /// add a gross monthly salary floor
    pub fn with_minimum_salary(mut self, floor: Money) -> Self {
        self.minimum_monthly_salary = Some(floor);
        self
    }
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self::new(Rate::from_decimal(dec!(0.5)))
    }
}

/// personal loan terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTermsConfig {
    /// repayment cadence, drives the periodic rate of the annuity
    pub payment_frequency: CompoundingFrequency,
    /// compounding cadence used for the total-repayable figure
    pub compounding: CompoundingFrequency,
}

impl Default for LoanTermsConfig {
    fn default() -> Self {
        Self {
            payment_frequency: CompoundingFrequency::Monthly,
            compounding: CompoundingFrequency::Monthly,
        }
    }
}
