use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};

/// compounding frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl CompoundingFrequency {
    /// get number of compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Weekly => 52,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::SemiAnnual => 2,
            CompoundingFrequency::Annual => 1,
        }
    }
}

/// calculate (1 + rate)^periods by iteration, Decimal has no pow
pub fn compound_factor(period_rate: Decimal, periods: u32) -> Decimal {
    let mut factor = Decimal::ONE;
    let base = Decimal::ONE + period_rate;
    for _ in 0..periods {
        factor *= base;
    }
    factor
}

/// total amount repayable on a loan with compound interest: P * (1 + r/n)^(n*t)
///
/// `term_months` is converted to whole compounding periods at the given
/// frequency, so a 12-month loan compounded monthly accrues over 12 periods.
pub fn total_repayable(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    frequency: CompoundingFrequency,
) -> Result<Money> {
    if !principal.is_positive() {
        return Err(CreditError::InvalidPrincipal { amount: principal });
    }
    if annual_rate.is_negative() {
        return Err(CreditError::InvalidInterestRate { rate: annual_rate });
    }
    if term_months < 1 {
        return Err(CreditError::InvalidTerm {
            months: term_months,
        });
    }

    let n = frequency.periods_per_year();
    let periods = n * term_months / 12;
    let period_rate = annual_rate.periodic(n).as_decimal();

    let factor = compound_factor(period_rate, periods);
    Ok(Money::from_decimal(principal.as_decimal() * factor))
}
