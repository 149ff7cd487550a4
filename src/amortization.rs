use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};
use crate::interest::{compound_factor, CompoundingFrequency};

/// one period of a repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub period: u32,
    pub payment_date: DateTime<Utc>,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// fixed-rate repayment schedule
///
/// Rows are produced on demand by [`AmortizationSchedule::rows`]; the schedule
/// itself holds only the loan terms and the derived periodic payment, so it can
/// be walked any number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    principal: Money,
    annual_rate: Rate,
    term: u32,
    start_date: DateTime<Utc>,
    frequency: CompoundingFrequency,
    periodic_rate: Rate,
    payment: Money,
}

impl AmortizationSchedule {
    /// build a schedule, validating the loan terms
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        term: u32,
        start_date: DateTime<Utc>,
        frequency: CompoundingFrequency,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(CreditError::InvalidPrincipal { amount: principal });
        }
        if annual_rate.is_negative() {
            return Err(CreditError::InvalidInterestRate { rate: annual_rate });
        }
        if term < 1 {
            return Err(CreditError::InvalidTerm { months: term });
        }

        let periodic_rate = annual_rate.periodic(frequency.periods_per_year());
        let payment = annuity_payment(principal, periodic_rate, term);

        Ok(Self {
            principal,
            annual_rate,
            term,
            start_date,
            frequency,
            periodic_rate,
            payment,
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    /// fixed payment per period (the final period may differ by the rounding residue)
    pub fn periodic_payment(&self) -> Money {
        self.payment
    }

    /// date the final payment falls due
    pub fn maturity_date(&self) -> DateTime<Utc> {
        period_date(self.start_date, self.frequency, self.term)
    }

    /// walk the schedule from period 1; each call restarts
    pub fn rows(&self) -> ScheduleIter<'_> {
        ScheduleIter {
            schedule: self,
            period: 0,
            balance: self.principal,
        }
    }

    /// the full schedule as a vector
    pub fn collect_rows(&self) -> Vec<PaymentRow> {
        self.rows().collect()
    }

    /// interest paid over the life of the loan
    pub fn total_interest(&self) -> Money {
        self.rows().fold(Money::ZERO, |acc, row| acc + row.interest)
    }

    /// total of all payments
    pub fn total_paid(&self) -> Money {
        self.rows().fold(Money::ZERO, |acc, row| acc + row.payment)
    }
}

/// lazy walk over a schedule's payment rows
pub struct ScheduleIter<'a> {
    schedule: &'a AmortizationSchedule,
    period: u32,
    balance: Money,
}

impl Iterator for ScheduleIter<'_> {
    type Item = PaymentRow;

    fn next(&mut self) -> Option<PaymentRow> {
        if self.period >= self.schedule.term {
            return None;
        }
        self.period += 1;
        let period = self.period;

        let beginning = self.balance;
        let interest = Money::from_decimal(
            beginning.as_decimal() * self.schedule.periodic_rate.as_decimal(),
        );

        // the final period pays off the exact remaining balance, absorbing the
        // rounding residue accumulated across earlier rows
        let (payment, principal) = if period == self.schedule.term {
            (beginning + interest, beginning)
        } else {
            let principal = (self.schedule.payment - interest)
                .max(Money::ZERO)
                .min(beginning);
            (interest + principal, principal)
        };

        let ending = beginning - principal;
        self.balance = ending;

        Some(PaymentRow {
            period,
            payment_date: period_date(self.schedule.start_date, self.schedule.frequency, period),
            beginning_balance: beginning,
            payment,
            interest,
            principal,
            ending_balance: ending,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.schedule.term - self.period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleIter<'_> {}

/// fixed periodic payment from the standard annuity formula:
/// payment = P * i * (1 + i)^n / ((1 + i)^n - 1), or P / n when i = 0
fn annuity_payment(principal: Money, periodic_rate: Rate, term: u32) -> Money {
    let i = periodic_rate.as_decimal();
    if i.is_zero() {
        return principal / Decimal::from(term);
    }

    let factor = compound_factor(i, term);
    Money::from_decimal(principal.as_decimal() * i * factor / (factor - Decimal::ONE))
}

/// due date of the given period
fn period_date(start: DateTime<Utc>, frequency: CompoundingFrequency, period: u32) -> DateTime<Utc> {
    match frequency {
        CompoundingFrequency::Daily => start + Duration::days(period as i64),
        CompoundingFrequency::Weekly => start + Duration::weeks(period as i64),
        CompoundingFrequency::Monthly => add_months(start, period),
        CompoundingFrequency::Quarterly => add_months(start, 3 * period),
        CompoundingFrequency::SemiAnnual => add_months(start, 6 * period),
        CompoundingFrequency::Annual => add_months(start, 12 * period),
    }
}

/// add months to date
fn add_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let mut result = date;
    for _ in 0..months {
        let days_in_month = days_in_month(result.year(), result.month());
        result = result + Duration::days(days_in_month as i64);
    }
    result
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
