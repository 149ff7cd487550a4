use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug)]
pub enum CreditError {
    #[error("invalid gross salary: {amount} (must be positive)")]
    InvalidSalary { amount: Money },

    #[error("invalid requested advance amount: {amount} (must be positive)")]
    InvalidAdvanceAmount { amount: Money },

    #[error("invalid principal: {amount} (must be positive)")]
    InvalidPrincipal { amount: Money },

    #[error("invalid interest rate: {rate} (must not be negative)")]
    InvalidInterestRate { rate: Rate },

    #[error("invalid term: {months} months (must be at least 1)")]
    InvalidTerm { months: u32 },

    #[error("employee {employee_id} already has an active loan")]
    ActiveLoanExists { employee_id: String },

    #[error("record store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CreditError {
    /// true for failures of the record store rather than of the request itself
    pub fn is_persistence(&self) -> bool {
        matches!(self, CreditError::Io(_) | CreditError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, CreditError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_classes() {
        let validation = CreditError::InvalidSalary {
            amount: Money::from_decimal(dec!(-100)),
        };
        assert!(!validation.is_persistence());

        let io = CreditError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only journal",
        ));
        assert!(io.is_persistence());
    }

    #[test]
    fn test_error_messages_identify_field() {
        let err = CreditError::InvalidTerm { months: 0 };
        assert!(err.to_string().contains("term"));

        let err = CreditError::InvalidInterestRate {
            rate: Rate::from_decimal(dec!(-0.05)),
        };
        assert!(err.to_string().contains("interest rate"));
    }
}
