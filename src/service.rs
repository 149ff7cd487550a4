use chrono::{DateTime, Duration, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::{AmortizationSchedule, PaymentRow};
use crate::config::{AdvancePolicy, LoanTermsConfig};
use crate::decimal::{Money, Rate};
use crate::eligibility::{self, EligibilityDecision, SalaryAdvanceRequest};
use crate::errors::{CreditError, Result};
use crate::interest;
use crate::records::{LoanRecord, RecordDetail, RecordDraft, RecordId, RecordStatus, RecordStore};

/// personal loan request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalLoanRequest {
    pub employee_id: String,
    pub principal: Money,
    /// annual rate as a fraction, e.g. 0.12 for 12%
    pub annual_rate: Rate,
    pub term_months: u32,
}

/// whether a computed transaction reached the record store
///
/// A store failure does not discard the computation: the result is returned
/// alongside `Failed`, and the caller decides how to report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Persistence {
    Stored { record_id: RecordId, reference: Uuid },
    Failed { reason: String },
}

/// result of a salary advance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub decision: EligibilityDecision,
    pub approved_amount: Option<Money>,
    pub expected_repayment_date: Option<DateTime<Utc>>,
    /// absent when the request was rejected; nothing is recorded then
    pub persistence: Option<Persistence>,
}

/// result of a personal loan request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutcome {
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub total_repayable: Money,
    pub schedule: Vec<PaymentRow>,
    pub persistence: Persistence,
}

/// facade wiring the eligibility evaluator, the amortization engine and the
/// record store behind the three operations the system exposes
pub struct CreditService<S: RecordStore> {
    policy: AdvancePolicy,
    loan_terms: LoanTermsConfig,
    store: S,
}

impl<S: RecordStore> CreditService<S> {
    pub fn new(policy: AdvancePolicy, loan_terms: LoanTermsConfig, store: S) -> Self {
        Self {
            policy,
            loan_terms,
            store,
        }
    }

    pub fn policy(&self) -> &AdvancePolicy {
        &self.policy
    }

    /// evaluate a salary advance and, when eligible, record the approval
    pub fn request_advance(
        &mut self,
        request: &SalaryAdvanceRequest,
        time: &SafeTimeProvider,
    ) -> Result<AdvanceOutcome> {
        let mut decision = eligibility::evaluate(request, &self.policy)?;

        // one active loan per employee at a time
        if decision.eligible && self.has_active_loan(&request.employee_id)? {
            decision.eligible = false;
            decision.failed_criteria.push(format!(
                "employee {} already has an active loan",
                request.employee_id
            ));
        }

        if !decision.eligible {
            return Ok(AdvanceOutcome {
                decision,
                approved_amount: None,
                expected_repayment_date: None,
                persistence: None,
            });
        }

        let now = time.now();
        let expected_repayment_date = now + Duration::days(30);
        let reference = Uuid::new_v4();
        let draft = RecordDraft {
            reference,
            employee_id: request.employee_id.clone(),
            detail: RecordDetail::Advance {
                gross_salary: request.gross_salary,
                pay_frequency: request.pay_frequency,
                requested_amount: request.requested_amount,
                max_allowed: decision.max_allowed,
                approved_amount: request.requested_amount,
            },
            status: RecordStatus::Approved,
            disbursement_date: now,
            expected_repayment_date,
            created_at: now,
        };

        let persistence = self.append_computed(draft, reference)?;

        Ok(AdvanceOutcome {
            decision,
            approved_amount: Some(request.requested_amount),
            expected_repayment_date: Some(expected_repayment_date),
            persistence: Some(persistence),
        })
    }

    /// compute a loan schedule and record the transaction
    pub fn request_loan(
        &mut self,
        request: &PersonalLoanRequest,
        time: &SafeTimeProvider,
    ) -> Result<LoanOutcome> {
        let now = time.now();
        let schedule = AmortizationSchedule::new(
            request.principal,
            request.annual_rate,
            request.term_months,
            now,
            self.loan_terms.payment_frequency,
        )?;

        if self.has_active_loan(&request.employee_id)? {
            return Err(CreditError::ActiveLoanExists {
                employee_id: request.employee_id.clone(),
            });
        }

        let total_repayable = interest::total_repayable(
            request.principal,
            request.annual_rate,
            request.term_months,
            self.loan_terms.compounding,
        )?;

        let rows = schedule.collect_rows();
        let total_interest = rows.iter().fold(Money::ZERO, |acc, r| acc + r.interest);
        let total_paid = rows.iter().fold(Money::ZERO, |acc, r| acc + r.payment);

        let reference = Uuid::new_v4();
        let draft = RecordDraft {
            reference,
            employee_id: request.employee_id.clone(),
            detail: RecordDetail::Loan {
                principal: request.principal,
                annual_rate: request.annual_rate,
                term_months: request.term_months,
                periodic_payment: schedule.periodic_payment(),
                total_interest,
                total_repayable,
            },
            status: RecordStatus::Approved,
            disbursement_date: now,
            expected_repayment_date: schedule.maturity_date(),
            created_at: now,
        };

        let persistence = self.append_computed(draft, reference)?;

        Ok(LoanOutcome {
            periodic_payment: schedule.periodic_payment(),
            total_interest,
            total_paid,
            total_repayable,
            schedule: rows,
            persistence,
        })
    }

    /// all persisted records in insertion order
    pub fn list_records(&self) -> Result<Vec<LoanRecord>> {
        self.store.list_all()
    }

    fn has_active_loan(&self, employee_id: &str) -> Result<bool> {
        Ok(self
            .store
            .list_all()?
            .iter()
            .any(|record| record.employee_id == employee_id && record.is_active()))
    }

    /// append after a successful computation; store failures become an
    /// explicit `Persistence::Failed` instead of discarding the result
    fn append_computed(&mut self, draft: RecordDraft, reference: Uuid) -> Result<Persistence> {
        match self.store.append(draft) {
            Ok(record_id) => Ok(Persistence::Stored {
                record_id,
                reference,
            }),
            Err(err) if err.is_persistence() => Ok(Persistence::Failed {
                reason: err.to_string(),
            }),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::PayFrequency;
    use crate::records::MemoryStore;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn service() -> CreditService<MemoryStore> {
        CreditService::new(
            AdvancePolicy::default(),
            LoanTermsConfig::default(),
            MemoryStore::new(),
        )
    }

    fn advance_request(employee_id: &str, salary: i64, amount: i64) -> SalaryAdvanceRequest {
        SalaryAdvanceRequest {
            employee_id: employee_id.to_string(),
            gross_salary: Money::from_major(salary),
            pay_frequency: PayFrequency::Monthly,
            requested_amount: Money::from_major(amount),
        }
    }

    fn loan_request(employee_id: &str) -> PersonalLoanRequest {
        PersonalLoanRequest {
            employee_id: employee_id.to_string(),
            principal: Money::from_major(12_000),
            annual_rate: Rate::from_percentage(12),
            term_months: 12,
        }
    }

    #[test]
    fn test_eligible_advance_is_recorded() {
        let time = test_time();
        let mut service = service();

        let outcome = service
            .request_advance(&advance_request("EMP001", 3_000, 1_200), &time)
            .unwrap();
        assert!(outcome.decision.eligible);
        assert_eq!(outcome.approved_amount, Some(Money::from_major(1_200)));
        assert!(matches!(
            outcome.persistence,
            Some(Persistence::Stored { record_id: 1, .. })
        ));

        let records = service.list_records().unwrap();
        assert_eq!(records.len(), 1);
        match &records[0].detail {
            RecordDetail::Advance {
                approved_amount,
                max_allowed,
                ..
            } => {
                assert_eq!(*approved_amount, Money::from_major(1_200));
                assert_eq!(*max_allowed, Money::from_major(1_500));
            }
            other => panic!("expected advance record, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_advance_is_not_recorded() {
        let time = test_time();
        let mut service = service();

        let outcome = service
            .request_advance(&advance_request("EMP001", 3_000, 1_800), &time)
            .unwrap();
        assert!(!outcome.decision.eligible);
        assert!(outcome.approved_amount.is_none());
        assert!(outcome.persistence.is_none());
        assert!(service.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_loan_outcome_matches_engine() {
        let time = test_time();
        let mut service = service();

        let outcome = service.request_loan(&loan_request("EMP001"), &time).unwrap();
        assert_eq!(
            outcome.periodic_payment,
            Money::from_decimal(dec!(1066.19))
        );
        assert_eq!(outcome.total_interest, Money::from_decimal(dec!(794.23)));
        assert_eq!(outcome.total_repayable, Money::from_decimal(dec!(13521.90)));
        assert_eq!(outcome.schedule.len(), 12);
        assert_eq!(
            outcome.schedule.last().unwrap().ending_balance,
            Money::ZERO
        );
        assert!(matches!(
            outcome.persistence,
            Persistence::Stored { record_id: 1, .. }
        ));

        let records = service.list_records().unwrap();
        match &records[0].detail {
            RecordDetail::Loan {
                periodic_payment,
                total_interest,
                ..
            } => {
                assert_eq!(*periodic_payment, outcome.periodic_payment);
                assert_eq!(*total_interest, outcome.total_interest);
            }
            other => panic!("expected loan record, got {:?}", other),
        }
    }

    #[test]
    fn test_one_active_loan_per_employee() {
        let time = test_time();
        let mut service = service();

        service.request_loan(&loan_request("EMP001"), &time).unwrap();

        // a second loan for the same employee is a hard conflict
        assert!(matches!(
            service.request_loan(&loan_request("EMP001"), &time),
            Err(CreditError::ActiveLoanExists { .. })
        ));

        // an advance for the same employee is turned down, not errored
        let outcome = service
            .request_advance(&advance_request("EMP001", 3_000, 100), &time)
            .unwrap();
        assert!(!outcome.decision.eligible);
        assert!(outcome
            .decision
            .failed_criteria
            .iter()
            .any(|c| c.contains("active loan")));

        // other employees are unaffected
        assert!(service.request_loan(&loan_request("EMP002"), &time).is_ok());
    }

    #[test]
    fn test_validation_rejects_before_any_record() {
        let time = test_time();
        let mut service = service();

        let mut request = loan_request("EMP001");
        request.term_months = 0;
        assert!(matches!(
            service.request_loan(&request, &time),
            Err(CreditError::InvalidTerm { .. })
        ));
        assert!(service.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_records_accumulate_in_order() {
        let time = test_time();
        let mut service = service();

        service
            .request_advance(&advance_request("EMP001", 3_000, 1_000), &time)
            .unwrap();
        service.request_loan(&loan_request("EMP002"), &time).unwrap();
        service
            .request_advance(&advance_request("EMP003", 4_000, 2_000), &time)
            .unwrap();

        let records = service.list_records().unwrap();
        assert_eq!(
            records.iter().map(|r| r.record_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(records[2].employee_id, "EMP003");
    }

    /// store that computes ids but refuses every write
    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn append(&mut self, _draft: RecordDraft) -> Result<RecordId> {
            Err(CreditError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "journal unavailable",
            )))
        }

        fn list_all(&self) -> Result<Vec<LoanRecord>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_computed_but_unstored() {
        let time = test_time();
        let mut service = CreditService::new(
            AdvancePolicy::default(),
            LoanTermsConfig::default(),
            BrokenStore,
        );

        let outcome = service.request_loan(&loan_request("EMP001"), &time).unwrap();
        // the computation is still returned in full
        assert_eq!(outcome.schedule.len(), 12);
        assert!(matches!(
            outcome.persistence,
            Persistence::Failed { ref reason } if reason.contains("journal unavailable")
        ));

        let outcome = service
            .request_advance(&advance_request("EMP002", 3_000, 1_000), &time)
            .unwrap();
        assert!(outcome.decision.eligible);
        assert!(matches!(
            outcome.persistence,
            Some(Persistence::Failed { .. })
        ));
    }

    #[test]
    fn test_advance_repayment_expected_in_thirty_days() {
        let time = test_time();
        let mut service = service();

        let outcome = service
            .request_advance(&advance_request("EMP001", 3_000, 1_000), &time)
            .unwrap();
        assert_eq!(
            outcome.expected_repayment_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap())
        );
    }
}
