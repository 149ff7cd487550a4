pub mod amortization;
pub mod api;
pub mod config;
pub mod decimal;
pub mod eligibility;
pub mod errors;
pub mod interest;
pub mod records;
pub mod service;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{CreditError, Result};
pub use amortization::{AmortizationSchedule, PaymentRow, ScheduleIter};
pub use config::{AdvancePolicy, LoanTermsConfig};
pub use eligibility::{EligibilityDecision, PayFrequency, SalaryAdvanceRequest};
pub use interest::CompoundingFrequency;
pub use records::{
    JournalStore, LoanRecord, MemoryStore, RecordDetail, RecordDraft, RecordId, RecordStatus,
    RecordStore,
};
pub use service::{
    AdvanceOutcome, CreditService, LoanOutcome, Persistence, PersonalLoanRequest,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
