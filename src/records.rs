use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::eligibility::PayFrequency;
use crate::errors::Result;

/// identifier assigned by the store, monotonically increasing from 1
pub type RecordId = u64;

/// lifecycle status of a persisted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Approved,
    Disbursed,
    Repaid,
}

impl RecordStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Approved | RecordStatus::Disbursed)
    }
}

/// input parameters and computed result of either transaction kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordDetail {
    Advance {
        gross_salary: Money,
        pay_frequency: PayFrequency,
        requested_amount: Money,
        max_allowed: Money,
        approved_amount: Money,
    },
    Loan {
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        periodic_payment: Money,
        total_interest: Money,
        total_repayable: Money,
    },
}

/// a transaction record before the store has assigned its id
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub reference: Uuid,
    pub employee_id: String,
    pub detail: RecordDetail,
    pub status: RecordStatus,
    pub disbursement_date: DateTime<Utc>,
    pub expected_repayment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// persisted transaction record, immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub record_id: RecordId,
    pub reference: Uuid,
    pub employee_id: String,
    #[serde(flatten)]
    pub detail: RecordDetail,
    pub status: RecordStatus,
    pub disbursement_date: DateTime<Utc>,
    pub expected_repayment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl LoanRecord {
    fn from_draft(record_id: RecordId, draft: RecordDraft) -> Self {
        Self {
            record_id,
            reference: draft.reference,
            employee_id: draft.employee_id,
            detail: draft.detail,
            status: draft.status,
            disbursement_date: draft.disbursement_date,
            expected_repayment_date: draft.expected_repayment_date,
            created_at: draft.created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// append-only store of transaction records
///
/// No update or delete is exposed; identifiers follow insertion order.
pub trait RecordStore {
    /// persist the record, assigning the next monotonic id
    fn append(&mut self, draft: RecordDraft) -> Result<RecordId>;

    /// all records in insertion order
    fn list_all(&self) -> Result<Vec<LoanRecord>>;
}

/// in-process store backed by a plain vector
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<LoanRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn append(&mut self, draft: RecordDraft) -> Result<RecordId> {
        let record_id = self.records.len() as RecordId + 1;
        self.records.push(LoanRecord::from_draft(record_id, draft));
        Ok(record_id)
    }

    fn list_all(&self) -> Result<Vec<LoanRecord>> {
        Ok(self.records.clone())
    }
}

/// sequential log file of records, one JSON document per line
///
/// Records are written with a single appending handle and flushed per append.
/// On open, the existing log is scanned to recover the next id, so a restarted
/// process continues the same sequence.
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    file: File,
    next_id: RecordId,
}

impl JournalStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let next_id = match read_journal(&path)? {
            records if records.is_empty() => 1,
            records => records.iter().map(|r| r.record_id).max().unwrap_or(0) + 1,
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file,
            next_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JournalStore {
    fn append(&mut self, draft: RecordDraft) -> Result<RecordId> {
        let record_id = self.next_id;
        let record = LoanRecord::from_draft(record_id, draft);

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;

        self.next_id += 1;
        Ok(record_id)
    }

    fn list_all(&self) -> Result<Vec<LoanRecord>> {
        read_journal(&self.path)
    }
}

fn read_journal(path: &Path) -> Result<Vec<LoanRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
