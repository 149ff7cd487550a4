use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::{AdvancePolicy, LoanTermsConfig};
use crate::eligibility::SalaryAdvanceRequest;
use crate::errors::CreditError;
use crate::records::{JournalStore, LoanRecord};
use crate::service::{
    AdvanceOutcome, CreditService, LoanOutcome, Persistence, PersonalLoanRequest,
};

/// service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub journal_path: PathBuf,
    pub policy: AdvancePolicy,
    pub loan_terms: LoanTermsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from("data/records.jsonl"),
            policy: AdvancePolicy::default(),
            loan_terms: LoanTermsConfig::default(),
        }
    }
}

/// shared state behind the HTTP handlers
#[derive(Clone)]
pub struct ServiceState {
    service: Arc<Mutex<CreditService<JournalStore>>>,
    time: Arc<SafeTimeProvider>,
    journal: String,
}

impl ServiceState {
    pub fn bootstrap(config: ServiceConfig, time: SafeTimeProvider) -> Result<Self, CreditError> {
        let journal = config.journal_path.display().to_string();
        let store = JournalStore::open(&config.journal_path)?;
        let service = CreditService::new(config.policy, config.loan_terms, store);

        Ok(Self {
            service: Arc::new(Mutex::new(service)),
            time: Arc::new(time),
            journal,
        })
    }
}

pub fn build_router(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/advances", post(request_advance))
        .route("/v1/loans", post(request_loan))
        .route("/v1/records", get(list_records))
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Credit(#[from] CreditError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Credit(err) = self;
        let status = match &err {
            CreditError::InvalidSalary { .. }
            | CreditError::InvalidAdvanceAmount { .. }
            | CreditError::InvalidPrincipal { .. }
            | CreditError::InvalidInterestRate { .. }
            | CreditError::InvalidTerm { .. } => StatusCode::BAD_REQUEST,
            CreditError::ActiveLoanExists { .. } => StatusCode::CONFLICT,
            CreditError::Io(_) | CreditError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    journal: String,
}

async fn health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "payroll-creditd",
        journal: state.journal.clone(),
    })
}

async fn request_advance(
    State(state): State<ServiceState>,
    Json(request): Json<SalaryAdvanceRequest>,
) -> Result<Json<AdvanceOutcome>, ApiError> {
    let mut service = state.service.lock().await;
    let outcome = service.request_advance(&request, &state.time)?;
    warn_if_unstored(outcome.persistence.as_ref());
    Ok(Json(outcome))
}

async fn request_loan(
    State(state): State<ServiceState>,
    Json(request): Json<PersonalLoanRequest>,
) -> Result<Json<LoanOutcome>, ApiError> {
    let mut service = state.service.lock().await;
    let outcome = service.request_loan(&request, &state.time)?;
    warn_if_unstored(Some(&outcome.persistence));
    Ok(Json(outcome))
}

#[derive(Debug, Clone, Serialize)]
struct RecordsResponse {
    total: usize,
    items: Vec<LoanRecord>,
}

async fn list_records(
    State(state): State<ServiceState>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let service = state.service.lock().await;
    let items = service.list_records()?;
    Ok(Json(RecordsResponse {
        total: items.len(),
        items,
    }))
}

fn warn_if_unstored(persistence: Option<&Persistence>) {
    if let Some(Persistence::Failed { reason }) = persistence {
        warn!("transaction computed but not persisted: {}", reason);
    }
}
