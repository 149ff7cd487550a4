use clap::Parser;
use payroll_credit_rs::api::{build_router, ServiceConfig, ServiceState};
use payroll_credit_rs::{AdvancePolicy, LoanTermsConfig, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "payroll-creditd", version, about = "Salary advance & loan REST service")]
struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
    /// File used to persist transaction records.
    #[arg(long, default_value = "data/records.jsonl", env = "PAYROLL_CREDIT_JOURNAL")]
    journal: PathBuf,
    /// Maximum advance as a fraction of monthly gross salary.
    #[arg(long, default_value = "0.5")]
    advance_fraction: Decimal,
    /// Gross monthly salary floor below which no advance is offered.
    #[arg(long)]
    minimum_salary: Option<Decimal>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "payroll_credit_rs=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let mut policy = AdvancePolicy::new(Rate::from_decimal(cli.advance_fraction));
    if let Some(floor) = cli.minimum_salary {
        policy = policy.with_minimum_salary(Money::from_decimal(floor));
    }

    let config = ServiceConfig {
        journal_path: cli.journal,
        policy,
        loan_terms: LoanTermsConfig::default(),
    };

    let time = SafeTimeProvider::new(TimeSource::System);
    let state = ServiceState::bootstrap(config, time)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("payroll-creditd listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
