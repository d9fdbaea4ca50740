//! Seeds the general ledger for development and testing.
//!
//! Creates the configured chart of accounts (the standard chart when none is
//! configured). With `--demo`, also submits one posting per operation type through
//! the configured posting gateway. Re-running is safe: existing accounts are
//! skipped and demo references are fixed per value date.
//!
//! Usage: cargo run --bin seeder -- [--demo] [--date YYYY-MM-DD]

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use gl_core::LedgerError;
use gl_core::ledger::{AccountDirectory, BalanceQuery, JournalComposer};
use gl_core::policy::{
    OperationType, PolicyPostingRequest, PostingPolicy, PostingPolicyMapper, chart_from_config,
};
use gl_db::{JournalEntryRepository, LedgerAccountRepository, connect};
use gl_gateway::{PostingOutcome, build_gateway};
use gl_shared::AppConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "seeder",
    version,
    about = "Seeds the general-ledger chart of accounts"
)]
struct Cli {
    /// Also submit demo postings through the configured posting gateway
    #[arg(long)]
    demo: bool,

    /// Value date of demo postings (defaults to today)
    #[arg(long, env = "GL_SEED_DATE")]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    info!("Connecting to database...");
    let db = connect(&config.database).await?;
    let accounts = Arc::new(LedgerAccountRepository::new(db.clone()));
    let journal = Arc::new(JournalEntryRepository::new(db));
    let directory = AccountDirectory::new(accounts);

    seed_chart(&directory, &config).await?;

    if cli.demo {
        let value_date = cli.date.unwrap_or_else(|| Utc::now().date_naive());
        let policy = Arc::new(PostingPolicy::from_config(&config.ledger.policy)?);
        let composer = JournalComposer::new(directory.clone(), journal.clone());
        let mapper = PostingPolicyMapper::new(composer, policy);
        let gateway = build_gateway(&config.ledger.posting, Some(mapper))?;

        let mut posted = 0_usize;
        let mut skipped = 0_usize;
        let mut failed = 0_usize;
        for request in demo_requests(value_date) {
            let reference = request.reference.clone();
            // One failed posting must not stop the rest of the batch.
            match gateway.submit(request).await {
                Ok(PostingOutcome::Posted { .. }) => posted += 1,
                Ok(PostingOutcome::Skipped { .. }) => skipped += 1,
                Err(e) => {
                    warn!(reference = %reference, error = %e, "Demo posting failed");
                    failed += 1;
                }
            }
        }
        info!(posted, skipped, failed, %value_date, "Demo postings submitted");

        let query = BalanceQuery::new(directory, journal);
        let reconciliation = query.reconcile(value_date, value_date).await?;
        info!(
            entries = reconciliation.entry_count,
            debit = %reconciliation.total_debit,
            credit = %reconciliation.total_credit,
            balanced = reconciliation.balanced,
            "Value date reconciled"
        );
    }

    info!("Seeding complete!");
    Ok(())
}

/// Creates every chart account that does not exist yet.
async fn seed_chart(directory: &AccountDirectory, config: &AppConfig) -> Result<()> {
    let chart = chart_from_config(&config.ledger.chart)?;
    info!(accounts = chart.len(), "Seeding chart of accounts...");

    for account in chart {
        let code = account.code.clone();
        match directory.create_account(account).await {
            Ok(_) => {}
            Err(LedgerError::DuplicateAccountCode(_)) => {
                info!(code = %code, "Account already exists, skipping...");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// One request per operation type, with references fixed by value date.
fn demo_requests(value_date: NaiveDate) -> Vec<PolicyPostingRequest> {
    let request = |operation_type: OperationType,
                   amount: Decimal,
                   source: &str,
                   destination: Option<&str>| PolicyPostingRequest {
        reference: format!("DEMO-{operation_type}-{}", value_date.format("%Y%m%d")),
        description: format!("Demo {} posting", operation_type.as_str().to_lowercase()),
        value_date,
        operation_type,
        amount,
        source_account_ref: source.to_string(),
        destination_account_ref: destination.map(str::to_string),
    };

    vec![
        request(OperationType::Deposit, dec!(500.00), "ACC-000001", None),
        request(OperationType::Payment, dec!(120.00), "ACC-000001", Some("MERCHANT-42")),
        request(OperationType::Transfer, dec!(50.00), "ACC-000001", Some("ACC-000002")),
        request(OperationType::Withdrawal, dec!(40.00), "ACC-000002", None),
        request(OperationType::Fee, dec!(6.00), "1000", None),
        request(OperationType::Interest, dec!(1.25), "ACC-000001", None),
    ]
}
