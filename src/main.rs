//! LoanSync - Entry Point
//!
//! Loads the ledger from the configured data directory and logs a
//! dashboard summary.
//!
//! Wiring sequence:
//! 1. Load loansync.toml (or defaults) + validate
//! 2. Init tracing (plain or JSON structured logging)
//! 3. Open the file-backed key-value store
//! 4. Load the loan ledger (seeding demo data on first run)
//! 5. Read session and preferences
//! 6. Log totals, upcoming payments, distribution and projection

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use loansync::adapters::{FileStore, SystemClock};
use loansync::config::{self, AppConfig};
use loansync::ports::{Clock, KeyValueStore};
use loansync::usecases::{CredentialStore, LoanLedger, Preferences, SessionManager};

const CONFIG_ENV: &str = "LOANSYNC_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "loansync.toml".to_string());
    let (config, found) = config::loader::load_config_or_default(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config);

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.storage.data_dir,
        "Starting LoanSync"
    );
    if !found {
        warn!(path = %config_path, "Config file not found, using defaults");
    }

    // ── 3. Open storage ─────────────────────────────────────
    let store = Arc::new(
        FileStore::new(&config.storage.data_dir)
            .await
            .context("Failed to open data directory")?,
    );
    if !store.is_healthy().await {
        warn!(data_dir = %config.storage.data_dir, "Data directory is not writable");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── 4. Load ledger ──────────────────────────────────────
    let ledger = LoanLedger::load(Arc::clone(&store), Arc::clone(&clock), &config.ledger)
        .await
        .context("Failed to load loan ledger")?;

    // ── 5. Session and preferences ──────────────────────────
    let credentials = Arc::new(CredentialStore::new(Arc::clone(&store), Arc::clone(&clock)));
    let session = SessionManager::new(Arc::clone(&store), credentials);
    let preferences = Preferences::new(Arc::clone(&store));

    match session.current_user().await? {
        Some(user) => info!(user = %user.name, email = %user.email, "Logged in"),
        None => info!("No user logged in"),
    }
    info!(theme = %preferences.theme_name().await?, "Preferences loaded");

    // ── 6. Dashboard summary ────────────────────────────────
    report(&ledger, &config).await;

    Ok(())
}

/// Initialise the global subscriber. `RUST_LOG` overrides the level.
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level));

    if config.app.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Log the dashboard figures for the current ledger.
async fn report<S: KeyValueStore>(ledger: &LoanLedger<S>, config: &AppConfig) {
    let loans = ledger.loans().await;
    info!(
        loans = loans.len(),
        outstanding = %ledger.total_outstanding().await,
        monthly_emi = %ledger.total_monthly_emi().await,
        "Ledger summary"
    );

    let window = config.ledger.upcoming_window_days;
    let upcoming = ledger.upcoming_payments(window).await;
    if upcoming.is_empty() {
        info!(window_days = window, "No payments due");
    }
    for due in &upcoming {
        info!(
            loan = %due.loan.name,
            emi = %due.loan.emi_amount,
            days_left = due.days_left,
            "Payment due"
        );
    }

    for share in ledger.loan_distribution().await {
        info!(loan_type = %share.loan_type, percentage = share.percentage, "Distribution by type");
    }
    for share in ledger.lender_distribution().await {
        info!(
            lender = %share.lender,
            amount = %share.amount,
            percentage = share.percentage,
            "Distribution by lender"
        );
    }

    for loan in &loans {
        if let Some(progress) = ledger.loan_progress(&loan.id).await {
            info!(
                loan = %loan.name,
                paid_percentage = progress.paid_percentage,
                expected_percentage = progress.expected_percentage,
                ahead = progress.is_ahead,
                remaining_payments = ?progress.remaining_payments,
                "Loan progress"
            );
        }
    }

    for month in ledger.monthly_projection(config.ledger.projection_months).await {
        info!(month = %month.month, amount = %month.amount, "Projected EMI");
    }
}
