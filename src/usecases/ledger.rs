//! Loan Ledger Use Case - Loans, Payments and Aggregates
//!
//! Owns the in-memory loan list and mirrors it to the `"loans"` key.
//! Every mutation builds the new list, persists it whole, and only then
//! swaps it in: a failed write is returned to the caller and leaves the
//! ledger exactly as it was.
//!
//! The write lock is held across the persistence call, so concurrent
//! callers are serialized and never update from a stale list.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::config::LedgerConfig;
use crate::domain::ids::IdGenerator;
use crate::domain::insights::{self, LenderShare, LoanProgress, MonthlyProjection, PaymentEntry};
use crate::domain::loan::{
  self, Loan, LoanUpdate, NewLoan, Payment, PaymentMethod, PaymentStatus, TypeShare,
  UpcomingPayment,
};
use crate::domain::seed;
use crate::error::LedgerError;
use crate::ports::clock::Clock;
use crate::ports::kv_store::{KeyValueStore, keys, read_json, write_json};

/// Loan ledger backed by a key-value store.
pub struct LoanLedger<S: KeyValueStore> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
  ids: IdGenerator,
  loans: RwLock<Vec<Loan>>,
}

impl<S: KeyValueStore> LoanLedger<S> {
  /// Load the ledger from `store`.
  ///
  /// When nothing has been persisted yet, the ledger starts with the
  /// demo loans (or empty, if `seed_demo_data` is off) and that initial
  /// list is written immediately. Later loads return exactly what was
  /// last persisted and never seed again.
  #[instrument(skip_all)]
  pub async fn load(
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: &LedgerConfig,
  ) -> Result<Self, LedgerError> {
    let loans = match read_json::<Vec<Loan>, _>(store.as_ref(), keys::LOANS).await {
      Ok(Some(loans)) => {
        info!(count = loans.len(), "Loan ledger loaded");
        loans
      }
      Ok(None) => {
        let initial = if config.seed_demo_data {
          seed::demo_loans(clock.today())
        } else {
          Vec::new()
        };
        write_json(store.as_ref(), keys::LOANS, &initial).await?;
        info!(count = initial.len(), "No ledger found, initial ledger persisted");
        initial
      }
      Err(e) => {
        error!(error = %e, "Failed to load loans");
        return Err(e.into());
      }
    };

    if let Err(e) = loan::check_amounts(&loans) {
      warn!(error = %e, "Stored loan amounts overflow; totals will saturate");
    }

    let ids = IdGenerator::new();
    for loan in &loans {
      ids.observe(&loan.id);
      loan.payment_history.iter().for_each(|p| ids.observe(&p.id));
    }

    Ok(Self {
      store,
      clock,
      ids,
      loans: RwLock::new(loans),
    })
  }

  /// Snapshot of all loans in ledger order.
  pub async fn loans(&self) -> Vec<Loan> {
    self.loans.read().await.clone()
  }

  /// Look up one loan.
  pub async fn loan(&self, id: &str) -> Option<Loan> {
    self.loans.read().await.iter().find(|l| l.id == id).cloned()
  }

  /// Add a loan with a fresh id and empty payment history.
  #[instrument(skip(self, new), fields(name = %new.name))]
  pub async fn add_loan(&self, new: NewLoan) -> Result<Loan, LedgerError> {
    let mut loans = self.loans.write().await;

    let created = Loan::from_new(self.ids.next_id(self.clock.now_millis()), new);
    let mut updated = loans.clone();
    updated.push(created.clone());
    loan::check_amounts(&updated)?;

    self.persist(&updated).await?;
    *loans = updated;

    info!(loan_id = %created.id, loan_type = %created.loan_type, "Loan added");
    Ok(created)
  }

  /// Shallow-merge `update` into the loan with `id`.
  ///
  /// Returns whether a loan matched. The list is persisted either way.
  #[instrument(skip(self, update))]
  pub async fn update_loan(&self, id: &str, update: LoanUpdate) -> Result<bool, LedgerError> {
    let mut loans = self.loans.write().await;

    let mut updated = loans.clone();
    let found = match updated.iter_mut().find(|l| l.id == id) {
      Some(target) => {
        target.apply_update(update);
        true
      }
      None => false,
    };
    loan::check_amounts(&updated)?;

    self.persist(&updated).await?;
    *loans = updated;

    if found {
      info!("Loan updated");
    } else {
      warn!("Update for unknown loan ignored");
    }
    Ok(found)
  }

  /// Remove the loan with `id`. Returns whether one was removed.
  #[instrument(skip(self))]
  pub async fn delete_loan(&self, id: &str) -> Result<bool, LedgerError> {
    let mut loans = self.loans.write().await;

    let updated: Vec<Loan> = loans.iter().filter(|l| l.id != id).cloned().collect();
    let removed = updated.len() != loans.len();

    self.persist(&updated).await?;
    *loans = updated;

    info!(removed, "Loan delete processed");
    Ok(removed)
  }

  /// Record a completed payment made today.
  ///
  /// Reduces the remaining balance (clamped at zero) and moves the next
  /// due date one month past the previous due date. Fails with
  /// `LoanNotFound` for an unknown id and `InvalidAmount` for a
  /// non-positive amount; neither changes any state.
  #[instrument(skip(self))]
  pub async fn make_payment(
    &self,
    loan_id: &str,
    amount: Decimal,
    method: PaymentMethod,
  ) -> Result<Payment, LedgerError> {
    if amount <= Decimal::ZERO {
      return Err(LedgerError::InvalidAmount(amount));
    }

    let mut loans = self.loans.write().await;
    let index = loans
      .iter()
      .position(|l| l.id == loan_id)
      .ok_or_else(|| LedgerError::LoanNotFound(loan_id.to_string()))?;

    let payment = Payment::completed(
      self.ids.next_id(self.clock.now_millis()),
      amount,
      self.clock.today(),
      method,
    );

    let mut updated = loans.clone();
    updated[index].record_payment(payment.clone())?;

    self.persist(&updated).await?;

    info!(
      payment_id = %payment.id,
      remaining = %updated[index].remaining_amount,
      next_due = %updated[index].next_payment_date,
      "Payment recorded"
    );
    *loans = updated;
    Ok(payment)
  }

  /// Sum of remaining balances.
  pub async fn total_outstanding(&self) -> Decimal {
    loan::total_outstanding(&self.loans.read().await)
  }

  /// Loans due within `days` days, soonest first (overdue excluded).
  pub async fn upcoming_payments(&self, days: u32) -> Vec<UpcomingPayment> {
    loan::upcoming_payments(&self.loans.read().await, self.clock.today(), days)
  }

  /// Outstanding balance share per loan type.
  pub async fn loan_distribution(&self) -> Vec<TypeShare> {
    loan::loan_distribution(&self.loans.read().await)
  }

  /// Sum of all EMIs.
  pub async fn total_monthly_emi(&self) -> Decimal {
    insights::total_monthly_emi(&self.loans.read().await)
  }

  /// Outstanding balance share per lender, largest first.
  pub async fn lender_distribution(&self) -> Vec<LenderShare> {
    insights::lender_distribution(&self.loans.read().await)
  }

  /// Repayment progress of one loan as of today.
  pub async fn loan_progress(&self, id: &str) -> Option<LoanProgress> {
    let today = self.clock.today();
    self
      .loans
      .read()
      .await
      .iter()
      .find(|l| l.id == id)
      .map(|l| insights::loan_progress(l, today))
  }

  /// Payments across the ledger, newest first.
  pub async fn payment_history(
    &self,
    loan_id: Option<&str>,
    status: Option<PaymentStatus>,
  ) -> Vec<PaymentEntry> {
    insights::payment_history(&self.loans.read().await, loan_id, status)
  }

  /// EMI outflow for the next `months` months.
  pub async fn monthly_projection(&self, months: u32) -> Vec<MonthlyProjection> {
    insights::monthly_projection(&self.loans.read().await, self.clock.today(), months)
  }

  /// Persist the full list; failures are logged and handed back.
  async fn persist(&self, loans: &[Loan]) -> Result<(), LedgerError> {
    write_json(self.store.as_ref(), keys::LOANS, loans)
      .await
      .map_err(|e| {
        error!(error = %e, "Failed to save loans");
        LedgerError::from(e)
      })
  }
}
