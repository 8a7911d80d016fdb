//! Error types for the ledger and credential use cases.
//!
//! Storage failures are wrapped rather than swallowed: a mutation that
//! could not be persisted reports it and leaves in-memory state as it
//! was before the call.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ports::kv_store::StorageError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("loan {0} not found")]
    LoanNotFound(String),

    #[error("payment amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("next payment date {0} cannot be advanced by a month")]
    ScheduleOverflow(NaiveDate),

    #[error("loan amounts exceed the largest representable total")]
    AmountOverflow,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
