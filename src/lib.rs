//! LoanSync - Library Root
//!
//! Loan (EMI) ledger, credential store, session and insights over a
//! key-value persistence port. Re-exports all modules for the binary,
//! integration tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;

pub use error::{AuthError, LedgerError};
