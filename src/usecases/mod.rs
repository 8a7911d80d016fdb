//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces. Each use case is an
//! explicit object constructed once and handed to whatever needs it.
//!
//! Use cases:
//! - `LoanLedger`: Loans, payments and ledger aggregates
//! - `CredentialStore`: Registered users and password checks
//! - `SessionManager`: Login/registration/logout and biometric flag
//! - `Preferences`: Theme selection

pub mod credentials;
pub mod ledger;
pub mod preferences;
pub mod session;

pub use credentials::CredentialStore;
pub use ledger::LoanLedger;
pub use preferences::Preferences;
pub use session::{LoginOutcome, RegisterOutcome, SessionManager};
