//! Domain layer - Loan ledger, users and derived insights.
//!
//! Pure data types and arithmetic with no I/O (hexagonal architecture
//! inner ring). All types are serializable and testable in isolation.

pub mod ids;
pub mod insights;
pub mod loan;
pub mod schedule;
pub mod seed;
pub mod user;

// Re-export core types for convenience
pub use ids::IdGenerator;
pub use insights::{LenderShare, LoanProgress, MonthlyProjection, PaymentEntry};
pub use loan::{
    Loan, LoanId, LoanType, LoanUpdate, NewLoan, Payment, PaymentMethod, PaymentStatus,
    TypeShare, UpcomingPayment,
};
pub use user::{SafeUser, ThemeName, UserRecord};
