pub mod calendar;
pub mod config;
pub mod decimal;
pub mod dues;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod receipts;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::DuesConfig;
pub use decimal::{Money, Rate};
pub use dues::{AccountDues, DuesEngine, LoanDues};
pub use errors::{DuesError, Result};
pub use ledger::{Account, AccountDeposit, Customer, Iteration, IterationBuilder, Loan, LoanDeposit};
pub use portfolio::{CustomerDues, PortfolioProjection, ProjectionPoint};
pub use receipts::{issue_receipt, InMemoryReceiptStore, Receipt, ReceiptDetail, ReceiptStore};
pub use schedule::{AccountScheduleRow, LoanScheduleRow};
pub use types::{
    AccountDuesField, AccountId, CustomerId, IterationId, LoanDuesField, LoanId, LoanStatus,
    ReceiptId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
