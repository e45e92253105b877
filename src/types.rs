use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for an iteration
pub type IterationId = Uuid;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for a savings account
pub type AccountId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a receipt
pub type ReceiptId = Uuid;

/// loan approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// requested, not yet disbursed
    Pending,
    /// disbursed and repaying
    #[default]
    Approved,
}

/// single value selectable from an account dues breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountDuesField {
    InstallmentsMissed,
    Principal,
    Penalty,
    Total,
}

/// single value selectable from a loan dues breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanDuesField {
    Installments,
    Principal,
    Interest,
    Penalty,
    Total,
}
