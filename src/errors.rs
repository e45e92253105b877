use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum DuesError {
    #[error("invalid deposit amount for iteration {iteration_id}: {amount}")]
    InvalidDepositAmount {
        iteration_id: Uuid,
        amount: Money,
    },

    #[error("invalid loan amount for loan {loan_id}: {amount}")]
    InvalidLoanAmount {
        loan_id: Uuid,
        amount: Money,
    },

    #[error("invalid iteration: {message}")]
    InvalidIteration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation overflow: {message}")]
    CalculationOverflow {
        message: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("receipt store failure: {message}")]
    ReceiptStore {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, DuesError>;
