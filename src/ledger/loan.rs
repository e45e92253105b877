use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::ledger::Iteration;
use crate::types::{CustomerId, LoanId, LoanStatus};

/// ledger entry against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDeposit {
    pub date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    pub penalty: Money,
}

impl LoanDeposit {
    pub fn new(date: NaiveDate, principal: Money, interest: Money, penalty: Money) -> Self {
        Self {
            date,
            principal,
            interest,
            penalty,
        }
    }

    pub fn total(&self) -> Money {
        self.principal + self.interest + self.penalty
    }
}

/// a customer's loan under an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub iteration: Iteration,
    /// principal disbursed
    pub amount: Money,
    pub status: LoanStatus,
    pub deposits: Vec<LoanDeposit>,
}

impl Loan {
    /// open an approved loan; the amount must be positive
    pub fn new(customer_id: CustomerId, iteration: Iteration, amount: Money) -> Result<Self> {
        let loan = Self {
            id: Uuid::new_v4(),
            customer_id,
            iteration,
            amount,
            status: LoanStatus::Approved,
            deposits: Vec::new(),
        };
        loan.validate()?;
        Ok(loan)
    }

    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(DuesError::InvalidLoanAmount {
                loan_id: self.id,
                amount: self.amount,
            });
        }
        Ok(())
    }

    pub fn is_approved(&self) -> bool {
        self.status == LoanStatus::Approved
    }

    /// append a deposit to the ledger
    pub fn record_deposit(&mut self, deposit: LoanDeposit) {
        self.deposits.push(deposit);
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits.len()
    }

    pub fn last_deposit_date(&self) -> Option<NaiveDate> {
        self.deposits.iter().map(|d| d.date).max()
    }

    pub fn total_principal_paid(&self) -> Money {
        self.deposits.iter().map(|d| d.principal).sum()
    }

    /// principal not yet repaid
    pub fn outstanding_principal(&self) -> Money {
        self.amount - self.total_principal_paid()
    }
}
