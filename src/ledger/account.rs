use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::ledger::Iteration;
use crate::types::{AccountId, CustomerId};

/// ledger entry against a savings account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDeposit {
    pub date: NaiveDate,
    /// amount applied to savings
    pub principal: Money,
    /// late fee paid
    pub penalty: Money,
}

impl AccountDeposit {
    pub fn new(date: NaiveDate, principal: Money, penalty: Money) -> Self {
        Self { date, principal, penalty }
    }

    pub fn total(&self) -> Money {
        self.principal + self.penalty
    }
}

/// a customer's monthly-savings contract under an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub iteration: Iteration,
    pub deposits: Vec<AccountDeposit>,
}

impl Account {
    pub fn new(customer_id: CustomerId, iteration: Iteration) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            iteration,
            deposits: Vec::new(),
        }
    }

    /// append a deposit to the ledger
    pub fn record_deposit(&mut self, deposit: AccountDeposit) {
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

    pub fn total_penalty_paid(&self) -> Money {
        self.deposits.iter().map(|d| d.penalty).sum()
    }
}
