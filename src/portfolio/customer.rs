use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::dues::DuesEngine;
use crate::errors::Result;
use crate::ledger::{Account, Customer, Loan};
use crate::types::CustomerId;

/// per-customer dues as listed in the administrative console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDues {
    pub customer_id: CustomerId,
    pub as_of: NaiveDate,
    pub account_count: usize,
    pub loan_count: usize,
    pub account_dues: Money,
    pub loan_dues: Money,
    pub total_dues: Money,
}

impl CustomerDues {
    /// sum dues over the customer's accounts and approved loans
    ///
    /// Records belonging to other customers are ignored, so callers may pass a wider
    /// snapshot than one customer's records.
    pub fn compute(
        engine: &DuesEngine,
        customer: &Customer,
        accounts: &[Account],
        loans: &[Loan],
        as_of: NaiveDate,
    ) -> Result<Self> {
        let own_accounts: Vec<&Account> =
            accounts.iter().filter(|a| a.customer_id == customer.id).collect();
        let own_loans: Vec<&Loan> = loans.iter().filter(|l| l.customer_id == customer.id).collect();

        let mut account_dues = Money::ZERO;
        for account in &own_accounts {
            account_dues += engine.account_dues_as_of(account, as_of)?.total_dues;
        }

        let mut loan_dues = Money::ZERO;
        for loan in own_loans.iter().filter(|l| l.is_approved()) {
            loan_dues += engine.loan_dues_as_of(loan, as_of)?.total_dues;
        }

        Ok(Self {
            customer_id: customer.id,
            as_of,
            account_count: own_accounts.len(),
            loan_count: own_loans.len(),
            account_dues,
            loan_dues,
            total_dues: account_dues + loan_dues,
        })
    }
}
