use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::dues::{today, DuesEngine};
use crate::errors::Result;
use crate::ledger::{Account, Loan};

/// one savings installment and whatever was deposited on its exact due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountScheduleRow {
    pub period: u32,
    pub due_date: NaiveDate,
    pub principal: Money,
    pub penalty: Money,
    pub paid: bool,
}

/// one loan installment and whatever was deposited on its exact due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScheduleRow {
    pub period: u32,
    pub due_date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    pub penalty: Money,
    pub paid: bool,
}

impl DuesEngine {
    pub fn account_schedule(
        &self,
        account: &Account,
        time: &SafeTimeProvider,
    ) -> Result<Vec<AccountScheduleRow>> {
        self.account_schedule_as_of(account, today(time))
    }

    /// rows for periods 0..=months elapsed
    ///
    /// Deposits are matched to a row only when dated exactly on its due date; a deposit
    /// posted on any other day shows up in no row.
    pub fn account_schedule_as_of(
        &self,
        account: &Account,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountScheduleRow>> {
        let months = self.months_elapsed(account.iteration.start_date, as_of)?;
        if months < 0 {
            return Ok(Vec::new());
        }

        (0..=months as u32)
            .map(|period| {
                let due_date = account.iteration.due_date(period)?;
                let mut row = AccountScheduleRow {
                    period,
                    due_date,
                    principal: Money::ZERO,
                    penalty: Money::ZERO,
                    paid: false,
                };
                for deposit in account.deposits.iter().filter(|d| d.date == due_date) {
                    row.principal += deposit.principal;
                    row.penalty += deposit.penalty;
                    row.paid = true;
                }
                Ok(row)
            })
            .collect()
    }

    pub fn loan_schedule(&self, loan: &Loan, time: &SafeTimeProvider) -> Result<Vec<LoanScheduleRow>> {
        self.loan_schedule_as_of(loan, today(time))
    }

    /// rows for periods 1..=loan months elapsed, matched by exact date like accounts
    pub fn loan_schedule_as_of(&self, loan: &Loan, as_of: NaiveDate) -> Result<Vec<LoanScheduleRow>> {
        let months = self.loan_months_elapsed(loan, as_of)?;
        if months < 1 {
            return Ok(Vec::new());
        }

        (1..=months as u32)
            .map(|period| {
                let due_date = loan.iteration.due_date(period)?;
                let mut row = LoanScheduleRow {
                    period,
                    due_date,
                    principal: Money::ZERO,
                    interest: Money::ZERO,
                    penalty: Money::ZERO,
                    paid: false,
                };
                for deposit in loan.deposits.iter().filter(|d| d.date == due_date) {
                    row.principal += deposit.principal;
                    row.interest += deposit.interest;
                    row.penalty += deposit.penalty;
                    row.paid = true;
                }
                Ok(row)
            })
            .collect()
    }
}
