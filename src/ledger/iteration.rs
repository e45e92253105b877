use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar;
use crate::decimal::{Money, Rate};
use crate::errors::{DuesError, Result};
use crate::types::IterationId;

/// a savings/loan program: cadence, rates and amounts shared by its accounts and loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub id: IterationId,
    pub start_date: NaiveDate,
    /// monthly interest, integer percent
    pub interest_rate: Rate,
    pub no_of_months: u32,
    /// expected principal per installment
    pub deposit_amount: Money,
    /// late fine, integer percent
    pub late_deposit_fine: Rate,
    pub is_active: bool,
    pub day_of_payment: u32,
    /// payout promised per account at the end of the iteration
    pub return_amount: Money,
}

impl Iteration {
    pub fn builder() -> IterationBuilder {
        IterationBuilder::new()
    }

    /// due date of installment `period`: start date plus `period` months
    pub fn due_date(&self, period: u32) -> Result<NaiveDate> {
        calendar::add_months(self.start_date, period)
    }

    /// payment dates for months 1..=no_of_months, pinned to `day_of_payment`
    pub fn payment_dates(&self) -> Result<Vec<NaiveDate>> {
        (1..=self.no_of_months)
            .map(|month| {
                let shifted = calendar::add_months(self.start_date, month)?;
                calendar::with_day_clamped(shifted, self.day_of_payment)
            })
            .collect()
    }

    /// total principal an account deposits over the full iteration
    pub fn total_contribution(&self) -> Money {
        self.deposit_amount * rust_decimal::Decimal::from(self.no_of_months)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.deposit_amount.is_positive() {
            return Err(DuesError::InvalidDepositAmount {
                iteration_id: self.id,
                amount: self.deposit_amount,
            });
        }
        if self.no_of_months == 0 {
            return Err(DuesError::InvalidIteration {
                message: "iteration must run for at least one month".to_string(),
            });
        }
        if !(1..=31).contains(&self.day_of_payment) {
            return Err(DuesError::InvalidIteration {
                message: format!("day of payment {} is not a day of month", self.day_of_payment),
            });
        }
        if self.return_amount.is_negative() {
            return Err(DuesError::InvalidIteration {
                message: format!("return amount {} is negative", self.return_amount),
            });
        }
        Ok(())
    }
}

/// builder for iterations, enforcing creation-time invariants
pub struct IterationBuilder {
    id: Option<IterationId>,
    start_date: Option<NaiveDate>,
    interest_rate: Option<Rate>,
    no_of_months: Option<u32>,
    deposit_amount: Option<Money>,
    late_deposit_fine: Option<Rate>,
    is_active: bool,
    day_of_payment: Option<u32>,
    return_amount: Option<Money>,
}

impl Default for IterationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IterationBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            start_date: None,
            interest_rate: None,
            no_of_months: None,
            deposit_amount: None,
            late_deposit_fine: None,
            is_active: true,
            day_of_payment: None,
            return_amount: None,
        }
    }

    pub fn id(mut self, id: IterationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn interest_rate(mut self, percent: u32) -> Self {
        self.interest_rate = Some(Rate::from_percentage(percent));
        self
    }

    pub fn no_of_months(mut self, months: u32) -> Self {
        self.no_of_months = Some(months);
        self
    }

    pub fn deposit_amount(mut self, amount: Money) -> Self {
        self.deposit_amount = Some(amount);
        self
    }

    pub fn late_deposit_fine(mut self, percent: u32) -> Self {
        self.late_deposit_fine = Some(Rate::from_percentage(percent));
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn day_of_payment(mut self, day: u32) -> Self {
        self.day_of_payment = Some(day);
        self
    }

    pub fn return_amount(mut self, amount: Money) -> Self {
        self.return_amount = Some(amount);
        self
    }

    /// build, starting today when no start date was given
    pub fn build_with_time(mut self, time: &SafeTimeProvider) -> Result<Iteration> {
        if self.start_date.is_none() {
            self.start_date = Some(time.now().date_naive());
        }
        self.build()
    }

    pub fn build(self) -> Result<Iteration> {
        let start_date = self.start_date.ok_or_else(|| DuesError::InvalidIteration {
            message: "start date is required".to_string(),
        })?;
        let deposit_amount = self.deposit_amount.ok_or_else(|| DuesError::InvalidIteration {
            message: "deposit amount is required".to_string(),
        })?;
        let no_of_months = self.no_of_months.ok_or_else(|| DuesError::InvalidIteration {
            message: "number of months is required".to_string(),
        })?;

        let iteration = Iteration {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            start_date,
            interest_rate: self.interest_rate.unwrap_or(Rate::ZERO),
            no_of_months,
            deposit_amount,
            late_deposit_fine: self.late_deposit_fine.unwrap_or(Rate::ZERO),
            is_active: self.is_active,
            day_of_payment: self.day_of_payment.unwrap_or_else(|| {
                use chrono::Datelike;
                start_date.day()
            }),
            return_amount: self
                .return_amount
                .unwrap_or_else(|| deposit_amount * rust_decimal::Decimal::from(no_of_months)),
        };
        iteration.validate()?;
        Ok(iteration)
    }
}
