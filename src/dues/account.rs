use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::Money;
use crate::dues::{today, whole, DuesEngine};
use crate::errors::{DuesError, Result};
use crate::ledger::Account;
use crate::types::{AccountDuesField, AccountId};

/// savings account dues as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDues {
    pub account_id: AccountId,
    pub as_of: NaiveDate,
    pub total_months_elapsed: i64,
    pub total_principal_paid: Money,
    pub total_installments_paid: i64,
    pub total_installments_missed: i64,
    pub principal_dues: Money,
    pub penalty_dues: Money,
    pub total_dues: Money,
}

impl AccountDues {
    /// read one value, in whole currency units (or installments)
    pub fn get(&self, field: AccountDuesField) -> i64 {
        match field {
            AccountDuesField::InstallmentsMissed => self.total_installments_missed,
            AccountDuesField::Principal => self.principal_dues.to_major(),
            AccountDuesField::Penalty => self.penalty_dues.to_major(),
            AccountDuesField::Total => self.total_dues.to_major(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.total_dues.is_zero()
    }
}

impl DuesEngine {
    /// account dues as of today
    pub fn account_dues(&self, account: &Account, time: &SafeTimeProvider) -> Result<AccountDues> {
        self.account_dues_as_of(account, today(time))
    }

    /// account dues as of `as_of`
    ///
    /// Installments paid are counted from principal alone (whole installments only).
    /// Penalty accrues per missed installment beyond the grace allowance, at the sum of
    /// the iteration's fine and interest percentages taken as currency units.
    pub fn account_dues_as_of(&self, account: &Account, as_of: NaiveDate) -> Result<AccountDues> {
        let iteration = &account.iteration;
        let deposit_amount = iteration.deposit_amount;
        if !deposit_amount.is_positive() {
            warn!(
                account_id = %account.id,
                iteration_id = %iteration.id,
                deposit_amount = %deposit_amount,
                "account dues requested for iteration without a positive deposit amount"
            );
            return Err(DuesError::InvalidDepositAmount {
                iteration_id: iteration.id,
                amount: deposit_amount,
            });
        }

        let total_months_elapsed = self.months_elapsed(iteration.start_date, as_of)?;
        let total_principal_paid = account.total_principal_paid();
        let total_installments_paid =
            whole(total_principal_paid.as_decimal() / deposit_amount.as_decimal());
        let total_installments_missed = total_months_elapsed
            .saturating_sub(total_installments_paid)
            .max(0);

        let principal_dues = deposit_amount * Decimal::from(total_installments_missed);

        let grace = self.config().penalty_grace_installments as i64;
        let penalised_installments = (total_installments_missed - grace).max(0);
        let penalty_per_installment =
            iteration.late_deposit_fine.as_percentage() + iteration.interest_rate.as_percentage();
        let penalty_dues =
            Money::from_decimal(Decimal::from(penalised_installments) * penalty_per_installment);

        let total_dues = (principal_dues + penalty_dues).trunc();

        debug!(
            account_id = %account.id,
            %as_of,
            total_months_elapsed,
            total_installments_paid,
            total_installments_missed,
            total_dues = %total_dues,
            "computed account dues"
        );

        Ok(AccountDues {
            account_id: account.id,
            as_of,
            total_months_elapsed,
            total_principal_paid,
            total_installments_paid,
            total_installments_missed,
            principal_dues,
            penalty_dues,
            total_dues,
        })
    }
}
