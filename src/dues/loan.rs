use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::Money;
use crate::dues::{today, whole, DuesEngine};
use crate::errors::{DuesError, Result};
use crate::ledger::Loan;
use crate::types::{LoanDuesField, LoanId};

/// loan dues as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDues {
    pub loan_id: LoanId,
    pub as_of: NaiveDate,
    /// months elapsed after the loan grace months
    pub total_months_elapsed: i64,
    pub total_principal_paid: Money,
    pub scheduled_principal: Money,
    /// disbursed amount minus principal repaid
    pub outstanding_principal: Money,
    pub installments_dues: i64,
    pub principal_dues: Money,
    pub interest_dues: Money,
    pub penalty_dues: Money,
    pub total_dues: Money,
}

impl LoanDues {
    /// read one value, in whole currency units (or installments)
    pub fn get(&self, field: LoanDuesField) -> i64 {
        match field {
            LoanDuesField::Installments => self.installments_dues,
            LoanDuesField::Principal => self.principal_dues.to_major(),
            LoanDuesField::Interest => self.interest_dues.to_major(),
            LoanDuesField::Penalty => self.penalty_dues.to_major(),
            LoanDuesField::Total => self.total_dues.to_major(),
        }
    }
}

impl DuesEngine {
    /// loan dues as of today
    pub fn loan_dues(&self, loan: &Loan, time: &SafeTimeProvider) -> Result<LoanDues> {
        self.loan_dues_as_of(loan, today(time))
    }

    /// months counted against a loan: calendar months elapsed less the grace months
    pub fn loan_months_elapsed(&self, loan: &Loan, as_of: NaiveDate) -> Result<i64> {
        let months = self.months_elapsed(loan.iteration.start_date, as_of)?;
        Ok(months - self.config().loan_grace_months as i64)
    }

    /// loan dues as of `as_of`
    ///
    /// Each installment retires a fixed share of the disbursed amount regardless of the
    /// iteration length. Interest and penalty are charged on the outstanding principal per
    /// installment due; at least `minimum_loan_installments` installments are always charged
    /// interest, even when no principal is overdue.
    pub fn loan_dues_as_of(&self, loan: &Loan, as_of: NaiveDate) -> Result<LoanDues> {
        if !loan.amount.is_positive() {
            warn!(
                loan_id = %loan.id,
                amount = %loan.amount,
                "loan dues requested for loan without a positive amount"
            );
            return Err(DuesError::InvalidLoanAmount {
                loan_id: loan.id,
                amount: loan.amount,
            });
        }

        let config = self.config();
        let iteration = &loan.iteration;

        let total_months_elapsed = self.loan_months_elapsed(loan, as_of)?;
        let total_principal_paid = loan.total_principal_paid();

        let installment_principal = loan.amount.percentage(config.loan_installment_share);
        let scheduled_principal = installment_principal * Decimal::from(total_months_elapsed);
        let principal_owed = (scheduled_principal - total_principal_paid).max(Money::ZERO);

        let installments_dues = whole(principal_owed.as_decimal() / installment_principal.as_decimal())
            .max(config.minimum_loan_installments as i64);

        let outstanding_principal = loan.amount - total_principal_paid;
        let interest_owed = outstanding_principal
            .percentage(iteration.interest_rate)
            * Decimal::from(installments_dues);

        let penalised_installments =
            (installments_dues - config.penalty_grace_installments as i64).max(0);
        let penalty_owed = outstanding_principal
            .percentage(iteration.late_deposit_fine)
            * Decimal::from(penalised_installments);

        // total is truncated once over the untruncated components
        let total_dues = (principal_owed + interest_owed + penalty_owed).trunc();

        debug!(
            loan_id = %loan.id,
            %as_of,
            total_months_elapsed,
            installments_dues,
            principal_dues = %principal_owed,
            total_dues = %total_dues,
            "computed loan dues"
        );

        Ok(LoanDues {
            loan_id: loan.id,
            as_of,
            total_months_elapsed,
            total_principal_paid,
            scheduled_principal,
            outstanding_principal,
            installments_dues,
            principal_dues: principal_owed.trunc(),
            interest_dues: interest_owed.trunc(),
            penalty_dues: penalty_owed.trunc(),
            total_dues,
        })
    }
}
