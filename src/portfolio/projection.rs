use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::ledger::{Account, Iteration, Loan};
use crate::types::IterationId;

/// interest and penalty collected on one payment date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub loan_interest: Money,
    pub loan_penalty: Money,
    pub account_penalty: Money,
    pub total_interest: Money,
    pub total_penalty: Money,
    /// reference line, identical on every point
    pub threshold_amount: Money,
    /// reference line, identical on every point
    pub optimum_amount: Money,
}

/// collections over an iteration's payment dates, charted against its reference lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioProjection {
    pub iteration_id: IterationId,
    pub active_accounts: u32,
    pub threshold_amount: Money,
    pub optimum_amount: Money,
    pub points: Vec<ProjectionPoint>,
}

impl PortfolioProjection {
    /// build the projection from every deposit the caller loaded
    ///
    /// Only accounts enrolled in `iteration` count as active, but collections are summed
    /// over all deposits of the given accounts and loans that fall exactly on a payment date.
    pub fn build(iteration: &Iteration, accounts: &[Account], loans: &[Loan]) -> Result<Self> {
        if !iteration.deposit_amount.is_positive() {
            return Err(DuesError::InvalidDepositAmount {
                iteration_id: iteration.id,
                amount: iteration.deposit_amount,
            });
        }

        let active_accounts = accounts
            .iter()
            .filter(|a| a.iteration.id == iteration.id)
            .count() as u32;
        let threshold_amount = threshold_amount(iteration, active_accounts);
        let optimum_amount = optimum_amount(iteration, active_accounts)?;

        let points = iteration
            .payment_dates()?
            .into_iter()
            .map(|date| {
                let loan_interest: Money = loans
                    .iter()
                    .flat_map(|l| l.deposits.iter())
                    .filter(|d| d.date == date)
                    .map(|d| d.interest)
                    .sum();
                let loan_penalty: Money = loans
                    .iter()
                    .flat_map(|l| l.deposits.iter())
                    .filter(|d| d.date == date)
                    .map(|d| d.penalty)
                    .sum();
                let account_penalty: Money = accounts
                    .iter()
                    .flat_map(|a| a.deposits.iter())
                    .filter(|d| d.date == date)
                    .map(|d| d.penalty)
                    .sum();

                ProjectionPoint {
                    date,
                    loan_interest,
                    loan_penalty,
                    account_penalty,
                    total_interest: loan_interest,
                    total_penalty: loan_penalty + account_penalty,
                    threshold_amount,
                    optimum_amount,
                }
            })
            .collect();

        debug!(
            iteration_id = %iteration.id,
            active_accounts,
            threshold_amount = %threshold_amount,
            optimum_amount = %optimum_amount,
            "built portfolio projection"
        );

        Ok(Self {
            iteration_id: iteration.id,
            active_accounts,
            threshold_amount,
            optimum_amount,
            points,
        })
    }

    /// interest plus penalty collected up to and including each date
    pub fn cumulative_collections(&self) -> Vec<(NaiveDate, Money)> {
        let mut running = Money::ZERO;
        self.points
            .iter()
            .map(|p| {
                running += p.total_interest + p.total_penalty;
                (p.date, running)
            })
            .collect()
    }
}

/// surplus the program must keep: (return amount - total contribution) per account
pub fn threshold_amount(iteration: &Iteration, active_accounts: u32) -> Money {
    (iteration.return_amount - iteration.total_contribution()) * Decimal::from(active_accounts)
}

/// compound-growth ceiling: sum of floor((1 + r)^i * deposit) for i in 1..=n, less contributions
///
/// Long programs at high rates leave the decimal range; that is reported as
/// `CalculationOverflow` rather than a panic.
pub fn optimum_amount(iteration: &Iteration, active_accounts: u32) -> Result<Money> {
    let overflow = |what: &str| DuesError::CalculationOverflow {
        message: format!(
            "optimum amount for iteration {} ({} months at {}): {}",
            iteration.id, iteration.no_of_months, iteration.interest_rate, what
        ),
    };

    let deposit = iteration.deposit_amount.as_decimal();
    let mut grown = Decimal::ZERO;
    for i in (1..=iteration.no_of_months).rev() {
        let value = iteration
            .interest_rate
            .compound_factor(i)
            .and_then(|factor| factor.checked_mul(deposit))
            .ok_or_else(|| overflow("compound growth"))?;
        grown = grown
            .checked_add(value.floor())
            .ok_or_else(|| overflow("sum of grown deposits"))?;
    }

    let surplus = grown
        .checked_sub(iteration.total_contribution().as_decimal())
        .and_then(|s| s.checked_mul(Decimal::from(active_accounts)))
        .ok_or_else(|| overflow("surplus across accounts"))?;
    Ok(Money::from_decimal(surplus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountDeposit, LoanDeposit};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iteration() -> Iteration {
        Iteration::builder()
            .start_date(date(2020, 9, 24))
            .deposit_amount(Money::from_major(1_000))
            .no_of_months(3)
            .interest_rate(10)
            .late_deposit_fine(2)
            .day_of_payment(24)
            .return_amount(Money::from_major(3_300))
            .build()
            .unwrap()
    }

    #[test]
    fn test_reference_lines() {
        let iteration = iteration();

        // (3300 - 3000) * 2
        assert_eq!(threshold_amount(&iteration, 2), Money::from_major(600));
        // 1100 + 1210 + 1331 - 3000 = 641, times 2
        assert_eq!(optimum_amount(&iteration, 2).unwrap(), Money::from_major(1_282));
        assert_eq!(optimum_amount(&iteration, 0).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_optimum_floors_each_term() {
        let iteration = Iteration::builder()
            .start_date(date(2020, 9, 24))
            .deposit_amount(Money::from_major(333))
            .no_of_months(2)
            .interest_rate(3)
            .build()
            .unwrap();

        // floor(342.99) + floor(353.2797) - 666 = 342 + 353 - 666
        assert_eq!(optimum_amount(&iteration, 1).unwrap(), Money::from_major(29));
    }

    #[test]
    fn test_optimum_overflow_is_an_error() {
        // 25 years at 25% a month: 1.25^300 does not fit in a decimal
        let iteration = Iteration::builder()
            .start_date(date(2020, 9, 24))
            .deposit_amount(Money::from_major(1_000))
            .no_of_months(300)
            .interest_rate(25)
            .build()
            .unwrap();

        assert!(matches!(
            optimum_amount(&iteration, 1),
            Err(DuesError::CalculationOverflow { .. })
        ));
        assert!(matches!(
            PortfolioProjection::build(&iteration, &[], &[]),
            Err(DuesError::CalculationOverflow { .. })
        ));
    }

    #[test]
    fn test_collections_by_exact_date() {
        let iteration = iteration();
        let other = Iteration::builder()
            .start_date(date(2020, 1, 1))
            .deposit_amount(Money::from_major(100))
            .no_of_months(3)
            .build()
            .unwrap();

        let mut enrolled = Account::new(Uuid::new_v4(), iteration.clone());
        enrolled.record_deposit(AccountDeposit::new(date(2020, 10, 24), Money::from_major(1_000), Money::from_major(20)));
        let mut elsewhere = Account::new(Uuid::new_v4(), other);
        elsewhere.record_deposit(AccountDeposit::new(date(2020, 10, 24), Money::from_major(100), Money::from_major(7)));
        elsewhere.record_deposit(AccountDeposit::new(date(2020, 10, 25), Money::from_major(100), Money::from_major(9)));

        let mut loan = Loan::new(Uuid::new_v4(), iteration.clone(), Money::from_major(10_000)).unwrap();
        loan.record_deposit(LoanDeposit::new(
            date(2020, 11, 24),
            Money::from_major(1_000),
            Money::from_major(1_000),
            Money::from_major(100),
        ));

        let projection = PortfolioProjection::build(&iteration, &[enrolled, elsewhere], &[loan]).unwrap();

        assert_eq!(projection.active_accounts, 1);
        assert_eq!(projection.points.len(), 3);

        let first = &projection.points[0];
        assert_eq!(first.date, date(2020, 10, 24));
        assert_eq!(first.account_penalty, Money::from_major(27));
        assert_eq!(first.total_interest, Money::ZERO);
        assert_eq!(first.total_penalty, Money::from_major(27));

        let second = &projection.points[1];
        assert_eq!(second.loan_interest, Money::from_major(1_000));
        assert_eq!(second.loan_penalty, Money::from_major(100));
        assert_eq!(second.total_penalty, Money::from_major(100));

        assert!(projection
            .points
            .iter()
            .all(|p| p.threshold_amount == Money::from_major(300) && p.optimum_amount == Money::from_major(641)));

        let cumulative = projection.cumulative_collections();
        assert_eq!(cumulative[2].1, Money::from_major(1_127));
    }
}
