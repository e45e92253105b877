pub mod account;
pub mod loan;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::calendar;
use crate::config::DuesConfig;
use crate::errors::Result;

pub use account::AccountDues;
pub use loan::LoanDues;

/// read-only calculator of elapsed periods, missed installments and dues
///
/// Every operation works on a snapshot the caller already loaded and never mutates it.
/// The `*_as_of` forms take an explicit reference date; the plain forms read today's
/// date from the supplied clock.
#[derive(Debug, Clone, Default)]
pub struct DuesEngine {
    config: DuesConfig,
}

impl DuesEngine {
    pub fn new(config: DuesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DuesConfig {
        &self.config
    }

    /// whole-or-started months from `start` to `as_of`
    pub fn months_elapsed(&self, start: NaiveDate, as_of: NaiveDate) -> Result<i64> {
        calendar::months_elapsed(start, as_of)
    }
}

/// today's date according to the clock
pub(crate) fn today(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}

/// truncate toward zero into a count, saturating at the i64 bounds
pub(crate) fn whole(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::ledger::{Account, AccountDeposit, Iteration, Loan, LoanDeposit};
    use crate::types::{AccountDuesField, LoanDuesField};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn iteration() -> Iteration {
        Iteration::builder()
            .start_date(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap())
            .deposit_amount(Money::from_major(500))
            .no_of_months(24)
            .interest_rate(3)
            .late_deposit_fine(2)
            .build()
            .unwrap()
    }

    fn account_with(deposit_days: &[i64]) -> Account {
        let iteration = iteration();
        let mut account = Account::new(Uuid::new_v4(), iteration.clone());
        for days in deposit_days {
            account.record_deposit(AccountDeposit::new(
                iteration.start_date + chrono::Duration::days(*days),
                Money::from_major(500),
                Money::ZERO,
            ));
        }
        account
    }

    fn loan_with(deposit_days: &[i64]) -> Loan {
        let iteration = iteration();
        let mut loan = Loan::new(Uuid::new_v4(), iteration.clone(), Money::from_major(10_000)).unwrap();
        for days in deposit_days {
            loan.record_deposit(LoanDeposit::new(
                iteration.start_date + chrono::Duration::days(*days),
                Money::from_major(1_000),
                Money::from_major(300),
                Money::ZERO,
            ));
        }
        loan
    }

    #[test]
    fn test_whole_saturates() {
        assert_eq!(whole(rust_decimal_macros::dec!(2.9)), 2);
        assert_eq!(whole(rust_decimal_macros::dec!(-2.9)), -2);
        // a huge paid amount over a tiny deposit must not read as zero installments
        assert_eq!(whole(rust_decimal_macros::dec!(10000000000000000000000000)), i64::MAX);
        assert_eq!(whole(rust_decimal_macros::dec!(-10000000000000000000000000)), i64::MIN);
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = DuesConfig::standard();
        config.loan_installment_share = crate::decimal::Rate::ZERO;
        assert!(DuesEngine::new(config).is_err());
    }

    proptest! {
        #[test]
        fn prop_missed_installments_never_decrease(
            deposits in proptest::collection::vec(0i64..720, 0..8),
            first in 0i64..900,
            step in 0i64..400,
        ) {
            let engine = DuesEngine::default();
            let account = account_with(&deposits);
            let start = account.iteration.start_date;

            let earlier = engine
                .account_dues_as_of(&account, start + chrono::Duration::days(first))
                .unwrap();
            let later = engine
                .account_dues_as_of(&account, start + chrono::Duration::days(first + step))
                .unwrap();

            prop_assert!(later.total_installments_missed >= earlier.total_installments_missed);
        }

        #[test]
        fn prop_dues_are_idempotent(
            deposits in proptest::collection::vec(0i64..720, 0..8),
            offset in -60i64..900,
        ) {
            let engine = DuesEngine::default();
            let account = account_with(&deposits);
            let loan = loan_with(&deposits);
            let as_of = account.iteration.start_date + chrono::Duration::days(offset);

            prop_assert_eq!(
                engine.account_dues_as_of(&account, as_of).unwrap(),
                engine.account_dues_as_of(&account, as_of).unwrap()
            );
            prop_assert_eq!(
                engine.loan_dues_as_of(&loan, as_of).unwrap(),
                engine.loan_dues_as_of(&loan, as_of).unwrap()
            );
        }

        #[test]
        fn prop_single_fields_agree_with_breakdown(
            deposits in proptest::collection::vec(0i64..720, 0..8),
            offset in 0i64..900,
        ) {
            let engine = DuesEngine::default();
            let account = account_with(&deposits);
            let loan = loan_with(&deposits);
            let as_of = account.iteration.start_date + chrono::Duration::days(offset);

            let account_dues = engine.account_dues_as_of(&account, as_of).unwrap();
            prop_assert_eq!(
                account_dues.get(AccountDuesField::Total),
                account_dues.get(AccountDuesField::Principal) + account_dues.get(AccountDuesField::Penalty)
            );

            let loan_dues = engine.loan_dues_as_of(&loan, as_of).unwrap();
            prop_assert!(loan_dues.get(LoanDuesField::Installments) >= 1);
            prop_assert!(loan_dues.get(LoanDuesField::Principal) >= 0);
        }
    }
}
