//! receipt computation, persistence and rendering, kept as three separate steps
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::decimal::Money;
use crate::dues::DuesEngine;
use crate::errors::{DuesError, Result};
use crate::ledger::{Account, Customer, Loan};
use crate::types::{AccountId, CustomerId, LoanId, ReceiptId};

/// dues of one account as printed on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountLine {
    pub account_id: AccountId,
    pub installments_missed: i64,
    pub principal: Money,
    pub penalty: Money,
    pub total: Money,
}

/// dues of one loan as printed on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanLine {
    pub loan_id: LoanId,
    pub installments: i64,
    pub principal: Money,
    pub interest: Money,
    pub penalty: Money,
    pub total: Money,
}

/// the computed breakdown stored with a receipt
///
/// Each line's total is truncated once over its untruncated components, so the printed
/// components can fall short of it; `line_items` carries the gap as a rounding item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDetail {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub as_of: NaiveDate,
    pub accounts: Vec<AccountLine>,
    pub loans: Vec<LoanLine>,
    pub total: Money,
}

/// flat label/amount pair for tabular or printed output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Money,
}

impl ReceiptDetail {
    /// compute the breakdown for a customer's accounts and approved loans; no side effects
    pub fn compute(
        engine: &DuesEngine,
        customer: &Customer,
        accounts: &[Account],
        loans: &[Loan],
        as_of: NaiveDate,
    ) -> Result<Self> {
        let mut account_lines = Vec::new();
        for account in accounts.iter().filter(|a| a.customer_id == customer.id) {
            let dues = engine.account_dues_as_of(account, as_of)?;
            account_lines.push(AccountLine {
                account_id: account.id,
                installments_missed: dues.total_installments_missed,
                principal: dues.principal_dues,
                penalty: dues.penalty_dues,
                total: dues.total_dues,
            });
        }

        let mut loan_lines = Vec::new();
        for loan in loans
            .iter()
            .filter(|l| l.customer_id == customer.id && l.is_approved())
        {
            let dues = engine.loan_dues_as_of(loan, as_of)?;
            loan_lines.push(LoanLine {
                loan_id: loan.id,
                installments: dues.installments_dues,
                principal: dues.principal_dues,
                interest: dues.interest_dues,
                penalty: dues.penalty_dues,
                total: dues.total_dues,
            });
        }

        let total = account_lines.iter().map(|l| l.total).sum::<Money>()
            + loan_lines.iter().map(|l| l.total).sum::<Money>();

        Ok(Self {
            customer_id: customer.id,
            customer_name: customer.display_name(),
            as_of,
            accounts: account_lines,
            loans: loan_lines,
            total,
        })
    }

    /// ids of accounts covered by this receipt
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.iter().map(|l| l.account_id).collect()
    }

    /// render as line items in print order
    ///
    /// Every item before the trailing `Total` adds up to `total`.
    pub fn line_items(&self) -> Vec<LineItem> {
        let mut items = Vec::new();
        for line in &self.accounts {
            items.push(LineItem {
                label: format!("Account {} principal ({} missed)", line.account_id, line.installments_missed),
                amount: line.principal,
            });
            items.push(LineItem {
                label: format!("Account {} penalty", line.account_id),
                amount: line.penalty,
            });
            push_rounding(
                &mut items,
                format!("Account {} rounding", line.account_id),
                line.total - (line.principal + line.penalty),
            );
        }
        for line in &self.loans {
            items.push(LineItem {
                label: format!("Loan {} principal", line.loan_id),
                amount: line.principal,
            });
            items.push(LineItem {
                label: format!("Loan {} interest ({} installments)", line.loan_id, line.installments),
                amount: line.interest,
            });
            items.push(LineItem {
                label: format!("Loan {} penalty", line.loan_id),
                amount: line.penalty,
            });
            push_rounding(
                &mut items,
                format!("Loan {} rounding", line.loan_id),
                line.total - (line.principal + line.interest + line.penalty),
            );
        }
        items.push(LineItem {
            label: "Total".to_string(),
            amount: self.total,
        });
        items
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn push_rounding(items: &mut Vec<LineItem>, label: String, amount: Money) {
    if !amount.is_zero() {
        items.push(LineItem { label, amount });
    }
}

/// a persisted receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub customer_id: CustomerId,
    pub accounts: Vec<AccountId>,
    pub detail: ReceiptDetail,
}

/// persistence boundary for receipts
pub trait ReceiptStore {
    fn save(&self, receipt: Receipt) -> Result<Receipt>;

    fn get(&self, id: ReceiptId) -> Result<Option<Receipt>>;
}

/// in-memory receipt store
#[derive(Debug, Default)]
pub struct InMemoryReceiptStore {
    receipts: Mutex<HashMap<ReceiptId, Receipt>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ReceiptId, Receipt>>> {
        self.receipts.lock().map_err(|_| DuesError::ReceiptStore {
            message: "receipt store lock poisoned".to_string(),
        })
    }
}

impl ReceiptStore for InMemoryReceiptStore {
    fn save(&self, receipt: Receipt) -> Result<Receipt> {
        let mut receipts = self.lock()?;
        receipts.insert(receipt.id, receipt.clone());
        Ok(receipt)
    }

    fn get(&self, id: ReceiptId) -> Result<Option<Receipt>> {
        let receipts = self.lock()?;
        Ok(receipts.get(&id).cloned())
    }
}

/// compute the breakdown, persist it with a single write, and hand back the stored receipt
pub fn issue_receipt<S: ReceiptStore>(
    store: &S,
    engine: &DuesEngine,
    customer: &Customer,
    accounts: &[Account],
    loans: &[Loan],
    as_of: NaiveDate,
) -> Result<Receipt> {
    let detail = ReceiptDetail::compute(engine, customer, accounts, loans, as_of)?;
    let receipt = Receipt {
        id: Uuid::new_v4(),
        customer_id: customer.id,
        accounts: detail.account_ids(),
        detail,
    };
    let saved = store.save(receipt)?;
    info!(receipt_id = %saved.id, customer_id = %saved.customer_id, total = %saved.detail.total, "issued receipt");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Iteration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (Customer, Vec<Account>, Vec<Loan>) {
        fixture_with_loan(Money::from_major(10_000))
    }

    fn fixture_with_loan(loan_amount: Money) -> (Customer, Vec<Account>, Vec<Loan>) {
        let iteration = Iteration::builder()
            .start_date(date(2020, 9, 24))
            .deposit_amount(Money::from_major(500))
            .no_of_months(12)
            .interest_rate(3)
            .late_deposit_fine(1)
            .build()
            .unwrap();
        let customer = Customer::new("Asha", Some("Ward 4".to_string()), "9800000000");
        let accounts = vec![Account::new(customer.id, iteration.clone())];
        let loans = vec![Loan::new(customer.id, iteration, loan_amount).unwrap()];
        (customer, accounts, loans)
    }

    #[test]
    fn test_compute_is_pure() {
        let (customer, accounts, loans) = fixture();
        let engine = DuesEngine::default();

        let first = ReceiptDetail::compute(&engine, &customer, &accounts, &loans, date(2020, 12, 24)).unwrap();
        let second = ReceiptDetail::compute(&engine, &customer, &accounts, &loans, date(2020, 12, 24)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.customer_name, "Asha, Ward 4");
        // account: 1500 + 2 * 4; loan: 2000 + 600 + 100
        assert_eq!(first.accounts[0].total, Money::from_major(1_508));
        assert_eq!(first.loans[0].total, Money::from_major(2_700));
        assert_eq!(first.total, Money::from_major(4_208));
    }

    #[test]
    fn test_line_items_end_with_total() {
        let (customer, accounts, loans) = fixture();
        let engine = DuesEngine::default();
        let detail = ReceiptDetail::compute(&engine, &customer, &accounts, &loans, date(2020, 12, 24)).unwrap();

        let items = detail.line_items();

        assert_eq!(items.len(), 6);
        let last = items.last().unwrap();
        assert_eq!(last.label, "Total");
        assert_eq!(last.amount, detail.total);
        let itemised: Money = items[..items.len() - 1].iter().map(|i| i.amount).sum();
        assert_eq!(itemised, detail.total);

        let json = detail.to_json_pretty().unwrap();
        let parsed: ReceiptDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detail);
    }

    #[test]
    fn test_line_items_carry_truncation_gap() {
        let (customer, accounts, loans) = fixture_with_loan(Money::from_major(10_075));
        let engine = DuesEngine::default();
        let detail = ReceiptDetail::compute(&engine, &customer, &accounts, &loans, date(2020, 12, 24)).unwrap();

        // loan: trunc(2015 + 604.5 + 100.75) = 2720, printed parts 2015 + 604 + 100
        let loan = &detail.loans[0];
        assert_eq!(loan.interest, Money::from_major(604));
        assert_eq!(loan.penalty, Money::from_major(100));
        assert_eq!(loan.total, Money::from_major(2_720));
        assert_eq!(detail.total, Money::from_major(4_228));

        let items = detail.line_items();
        assert_eq!(items.len(), 7);
        let rounding = &items[5];
        assert_eq!(rounding.label, format!("Loan {} rounding", loan.loan_id));
        assert_eq!(rounding.amount, Money::from_major(1));

        let itemised: Money = items[..items.len() - 1].iter().map(|i| i.amount).sum();
        assert_eq!(itemised, detail.total);
    }

    #[test]
    fn test_poisoned_store_reports_error() {
        let store = std::sync::Arc::new(InMemoryReceiptStore::new());
        let shared = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.receipts.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(DuesError::ReceiptStore { .. })));
        assert!(store.is_empty().is_err());
        assert!(store.get(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_issue_receipt_writes_once() {
        let (customer, accounts, loans) = fixture();
        let engine = DuesEngine::default();
        let store = InMemoryReceiptStore::new();

        let receipt = issue_receipt(&store, &engine, &customer, &accounts, &loans, date(2020, 12, 24)).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.is_empty().unwrap());
        assert_eq!(receipt.accounts, vec![accounts[0].id]);
        assert_eq!(store.get(receipt.id).unwrap(), Some(receipt.clone()));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);
    }
}
