/// quick start - savings account and loan dues for one customer
use microfinance_dues::chrono::NaiveDate;
use microfinance_dues::{
    issue_receipt, Account, AccountDeposit, Customer, DuesEngine, InMemoryReceiptStore, Iteration,
    Loan, LoanDeposit, LoanDuesField, Money, PortfolioProjection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let start = NaiveDate::from_ymd_opt(2020, 9, 24).ok_or("bad start date")?;
    let as_of = NaiveDate::from_ymd_opt(2021, 1, 24).ok_or("bad as-of date")?;

    // 12 month program, 500 per month, 3% interest, 2% late fine
    let iteration = Iteration::builder()
        .start_date(start)
        .deposit_amount(Money::from_major(500))
        .no_of_months(12)
        .interest_rate(3)
        .late_deposit_fine(2)
        .return_amount(Money::from_major(6_600))
        .build()?;

    let customer = Customer::new("Asha", Some("Ward 4".to_string()), "9800000000");

    let mut account = Account::new(customer.id, iteration.clone());
    account.record_deposit(AccountDeposit::new(start, Money::from_major(500), Money::ZERO));

    let mut loan = Loan::new(customer.id, iteration.clone(), Money::from_major(10_000))?;
    loan.record_deposit(LoanDeposit::new(
        iteration.due_date(1)?,
        Money::from_major(1_000),
        Money::from_major(300),
        Money::ZERO,
    ));

    let engine = DuesEngine::default();

    let account_dues = engine.account_dues_as_of(&account, as_of)?;
    println!("account dues: {}", serde_json::to_string_pretty(&account_dues)?);

    let loan_dues = engine.loan_dues_as_of(&loan, as_of)?;
    println!("loan interest due: {}", loan_dues.get(LoanDuesField::Interest));

    for row in engine.loan_schedule_as_of(&loan, as_of)? {
        println!("{} {} paid={}", row.period, row.due_date, row.paid);
    }

    let accounts = vec![account];
    let loans = vec![loan];

    let projection = PortfolioProjection::build(&iteration, &accounts, &loans)?;
    println!(
        "threshold {} optimum {}",
        projection.threshold_amount, projection.optimum_amount
    );

    let store = InMemoryReceiptStore::new();
    let receipt = issue_receipt(&store, &engine, &customer, &accounts, &loans, as_of)?;
    for item in receipt.detail.line_items() {
        println!("{:<60} {}", item.label, item.amount);
    }

    Ok(())
}
