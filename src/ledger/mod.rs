pub mod account;
pub mod customer;
pub mod iteration;
pub mod loan;

pub use account::{Account, AccountDeposit};
pub use customer::Customer;
pub use iteration::{Iteration, IterationBuilder};
pub use loan::{Loan, LoanDeposit};
