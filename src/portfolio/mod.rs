pub mod customer;
pub mod projection;

pub use customer::CustomerDues;
pub use projection::{optimum_amount, threshold_amount, PortfolioProjection, ProjectionPoint};
