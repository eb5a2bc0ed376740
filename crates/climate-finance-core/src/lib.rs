//! Risk-adjusted valuation and cash-flow forecasting for climate
//! receivables.
//!
//! Three components, data flowing one direction:
//! configuration store → risk scoring engine → cash-flow forecast generator.
//! The forecast generator consumes receivables' already-attached risk scores
//! directly; it never re-invokes the scoring engine.

pub mod config;
pub mod error;
pub mod forecast;
pub mod risk;
pub mod types;

pub use error::ClimateFinanceError;
pub use types::*;

/// Standard result type for all climate-finance operations
pub type ClimateFinanceResult<T> = Result<T, ClimateFinanceError>;
