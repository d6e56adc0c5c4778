//! Flight search module
//!
//! Named search operations over the flight index, their typed parameters,
//! and the errors they report.

mod error;
mod executor;
pub mod intents;
mod models;

pub use error::{QueryError, QueryErrorKind, ValidationError};
pub use executor::QueryService;
pub use models::{DateRange, FlightCriteria, Operation, PriceRange};
