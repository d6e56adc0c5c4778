//! Web server module
//!
//! Exposes the delayed-flights search over HTTP, plus health and stats.

mod error;
mod handlers;
mod response;
mod routes;
mod state;

pub use error::ApiError;
pub use response::SearchResponseBody;
pub use routes::create_router;
pub use state::AppState;
