//! Web layer for the flight search service.
//!
//! Provides JSON endpoints for airport lookup and flight search, and serves
//! the airport dataset as a static file.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
