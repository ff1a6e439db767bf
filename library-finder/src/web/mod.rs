//! Web layer for the library finder.
//!
//! Provides JSON endpoints for finding the nearest libraries to a postcode
//! or a latitude/longitude pair.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
