//! Web layer for the route evaluation server.
//!
//! Provides JSON endpoints for one-off route planning and for interactive
//! selection sessions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, DEFAULT_SESSION_IDLE};
