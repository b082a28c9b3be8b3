//! Interactive route selection sessions.
//!
//! A session tracks the user's endpoints, mode and criterion, keeps the
//! ranked candidates of the latest fetch and the selected route. Only the
//! newest request may update it; see [`SelectionState::apply`].

mod debounce;
mod error;
mod manager;
mod state;

pub use debounce::Debouncer;
pub use error::SelectionError;
pub use manager::SelectionHandle;
pub use state::{
    Applied, Effect, FetchRequest, NO_ROUTE_MESSAGE, SelectionState, Snapshot, Status,
};
