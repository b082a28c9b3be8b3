//! Directions provider client.

mod client;
mod convert;
mod types;

pub use client::{DirectionsClient, DirectionsConfig};
pub(crate) use convert::convert_directions;
pub(crate) use types::DirectionsResponse;
