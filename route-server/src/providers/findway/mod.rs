//! Multimodal find-way backend client.

mod client;
mod convert;
mod types;

pub use client::{FindWayClient, FindWayConfig};
pub(crate) use convert::convert_find_way;
pub(crate) use types::FindWayResponse;
