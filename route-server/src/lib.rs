//! Multi-criteria route evaluation server.
//!
//! Fetches alternative routes between two points, scores each one on travel
//! time, distance, pollution exposure, emissions and health, and ranks them
//! by the criterion the user picked. Interactive sessions keep the ranked
//! set and the user's selection consistent while inputs change.

pub mod air;
pub mod config;
pub mod domain;
pub mod engine;
pub mod providers;
pub mod searchlog;
pub mod selection;
pub mod web;
