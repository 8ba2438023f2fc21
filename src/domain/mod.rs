//! Domain layer for the Wayfinder conversation engine.
//!
//! This module contains core business logic: domain models and the port
//! traits external collaborators must implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AckError, GenerationError, TransportError};
