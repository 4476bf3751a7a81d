//! Domain layer: models, error taxonomy, and collaborator ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{GatewayError, GatewayResult};
