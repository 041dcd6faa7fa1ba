pub mod cluster;
pub mod config;
pub mod error;
pub mod metrics;
pub mod quantity;
pub mod render;
pub mod snapshot;

pub use error::{Error, Listing, Result};
