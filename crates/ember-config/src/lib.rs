//! Configuration for ember.
//!
//! Settings live in a TOML file in the platform config directory
//! (`config.toml` under the `ember` project dirs). Every section is
//! optional; anything missing falls back to its default.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{Config, HeadlineConfig};
