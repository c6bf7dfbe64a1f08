//! System wiring, configuration, startup and shutdown.

pub mod catalog_system;
pub mod config;
pub mod tracing;
pub mod error;

pub use catalog_system::*;
pub use config::*;
pub use self::tracing::*;
pub use error::*;
