//! Inventory store records, the data behind the inventory service.

pub mod entity;
pub mod error;

pub use error::*;
