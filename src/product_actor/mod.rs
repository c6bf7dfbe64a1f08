//! Product store records: how catalog products live inside a `StoreActor`.

pub mod entity;
pub mod error;

pub use error::*;
