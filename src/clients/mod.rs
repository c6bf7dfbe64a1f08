//! Typed clients: thin wrappers over the store actors, the remote inventory
//! endpoint, and the catalog read path that ties them together.

#[macro_use]
mod macros;

pub mod product_client;
pub mod inventory_store_client;
pub mod inventory_endpoint;
pub mod inventory_client;
pub mod catalog_client;

pub use product_client::*;
pub use inventory_store_client::*;
pub use inventory_endpoint::*;
pub use inventory_client::*;
pub use catalog_client::*;
