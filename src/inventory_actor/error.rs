use thiserror::Error;
use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Inventory item not found: {0}")]
    NotFound(String),
    #[error("Inventory item already exists: {0}")]
    AlreadyExists(String),
    #[error("Inventory validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for InventoryError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(code) => InventoryError::NotFound(code),
            FrameworkError::AlreadyExists(code) => InventoryError::AlreadyExists(code),
            FrameworkError::Rejected(reason) => InventoryError::ValidationError(reason),
            other => InventoryError::ActorCommunicationError(other.to_string()),
        }
    }
}
