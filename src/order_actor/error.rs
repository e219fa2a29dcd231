use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::error::{ApiError, ValidationError};

/// Errors surfaced to whoever triggered an order-item operation.
///
/// None of them change the cached view.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderItemError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Another action is already in flight for order item {0}")]
    ActionInFlight(String),
    #[error("Request failed: {0}")]
    Api(#[from] ApiError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderItemError {
    fn from(err: FrameworkError) -> Self {
        OrderItemError::ActorCommunicationError(err.to_string())
    }
}
