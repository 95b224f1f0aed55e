//! Order submission errors.

use std::sync::Arc;

use thiserror::Error;
use vegore_core::EmailError;

use crate::gateway::GatewayError;

/// Form input that cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name")]
    EmptyName,

    #[error("Please enter a valid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// A submission the data service did not accept.
///
/// `message` is shown to the customer; `cause` is kept for diagnostics.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SubmitFailure {
    pub message: String,
    #[source]
    pub cause: Arc<GatewayError>,
}

impl SubmitFailure {
    pub(crate) fn new(cause: GatewayError) -> Self {
        Self {
            message: super::FAILURE_MESSAGE.to_string(),
            cause: Arc::new(cause),
        }
    }
}

/// Why a call on an order flow did not go through.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// The form is incomplete; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The insert was attempted and failed.
    #[error(transparent)]
    Failed(SubmitFailure),

    #[error("This order has already been placed")]
    AlreadySubmitted,

    #[error("The order is still being placed")]
    InProgress,

    #[error("The order form is closed")]
    Closed,

    /// Cancel requested while an insert is in flight.
    #[error("The order cannot be cancelled while it is being placed")]
    NotCancellable,
}
