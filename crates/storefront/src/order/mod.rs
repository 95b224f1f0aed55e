//! Order capture for a single diet plan.
//!
//! An [`OrderFlow`] is opened for the plan the customer picked, collects a
//! name and email, and inserts one pending order whose total is the plan's
//! price. There is no payment step and no idempotency key: a retry after an
//! ambiguous failure may create a second order.

mod error;
mod flow;

pub use error::{SubmitError, SubmitFailure, ValidationError};
pub use flow::{FlowState, OrderFlow, OrderForm, Quote, SubmissionState};

/// Shown when the insert fails.
pub const FAILURE_MESSAGE: &str = "Failed to place order. Please try again.";

/// Shown once the order has been placed.
pub const SUCCESS_MESSAGE: &str =
    "Thank you for your order. We'll send you an email with details shortly.";
