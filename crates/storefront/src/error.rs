//! Unified error handling with Sentry integration.
//!
//! Library calls return their own error types; front-ends convert them into
//! [`AppError`], report the ones worth an event, and show the customer
//! [`AppError::user_message`].

use thiserror::Error;

use crate::catalog::LoadFailure;
use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::order::{FAILURE_MESSAGE, SubmitError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data service operation failed.
    #[error("Data service error: {0}")]
    Gateway(#[from] GatewayError),

    /// A catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Load(#[from] LoadFailure),

    /// An order could not be placed.
    #[error("Order error: {0}")]
    Submit(#[from] SubmitError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this error indicates a fault on our side or the data
    /// service's, rather than bad input.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Gateway(_)
                | Self::Load(_)
                | Self::Submit(SubmitError::Failed(_))
        )
    }

    /// Capture faults to Sentry and log them.
    pub fn report(&self) {
        if self.is_fault() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
    }

    /// Message safe to show the customer.
    ///
    /// Data service details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(_) | Self::Load(_) => {
                "We couldn't load the store right now. Please try again later.".to_string()
            }
            Self::Submit(SubmitError::Failed(_)) => FAILURE_MESSAGE.to_string(),
            Self::Submit(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::ValidationError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("diet plan 42".to_string());
        assert_eq!(err.to_string(), "Not found: diet plan 42");
    }

    #[test]
    fn test_user_message_hides_gateway_details() {
        let err = AppError::from(GatewayError::Api {
            status: 500,
            message: "relation \"orders\" does not exist".to_string(),
        });
        assert!(err.is_fault());
        assert!(!err.user_message().contains("relation"));
    }

    #[test]
    fn test_user_message_for_failed_order() {
        let failure = crate::order::SubmitFailure::new(GatewayError::Unavailable(
            "timeout".to_string(),
        ));
        let err = AppError::from(SubmitError::Failed(failure));
        assert_eq!(err.user_message(), FAILURE_MESSAGE);
    }

    #[test]
    fn test_validation_is_not_a_fault() {
        let err = AppError::from(SubmitError::from(ValidationError::EmptyName));
        assert!(!err.is_fault());
        assert_eq!(err.user_message(), "Please enter your name");
    }
}
