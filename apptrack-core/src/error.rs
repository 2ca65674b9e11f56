//! Unified error handling
//!
//! Structured error types with context for debugging and proper error chaining

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }
}

/// Main error type for the apptrack system
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },
}

impl CoreError {
    pub fn config(message: impl Into<String>, component: &str) -> Self {
        CoreError::Config {
            message: message.into(),
            context: ErrorContext::new(component),
        }
    }

    pub fn validation(message: impl Into<String>, field: Option<&str>, component: &str) -> Self {
        CoreError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
            context: ErrorContext::new(component),
        }
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            CoreError::Config { context, .. } => context,
            CoreError::Validation { context, .. } => context,
        }
    }

    /// Log the error with its tracking id
    pub fn log(&self) {
        error!(
            error_id = %self.context().error_id,
            error = %self,
            "Error occurred"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_component_and_operation() {
        let err = CoreError::config("missing setting", "config");
        err.log();
        match err {
            CoreError::Config { context, .. } => {
                assert_eq!(context.component, "config");
                assert!(context.operation.is_none());
            }
            _ => panic!("expected config error"),
        }
    }

    #[test]
    fn validation_error_keeps_field() {
        let err = CoreError::validation("not a valid role", Some("role"), "types");
        match err {
            CoreError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("role")),
            _ => panic!("expected validation error"),
        }
    }
}
