//! Error types for the intent/history engine.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the public engine API.
///
/// Most runtime conditions are total by construction: unknown intents fall
/// back to the identity transition, navigation clamps, and sends without
/// subscribers are dropped. What remains are caller mistakes.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No action creator with this name was registered on the connector.
    #[error("Action '{name}' is not registered")]
    UnknownAction { name: String },

    /// A future-sourced action was started outside a tokio runtime.
    #[error("Future-sourced actions require a running tokio runtime")]
    NoRuntime,

    /// The instance was unmounted before the operation ran.
    #[error("Instance {instance} is unmounted")]
    Unmounted { instance: String },

    /// A value could not be interpreted as a props object.
    #[error("Invalid props: {0}")]
    InvalidProps(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Short machine-readable tag, used in log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            EngineError::UnknownAction { .. } => "unknown_action",
            EngineError::NoRuntime => "no_runtime",
            EngineError::Unmounted { .. } => "unmounted",
            EngineError::InvalidProps(_) => "invalid_props",
            EngineError::Config(_) => "config_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_message_names_the_action() {
        let err = EngineError::UnknownAction {
            name: "explode".to_string(),
        };
        assert_eq!(err.to_string(), "Action 'explode' is not registered");
        assert_eq!(err.error_type(), "unknown_action");
    }

    #[test]
    fn config_error_converts() {
        let err: EngineError = ConfigError::ValidationError {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.error_type(), "config_error");
        assert!(err.to_string().contains("bad"));
    }
}
