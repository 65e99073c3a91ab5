//! Intents and the per-instance intent channel.

mod channel;

pub use channel::{IntentChannel, IntentSender, IntentStream};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A discrete, tagged action request entering the state pipeline.
///
/// Serializes as `{"type": "...", "value": ...}`; `value` is omitted when null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    value: Value,
}

impl Intent {
    /// An intent without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Value::Null,
        }
    }

    /// An intent carrying a payload.
    pub fn with_value(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}
