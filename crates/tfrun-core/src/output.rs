//! Workspace outputs read from a state snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named value exported by the provisioned configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Output name, unique within a snapshot.
    pub name: String,

    /// Type label reported by the platform (`string`, `array`, ...).
    #[serde(rename = "type", default)]
    pub output_type: String,

    /// Whether the value must be redacted from logs.
    #[serde(default)]
    pub sensitive: bool,

    /// The raw value.
    #[serde(default)]
    pub value: Value,
}

impl Output {
    /// Create a new, non-sensitive Output.
    pub fn new(name: impl Into<String>, output_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            output_type: output_type.into(),
            sensitive: false,
            value,
        }
    }

    /// Builder method to flag the output as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// All outputs of one snapshot read, in platform order.
pub type OutputSet = Vec<Output>;
