use serde::Serialize;
use serde_json::Value;

/// Result of a guarded state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transition {
    /// The object was already in the requested state; nothing was sent.
    NoChangeRequired(String),
    /// Raw cluster response to the mutating call.
    Applied(Value),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}
