use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do with a field whose tag key is empty (`json:",omitempty"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKeyPolicy {
    /// Emit the value under `""`. Later empty-keyed fields overwrite it.
    #[default]
    Keep,
    /// Fail the conversion with `Error::EmptyKey`.
    Reject,
}

/// Conversion options.
///
/// Can be built in code or loaded from a JSON document:
///
/// ```json
/// { "tag": "map", "method": "ToMap", "empty_key": "reject" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tag namespace to read (`json`, `map`, ...).
    pub tag: String,

    /// Name of the override hook. `None` or empty disables hooks.
    pub method: Option<String>,

    pub empty_key: EmptyKeyPolicy,
}

fn default_tag() -> String {
    "json".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            method: None,
            empty_key: EmptyKeyPolicy::default(),
        }
    }
}

impl Options {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_empty_key(mut self, policy: EmptyKeyPolicy) -> Self {
        self.empty_key = policy;
        self
    }

    /// Hook name, empty when hooks are disabled.
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or_default()
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
