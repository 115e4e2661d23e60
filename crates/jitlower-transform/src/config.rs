use crate::scalar_type::ScalarType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweringConfig {
    pub function_name: String,
    pub on_unsupported: UnsupportedPolicy,
    /// Element kind for graph tensor inputs that carry no dtype.
    pub default_dtype: ScalarType,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            function_name: "main".to_string(),
            on_unsupported: UnsupportedPolicy::Abort,
            default_dtype: ScalarType::Float,
        }
    }
}

/// What the driver does with a node it cannot lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    #[default]
    Abort,
    /// Record the node and keep going; its outputs stay unmapped.
    Skip,
}
