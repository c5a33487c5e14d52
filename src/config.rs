use crate::replicate::DEFAULT_API_BASE;
use std::env;

pub const MODEL_REF: &str = "black-forest-labs/flux-kontext-pro";
pub const DEFAULT_PROMPT: &str = "Make this a 90s cartoon";

/// Built once at startup and shared read-only with every request handler.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Absence does not abort startup; edit requests fail until it is set.
    pub api_token: Option<String>,
    pub api_base: String,
    pub model_ref: String,
    pub default_prompt: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let api_token = env::var("REPLICATE_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        Self {
            api_token,
            api_base: DEFAULT_API_BASE.to_string(),
            model_ref: MODEL_REF.to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}
