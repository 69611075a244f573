//! Engine tunables loaded from `config.toml`.
//!
//! Every field has a default so a missing or malformed file never blocks
//! startup; credentials are NOT configured here (they come from the
//! environment and are fatal when absent).

use serde::{Deserialize, Serialize};

/// Tunable knobs for the dialogue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many recent messages feed the grounding prompt's context window.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Bounded timeout (seconds) for remote store and generation calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Model identifier passed to the generation service.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Base URL the purchase action redirects to; the selected category is
    /// appended as a `service` query parameter.
    #[serde(default = "default_purchase_url")]
    pub purchase_url: String,
}

fn default_history_window() -> usize {
    15
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_purchase_url() -> String {
    "/services/purchase".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            request_timeout_secs: default_request_timeout_secs(),
            generation_model: default_generation_model(),
            purchase_url: default_purchase_url(),
        }
    }
}
