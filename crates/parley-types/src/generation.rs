//! Text-generation request types.

use serde::{Deserialize, Serialize};

/// Request to the external text-generation service.
///
/// The prompt already carries the full grounding context; the service is a
/// black box that turns it into a single completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_output_tokens: None,
        }
    }
}
