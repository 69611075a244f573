//! Text-generation port and the resilient wrapper around it.
//!
//! `TextGenerator` is the narrow contract the infrastructure layer
//! implements. `ResilientGenerator` is what the engine actually calls: it
//! never errors. Any failure is logged and replaced with a fixed apology so
//! the conversation keeps flowing -- fail-open, no retries.

use parley_types::error::GenerationError;
use parley_types::generation::GenerationRequest;

/// The apology substituted for any generation failure, byte-for-byte.
pub const GENERATION_APOLOGY: &str = "I apologize, but I'm having trouble \
processing your request right now. Could you please try again in a few \
moments or let us know if you need human assistance?";

/// Trait for text-generation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in `parley-infra` (e.g. `GeminiClient`).
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and receive the completion text.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}

/// Wraps a generator so that failures never propagate past the turn.
pub struct ResilientGenerator<G: TextGenerator> {
    inner: G,
}

impl<G: TextGenerator> ResilientGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Generate a response, absorbing any failure into the fixed apology.
    pub async fn generate(&self, request: &GenerationRequest) -> String {
        match self.inner.generate(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    backend = self.inner.name(),
                    error = %err,
                    "Generation failed, substituting apology"
                );
                GENERATION_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockGenerator {
        result: Result<String, fn() -> GenerationError>,
    }

    impl TextGenerator for MockGenerator {
        fn name(&self) -> &str {
            "mock"
        }

        fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send {
            let result = match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            };
            async move { result }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("test-model", "prompt")
    }

    #[tokio::test]
    async fn success_passes_through() {
        let generator = ResilientGenerator::new(MockGenerator {
            result: Ok("the answer".to_string()),
        });
        assert_eq!(generator.generate(&request()).await, "the answer");
    }

    #[tokio::test]
    async fn timeout_becomes_exact_apology() {
        let generator = ResilientGenerator::new(MockGenerator {
            result: Err(|| GenerationError::Timeout),
        });
        assert_eq!(generator.generate(&request()).await, GENERATION_APOLOGY);
    }

    #[tokio::test]
    async fn every_failure_class_becomes_exact_apology() {
        let failures: Vec<fn() -> GenerationError> = vec![
            || GenerationError::RateLimited,
            || GenerationError::AuthenticationFailed,
            || GenerationError::Provider {
                message: "503".to_string(),
            },
            || GenerationError::Deserialization("bad json".to_string()),
        ];
        for make in failures {
            let generator = ResilientGenerator::new(MockGenerator { result: Err(make) });
            let text = generator.generate(&request()).await;
            assert_eq!(text, GENERATION_APOLOGY);
        }
    }
}
