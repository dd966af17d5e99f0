use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, GenerationSettings};

use super::prompt;
use super::providers::{LlmProvider, VertexProvider};
use super::types::{ChatError, ChatMessage};

/// Apology shown to the user when the provider call fails.
pub const FALLBACK_ANSWER: &str =
    "Maaf, layanan sedang mengalami gangguan. Silakan coba lagi nanti.";

// ---------------------------------------------------------------------------
// ChatService
// ---------------------------------------------------------------------------

/// Relays a conversation to the provider and always produces an answer.
pub struct ChatService {
    provider: Arc<dyn LlmProvider>,
    generation: GenerationSettings,
    timeout: Duration,
    expose_error_detail: bool,
}

impl ChatService {
    /// Create a service backed by an arbitrary provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Arc<Self> {
        Arc::new(Self {
            provider,
            generation: config.generation,
            timeout: Duration::from_millis(config.vertex.timeout_ms),
            expose_error_detail: config.expose_error_detail,
        })
    }

    /// Create a service talking to Vertex AI as configured.
    pub fn from_config(config: &AppConfig) -> Arc<Self> {
        Self::new(Arc::new(VertexProvider::new(&config.vertex)), config)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate an answer, bounded by the configured timeout.
    pub async fn generate(
        &self,
        city: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let contents = prompt::build_contents(city, messages);
        tracing::debug!(
            provider = self.provider.name(),
            turns = contents.len(),
            city,
            "sending generation request"
        );

        match tokio::time::timeout(
            self.timeout,
            self.provider.generate(&contents, &self.generation),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Generate an answer, replacing any failure with the fallback text.
    pub async fn answer(&self, city: &str, messages: &[ChatMessage]) -> String {
        match self.generate(city, messages).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(provider = self.provider.name(), error = %e, "generation failed");
                self.fallback_for(&e)
            }
        }
    }

    fn fallback_for(&self, err: &ChatError) -> String {
        if self.expose_error_detail {
            format!("{FALLBACK_ANSWER}\n(Detail teknis: {err})")
        } else {
            FALLBACK_ANSWER.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
