use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{GenerationSettings, VertexConfig};

use super::types::{ChatError, ProviderMessage};

/// Boxed future returned by the provider traits.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ChatError>> + Send + 'a>>;

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM providers. A provider takes the full provider-native turn
/// list plus sampling settings and returns the generated text.
pub trait LlmProvider: Send + Sync {
    /// Generate a reply. An empty string means the provider produced no text.
    fn generate<'a>(
        &'a self,
        contents: &'a [ProviderMessage],
        settings: &'a GenerationSettings,
    ) -> ProviderFuture<'a, String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Access tokens
// ---------------------------------------------------------------------------

/// Source of OAuth bearer tokens for the Vertex AI API.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> ProviderFuture<'_, String>;
}

/// A fixed token, e.g. from `gcloud auth print-access-token`.
#[derive(Debug)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn token(&self) -> ProviderFuture<'_, String> {
        Box::pin(async move { Ok(self.0.clone()) })
    }
}

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Fetches the default service account token from the GCE / Cloud Run
/// metadata server on every call.
#[derive(Debug)]
pub struct MetadataServerToken {
    url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

impl MetadataServerToken {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl TokenSource for MetadataServerToken {
    fn token(&self) -> ProviderFuture<'_, String> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .header("Metadata-Flavor", "Google")
                .send()
                .await
                .map_err(|e| ChatError::Auth(e.to_string()))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(ChatError::Auth(format!(
                    "metadata server returned {status}: {text}"
                )));
            }

            let parsed: MetadataTokenResponse = resp
                .json()
                .await
                .map_err(|e| ChatError::Auth(e.to_string()))?;
            Ok(parsed.access_token)
        })
    }
}

/// Pick the token source for a configuration.
pub fn token_source_for(config: &VertexConfig) -> Arc<dyn TokenSource> {
    match &config.access_token {
        Some(token) => Arc::new(StaticToken(token.clone())),
        None => Arc::new(MetadataServerToken::with_url(METADATA_TOKEN_URL)),
    }
}

// ---------------------------------------------------------------------------
// Vertex AI Gemini provider
// ---------------------------------------------------------------------------

pub struct VertexProvider {
    project_id: Option<String>,
    location: String,
    model: String,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [ProviderMessage],
    generation_config: &'a GenerationSettings,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate; empty when blocked or missing.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl VertexProvider {
    pub fn new(config: &VertexConfig) -> Self {
        Self::with_token_source(config, token_source_for(config))
    }

    pub fn with_token_source(config: &VertexConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            model: config.model.clone(),
            base_url: config.endpoint_base(),
            tokens,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Full `generateContent` URL for the configured project and model.
    pub fn generate_url(&self) -> Result<String, ChatError> {
        let project = self
            .project_id
            .as_deref()
            .ok_or(ChatError::MissingProjectId)?;
        Ok(format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, project, self.location, self.model
        ))
    }
}

impl LlmProvider for VertexProvider {
    fn generate<'a>(
        &'a self,
        contents: &'a [ProviderMessage],
        settings: &'a GenerationSettings,
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let url = self.generate_url()?;
            let token = self.tokens.token().await?;

            let body = GenerateRequest {
                contents,
                generation_config: settings,
            };

            let resp = self
                .client
                .post(&url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await
                .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let text = resp.text().await.unwrap_or_default();
                return Err(ChatError::ProviderError { status, body: text });
            }

            let parsed: GenerateResponse = resp
                .json()
                .await
                .map_err(|e| ChatError::ParseError(e.to_string()))?;

            Ok(parsed.into_text())
        })
    }

    fn name(&self) -> &str {
        "vertex-gemini"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
