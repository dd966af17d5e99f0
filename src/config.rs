/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Upstream model settings.
    pub vertex: VertexConfig,
    /// Sampling parameters sent with every generation request.
    pub generation: GenerationSettings,
    /// Append the raw provider error to the fallback answer.
    pub expose_error_detail: bool,
    /// Request body cap in bytes; `None` leaves bodies unbounded.
    pub max_body_bytes: Option<usize>,
}

/// Where and how to reach the Vertex AI generation endpoint.
#[derive(Debug, Clone)]
pub struct VertexConfig {
    /// GCP project id. Calls fail per-request while this is unset.
    pub project_id: Option<String>,
    pub location: String,
    pub model: String,
    /// Overrides the regional `https://{location}-aiplatform.googleapis.com` host.
    pub base_url: Option<String>,
    /// Static bearer token; the metadata server is used when absent.
    pub access_token: Option<String>,
    /// Upper bound on a single generation call, in milliseconds.
    pub timeout_ms: u64,
}

/// Fixed generation parameters (Gemini `generationConfig`).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        AppConfig {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            host: non_empty("HOST").unwrap_or(defaults.host),
            vertex: VertexConfig {
                project_id: non_empty("PROJECT_ID"),
                location: non_empty("LOCATION").unwrap_or(defaults.vertex.location),
                model: non_empty("MODEL_NAME").unwrap_or(defaults.vertex.model),
                base_url: non_empty("VERTEX_BASE_URL"),
                access_token: non_empty("GOOGLE_ACCESS_TOKEN"),
                timeout_ms: parse_var(&lookup, "PROVIDER_TIMEOUT_MS")
                    .unwrap_or(defaults.vertex.timeout_ms),
            },
            generation: GenerationSettings {
                temperature: parse_var(&lookup, "TEMPERATURE")
                    .unwrap_or(defaults.generation.temperature),
                max_output_tokens: parse_var(&lookup, "MAX_TOKENS")
                    .unwrap_or(defaults.generation.max_output_tokens),
                top_p: parse_var(&lookup, "TOP_P").unwrap_or(defaults.generation.top_p),
                top_k: parse_var(&lookup, "TOP_K").unwrap_or(defaults.generation.top_k),
            },
            expose_error_detail: lookup("EXPOSE_ERROR_DETAIL")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.expose_error_detail),
            max_body_bytes: parse_var(&lookup, "MAX_BODY_BYTES")
                .filter(|&n: &usize| n > 0)
                .or(defaults.max_body_bytes),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl VertexConfig {
    /// Base URL for API calls, without a trailing slash.
    pub fn endpoint_base(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8080,
            host: "0.0.0.0".to_string(),
            vertex: VertexConfig::default(),
            generation: GenerationSettings::default(),
            expose_error_detail: true,
            max_body_bytes: None,
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        VertexConfig {
            project_id: None,
            location: "asia-southeast2".to_string(),
            model: "gemini-1.5-flash-001".to_string(),
            base_url: None,
            access_token: None,
            timeout_ms: 30_000,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            temperature: 0.6,
            max_output_tokens: 512,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.vertex.project_id.is_none());
        assert_eq!(config.vertex.location, "asia-southeast2");
        assert_eq!(config.vertex.model, "gemini-1.5-flash-001");
        assert_eq!(config.generation.max_output_tokens, 512);
        assert_eq!(config.generation.top_k, 40);
        assert!(config.expose_error_detail);
        assert!(config.max_body_bytes.is_none());
    }

    #[test]
    fn empty_lookup_falls_back_to_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.vertex.timeout_ms, 30_000);
        assert_eq!(config.generation, GenerationSettings::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("PROJECT_ID", "malang-app"),
            ("LOCATION", "us-central1"),
            ("MODEL_NAME", "gemini-1.5-pro"),
            ("TEMPERATURE", "0.2"),
            ("MAX_TOKENS", "1024"),
            ("TOP_P", "0.5"),
            ("TOP_K", "20"),
            ("PROVIDER_TIMEOUT_MS", "1500"),
            ("EXPOSE_ERROR_DETAIL", "false"),
            ("MAX_BODY_BYTES", "10485760"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.vertex.project_id.as_deref(), Some("malang-app"));
        assert_eq!(config.vertex.location, "us-central1");
        assert_eq!(config.vertex.model, "gemini-1.5-pro");
        assert_eq!(config.vertex.timeout_ms, 1500);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert_eq!(config.generation.top_p, 0.5);
        assert_eq!(config.generation.top_k, 20);
        assert!(!config.expose_error_detail);
        assert_eq!(config.max_body_bytes, Some(10 * 1024 * 1024));
    }

    #[test]
    fn zero_or_invalid_body_limit_is_unbounded() {
        let zero = AppConfig::from_lookup(lookup_from(&[("MAX_BODY_BYTES", "0")]));
        assert!(zero.max_body_bytes.is_none());
        let junk = AppConfig::from_lookup(lookup_from(&[("MAX_BODY_BYTES", "lots")]));
        assert!(junk.max_body_bytes.is_none());
    }

    #[test]
    fn invalid_numbers_use_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("TEMPERATURE", "warm"),
            ("TOP_K", "-3"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.generation.temperature, 0.6);
        assert_eq!(config.generation.top_k, 40);
    }

    #[test]
    fn blank_project_id_is_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("PROJECT_ID", "  ")]));
        assert!(config.vertex.project_id.is_none());
    }

    #[test]
    fn endpoint_base_uses_region_or_override() {
        let mut vertex = VertexConfig::default();
        assert_eq!(
            vertex.endpoint_base(),
            "https://asia-southeast2-aiplatform.googleapis.com"
        );
        vertex.base_url = Some("http://127.0.0.1:9999/".to_string());
        assert_eq!(vertex.endpoint_base(), "http://127.0.0.1:9999");
    }

    #[test]
    fn generation_settings_serialize_camel_case() {
        let json = serde_json::to_value(GenerationSettings::default()).unwrap();
        assert_eq!(json["maxOutputTokens"], 512);
        assert_eq!(json["topK"], 40);
        assert!(json.get("topP").is_some());
        assert!(json.get("temperature").is_some());
    }
}
