use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::chat::prompt::DEFAULT_CITY;

// =========================================================================
// Requests
// =========================================================================

/// POST /chat body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

// =========================================================================
// Responses
// =========================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
