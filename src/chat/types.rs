use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client-side conversation
// ---------------------------------------------------------------------------

/// Conversational role as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Role used upstream, or `None` for roles folded into the priming turn.
    pub fn to_provider(self) -> Option<ProviderRole> {
        match self {
            Role::User => Some(ProviderRole::User),
            Role::Assistant => Some(ProviderRole::Model),
            Role::System => None,
        }
    }
}

/// A single message of the client's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider-native conversation (Gemini `Content`)
// ---------------------------------------------------------------------------

/// The two roles accepted by the generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One turn in the provider's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: ProviderRole,
    pub parts: Vec<Part>,
}

impl ProviderMessage {
    pub fn text(role: ProviderRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// All parts joined, for inspection and logging.
    pub fn joined_text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the generation API.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("PROJECT_ID is not set")]
    MissingProjectId,

    #[error("failed to obtain access token: {0}")]
    Auth(String),

    #[error("request to provider failed: {0}")]
    RequestFailed(String),

    #[error("provider returned {status}: {body}")]
    ProviderError { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    ParseError(String),

    #[error("provider did not answer within {0} ms")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_provider_roles() {
        assert_eq!(Role::User.to_provider(), Some(ProviderRole::User));
        assert_eq!(Role::Assistant.to_provider(), Some(ProviderRole::Model));
        assert_eq!(Role::System.to_provider(), None);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role":"tool","content":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn provider_message_wire_shape() {
        let msg = ProviderMessage::text(ProviderRole::Model, "Halo");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "role": "model", "parts": [{ "text": "Halo" }] })
        );
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ChatError::ProviderError {
            status: 403,
            body: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned 403: permission denied");
        assert_eq!(
            ChatError::Timeout(500).to_string(),
            "provider did not answer within 500 ms"
        );
    }
}
