use serde::{Deserialize, Serialize};

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Extracts the `message` field from a raw body, falling back to the raw
    /// text when the body is not JSON or has no message.
    pub fn message_or_raw(raw: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(raw)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiErrorBody;

    #[test]
    fn prefers_json_message_field() {
        assert_eq!(
            ApiErrorBody::message_or_raw(r#"{"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(
            ApiErrorBody::message_or_raw("<h1>502 Bad Gateway</h1>\n"),
            "<h1>502 Bad Gateway</h1>"
        );
        assert_eq!(ApiErrorBody::message_or_raw(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }
}
