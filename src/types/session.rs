use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, server-assigned identifier for one ordering conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a server-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Response to `POST /api/session/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStart {
    /// The freshly created session.
    pub session_id: SessionId,

    /// Greeting to show as the first assistant message.
    pub message: String,
}

impl SessionStart {
    /// Create a new `SessionStart`.
    pub fn new(session_id: impl Into<SessionId>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
        }
    }
}

/// Response to `DELETE /api/session/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnded {
    /// Acknowledgement text from the service.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_start_deserialization() {
        let start: SessionStart = serde_json::from_value(json!({
            "session_id": "7f1c",
            "message": "Welcome to NoPickles! What can I get for you today?"
        }))
        .unwrap();
        assert_eq!(start.session_id.as_str(), "7f1c");
        assert!(start.message.starts_with("Welcome"));
    }

    #[test]
    fn session_id_is_a_bare_string() {
        let id = SessionId::new("abc");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("abc"));
        assert_eq!(id.to_string(), "abc");
    }
}
