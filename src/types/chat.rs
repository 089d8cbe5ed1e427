use serde::{Deserialize, Serialize};

use crate::types::{Order, SessionId};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Session the message belongs to.
    pub session_id: SessionId,

    /// What the customer typed.
    pub message: String,
}

impl ChatRequest {
    /// Create a new `ChatRequest`.
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}

/// Response to `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply.
    pub message: String,

    /// The full order after this turn.  Absent is treated as empty.
    #[serde(default)]
    pub order: Option<Order>,

    /// Quick replies offered for the next turn.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ChatResponse {
    /// Create a reply with no order and no suggestions.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            order: None,
            suggestions: Vec::new(),
        }
    }

    /// Attach an order.
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Attach suggestions.
    pub fn with_suggestions<S: Into<String>>(mut self, suggestions: impl IntoIterator<Item = S>) -> Self {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }
}
