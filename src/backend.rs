//! The seam between the kiosk controller and the ordering service.
//!
//! [`crate::OrderClient`] is the production implementation; tests substitute
//! their own.

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse, OrderConfirmation, SessionEnded, SessionId, SessionStart};

/// The calls the kiosk makes against the ordering service.
#[async_trait::async_trait]
pub trait OrderBackend: Send + Sync {
    /// Start a new session and fetch its greeting.
    async fn start_session(&self) -> Result<SessionStart>;

    /// Send one customer message and receive the reply, order, and suggestions.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Finalize the session's order.
    async fn complete_order(&self, session_id: &SessionId) -> Result<OrderConfirmation>;

    /// Drop a session without completing its order.
    async fn end_session(&self, session_id: &SessionId) -> Result<SessionEnded>;
}

#[async_trait::async_trait]
impl<B: OrderBackend + ?Sized> OrderBackend for std::sync::Arc<B> {
    async fn start_session(&self) -> Result<SessionStart> {
        (**self).start_session().await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        (**self).chat(request).await
    }

    async fn complete_order(&self, session_id: &SessionId) -> Result<OrderConfirmation> {
        (**self).complete_order(session_id).await
    }

    async fn end_session(&self, session_id: &SessionId) -> Result<SessionEnded> {
        (**self).end_session(session_id).await
    }
}
