//! The kiosk controller.
//!
//! [`Kiosk`] holds the one piece of mutable state a kiosk has (the current
//! session, the input line, the chips on screen) together with its view, and
//! implements every customer action as an async handler.  Handles are cheap to
//! clone; clones share state, so a handler and the post-checkout restart task
//! can run side by side.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;

use crate::backend::OrderBackend;
use crate::error::Error;
use crate::kiosk::config::DEFAULT_RESTART_DELAY;
use crate::observability::{
    KIOSK_MESSAGES_SENT, KIOSK_ORDERS_COMPLETED, KIOSK_RESTARTS_CANCELLED,
    KIOSK_RESTARTS_SCHEDULED, KIOSK_SESSIONS_STARTED, KIOSK_STALE_RESPONSES,
};
use crate::types::{ChatRequest, Order, SessionId};
use crate::view::{KioskView, OrderPanel, Sender, format_price};

/// Alert raised when no session could be started.
pub const SESSION_START_FAILED_MESSAGE: &str = "Failed to start session. Please restart the kiosk.";

/// Assistant message shown in place of a reply when a chat call fails.
pub const CHAT_FAILED_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Assistant message shown when checkout fails.
pub const CHECKOUT_FAILED_MESSAGE: &str =
    "Sorry, there was an error completing your order. Please try again.";

/// The assistant message shown after a successful checkout.
pub fn confirmation_message(total: f64) -> String {
    format!(
        "Order confirmed! Your order total is {}. Thank you for choosing NoPickles!",
        format_price(total)
    )
}

/// What a handler did.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Preconditions were not met; nothing was sent and nothing changed.
    Skipped,
    /// The request succeeded and its result is on screen.
    Applied,
    /// The request completed but a newer session or response made it stale.
    Superseded,
    /// The request failed; the fixed failure message is on screen.
    Failed(Error),
}

impl Outcome {
    /// True for [`Outcome::Applied`].
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// True for [`Outcome::Skipped`].
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }

    /// True for [`Outcome::Superseded`].
    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }

    /// The error, for [`Outcome::Failed`].
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

struct KioskState<V> {
    view: V,
    session_id: Option<SessionId>,
    input: String,
    suggestions: Vec<String>,
    checkout_enabled: bool,
    // Bumped whenever the session slot is replaced or vacated; responses
    // issued under an older generation are dropped.
    generation: u64,
    chats_issued: u64,
    chats_applied: u64,
    pending_restart: Option<CancellationToken>,
    starts_in_flight: usize,
    // The post-checkout restart has fired and its start request is in flight.
    restart_in_flight: bool,
}

impl<V: KioskView> KioskState<V> {
    fn apply_order(&mut self, order: Option<&Order>) {
        let panel = OrderPanel::from_order(order);
        self.checkout_enabled = panel.checkout_enabled();
        self.view.render_order(&panel);
        self.view.set_checkout_enabled(self.checkout_enabled);
    }

    fn apply_suggestions(&mut self, suggestions: Vec<String>) {
        self.view.render_suggestions(&suggestions);
        self.suggestions = suggestions;
    }

    fn cancel_pending_restart(&mut self) {
        if let Some(token) = self.pending_restart.take() {
            token.cancel();
            KIOSK_RESTARTS_CANCELLED.click();
        }
    }
}

struct Inner<B, V> {
    backend: B,
    restart_delay: Duration,
    state: Mutex<KioskState<V>>,
    start_settled: Notify,
}

/// A kiosk: one customer-facing ordering conversation at a time.
pub struct Kiosk<B, V> {
    inner: Arc<Inner<B, V>>,
}

impl<B, V> Clone for Kiosk<B, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: OrderBackend + 'static, V: KioskView + 'static> Kiosk<B, V> {
    /// Creates a kiosk with the default two second post-checkout restart.
    ///
    /// No session exists until [`Kiosk::start_new_session`] is called.
    pub fn new(backend: B, view: V) -> Self {
        Self::with_restart_delay(backend, view, DEFAULT_RESTART_DELAY)
    }

    /// Creates a kiosk that waits `restart_delay` after checkout before
    /// starting the next session.
    pub fn with_restart_delay(backend: B, view: V, restart_delay: Duration) -> Self {
        let state = KioskState {
            view,
            session_id: None,
            input: String::new(),
            suggestions: Vec::new(),
            checkout_enabled: false,
            generation: 0,
            chats_issued: 0,
            chats_applied: 0,
            pending_restart: None,
            starts_in_flight: 0,
            restart_in_flight: false,
        };
        Self {
            inner: Arc::new(Inner {
                backend,
                restart_delay,
                state: Mutex::new(state),
                start_settled: Notify::new(),
            }),
        }
    }

    /// The active session, if any.
    pub async fn session_id(&self) -> Option<SessionId> {
        self.inner.state.lock().await.session_id.clone()
    }

    /// Replace the contents of the input line.
    pub async fn set_input(&self, text: impl Into<String>) {
        self.inner.state.lock().await.input = text.into();
    }

    /// The contents of the input line.
    pub async fn input(&self) -> String {
        self.inner.state.lock().await.input.clone()
    }

    /// The suggestion chips currently on screen.
    pub async fn suggestions(&self) -> Vec<String> {
        self.inner.state.lock().await.suggestions.clone()
    }

    /// Whether the checkout control is enabled.
    pub async fn checkout_enabled(&self) -> bool {
        self.inner.state.lock().await.checkout_enabled
    }

    /// Whether a post-checkout restart is scheduled and has not fired yet.
    pub async fn restart_pending(&self) -> bool {
        self.inner.state.lock().await.pending_restart.is_some()
    }

    /// Run `f` against the view while no handler is updating it.
    pub async fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut state = self.inner.state.lock().await;
        f(&mut state.view)
    }

    /// Start a fresh session and reset every panel.
    ///
    /// A scheduled post-checkout restart is cancelled once the new session is
    /// up.  On failure the customer is alerted and the previous state is kept,
    /// scheduled restart included.  Skipped while the restart itself is
    /// starting a session.
    pub async fn start_new_session(&self) -> Outcome {
        let deferred = {
            let mut state = self.inner.state.lock().await;
            if state.restart_in_flight {
                tracing::debug!("session start ignored while the restart is starting one");
                return Outcome::Skipped;
            }
            state.starts_in_flight += 1;
            state.pending_restart.take()
        };
        self.request_session(deferred).await
    }

    async fn request_session(&self, deferred: Option<CancellationToken>) -> Outcome {
        let result = self.inner.backend.start_session().await;

        let mut state = self.inner.state.lock().await;
        state.starts_in_flight -= 1;
        state.restart_in_flight = false;
        let outcome = match result {
            Ok(start) => {
                KIOSK_SESSIONS_STARTED.click();
                tracing::debug!(session_id = %start.session_id, "session started");
                if let Some(token) = deferred {
                    token.cancel();
                    KIOSK_RESTARTS_CANCELLED.click();
                }
                state.cancel_pending_restart();
                state.generation += 1;
                state.session_id = Some(start.session_id);
                state.view.clear_transcript();
                state.apply_order(None);
                state.apply_suggestions(Vec::new());
                state.view.add_message(Sender::Assistant, &start.message);
                Outcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to start session");
                state.view.alert(SESSION_START_FAILED_MESSAGE);
                if let Some(token) = deferred {
                    if state.session_id.is_none() && state.pending_restart.is_none() {
                        state.pending_restart = Some(token);
                    } else {
                        token.cancel();
                    }
                }
                Outcome::Failed(err)
            }
        };
        drop(state);
        self.inner.start_settled.notify_waiters();
        outcome
    }

    /// Append a labeled entry to the transcript.
    pub async fn add_message(&self, sender: Sender, text: &str) {
        self.inner.state.lock().await.view.add_message(sender, text);
    }

    /// Send the input line to the assistant.
    ///
    /// Skipped when the trimmed input is empty or there is no session.  The
    /// reply is always shown; the order and suggestions it carries replace the
    /// current ones only if no newer reply has been applied already.
    pub async fn send_message(&self) -> Outcome {
        let (request, generation, sequence) = {
            let mut state = self.inner.state.lock().await;
            let text = state.input.trim().to_string();
            if text.is_empty() {
                return Outcome::Skipped;
            }
            let Some(session_id) = state.session_id.clone() else {
                tracing::debug!("message ignored without an active session");
                return Outcome::Skipped;
            };
            state.view.add_message(Sender::User, &text);
            state.input.clear();
            state.chats_issued += 1;
            (
                ChatRequest::new(session_id, text),
                state.generation,
                state.chats_issued,
            )
        };
        KIOSK_MESSAGES_SENT.click();

        let result = self.inner.backend.chat(request).await;

        let mut state = self.inner.state.lock().await;
        if state.generation != generation {
            KIOSK_STALE_RESPONSES.click();
            tracing::debug!("chat response dropped after session change");
            return Outcome::Superseded;
        }
        match result {
            Ok(response) => {
                state.view.add_message(Sender::Assistant, &response.message);
                if sequence <= state.chats_applied {
                    KIOSK_STALE_RESPONSES.click();
                    tracing::debug!(sequence, "out-of-order chat response; order left as is");
                    return Outcome::Superseded;
                }
                state.chats_applied = sequence;
                state.apply_order(response.order.as_ref());
                state.apply_suggestions(response.suggestions);
                Outcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                state.view.add_message(Sender::Assistant, CHAT_FAILED_MESSAGE);
                Outcome::Failed(err)
            }
        }
    }

    /// Replace the order panel and the checkout control.
    pub async fn update_order_display(&self, order: Option<&Order>) {
        self.inner.state.lock().await.apply_order(order);
    }

    /// Replace the suggestion chips.
    pub async fn update_suggestions(&self, suggestions: Vec<String>) {
        self.inner.state.lock().await.apply_suggestions(suggestions);
    }

    /// Put the chip at `index` into the input line and send it.
    pub async fn click_suggestion(&self, index: usize) -> Outcome {
        {
            let mut state = self.inner.state.lock().await;
            let Some(text) = state.suggestions.get(index).cloned() else {
                return Outcome::Skipped;
            };
            state.input = text;
        }
        self.send_message().await
    }

    /// Finalize the order and schedule the next session.
    ///
    /// On success the session slot is vacated and a new session starts after
    /// the restart delay unless one is started by hand first.  On failure the
    /// session and order are left untouched.
    pub async fn complete_order(&self) -> Outcome {
        let (session_id, generation) = {
            let state = self.inner.state.lock().await;
            let Some(session_id) = state.session_id.clone() else {
                return Outcome::Skipped;
            };
            (session_id, state.generation)
        };

        let result = self.inner.backend.complete_order(&session_id).await;

        let mut state = self.inner.state.lock().await;
        if state.generation != generation {
            tracing::debug!(%session_id, "checkout response dropped after session change");
            return Outcome::Superseded;
        }
        match result {
            Ok(confirmation) => {
                KIOSK_ORDERS_COMPLETED.click();
                state
                    .view
                    .add_message(Sender::Assistant, &confirmation_message(confirmation.total));
                state.session_id = None;
                state.generation += 1;
                state.cancel_pending_restart();
                let token = CancellationToken::new();
                state.pending_restart = Some(token.clone());
                drop(state);
                self.schedule_restart(token);
                Outcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, %session_id, "checkout failed");
                state.view.add_message(Sender::Assistant, CHECKOUT_FAILED_MESSAGE);
                Outcome::Failed(err)
            }
        }
    }

    /// End the current session without completing it, then start a new one.
    ///
    /// Ending the old session is best effort: a failure is logged and the new
    /// session is started regardless.
    pub async fn abandon_order(&self) -> Outcome {
        let previous = self.inner.state.lock().await.session_id.clone();
        if let Some(session_id) = previous
            && let Err(err) = self.inner.backend.end_session(&session_id).await
        {
            tracing::warn!(error = %err, %session_id, "failed to end session");
        }
        self.start_new_session().await
    }

    fn schedule_restart(&self, token: CancellationToken) {
        KIOSK_RESTARTS_SCHEDULED.click();
        let kiosk = self.clone();
        let delay = self.inner.restart_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            kiosk.fire_restart(token).await;
        });
    }

    async fn fire_restart(&self, token: CancellationToken) {
        loop {
            let settled = self.inner.start_settled.notified();
            tokio::pin!(settled);
            settled.as_mut().enable();
            {
                let mut state = self.inner.state.lock().await;
                if token.is_cancelled() {
                    return;
                }
                if state.starts_in_flight == 0 {
                    state.pending_restart = None;
                    state.starts_in_flight += 1;
                    state.restart_in_flight = true;
                    break;
                }
            }
            // A start in flight holds this restart; it cancels the token on
            // success and hands it back on failure.
            tokio::select! {
                _ = token.cancelled() => return,
                _ = &mut settled => {}
            }
        }
        self.request_session(None).await;
    }
}
