use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("nopickles.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("nopickles.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("nopickles.client.request_duration_seconds");

pub(crate) static KIOSK_SESSIONS_STARTED: Counter = Counter::new("nopickles.kiosk.sessions_started");
pub(crate) static KIOSK_MESSAGES_SENT: Counter = Counter::new("nopickles.kiosk.messages_sent");
pub(crate) static KIOSK_STALE_RESPONSES: Counter = Counter::new("nopickles.kiosk.stale_responses");
pub(crate) static KIOSK_ORDERS_COMPLETED: Counter = Counter::new("nopickles.kiosk.orders_completed");
pub(crate) static KIOSK_RESTARTS_SCHEDULED: Counter =
    Counter::new("nopickles.kiosk.restarts_scheduled");
pub(crate) static KIOSK_RESTARTS_CANCELLED: Counter =
    Counter::new("nopickles.kiosk.restarts_cancelled");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&KIOSK_SESSIONS_STARTED);
    collector.register_counter(&KIOSK_MESSAGES_SENT);
    collector.register_counter(&KIOSK_STALE_RESPONSES);
    collector.register_counter(&KIOSK_ORDERS_COMPLETED);
    collector.register_counter(&KIOSK_RESTARTS_SCHEDULED);
    collector.register_counter(&KIOSK_RESTARTS_CANCELLED);
}
