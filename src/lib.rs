//! Client library and terminal kiosk for the NoPickles conversational ordering
//! service.
//!
//! The ordering service does the interesting work: it interprets what the
//! customer says, keeps the order, and prices it.  This crate talks to it over
//! HTTP ([`OrderClient`]) and drives a display ([`KioskView`]) from a small
//! controller ([`Kiosk`]) that starts sessions, relays messages, shows the
//! order and suggestion chips, and checks out.

// Public modules
pub mod backend;
pub mod client;
pub mod error;
pub mod kiosk;
pub mod observability;
pub mod render;
pub mod types;
pub mod view;

// Re-exports
pub use backend::OrderBackend;
pub use client::OrderClient;
pub use error::{Error, Result};
pub use kiosk::{Kiosk, KioskConfig, Outcome};
pub use observability::register_biometrics;
pub use render::{PromptWriter, TerminalView};
pub use types::*;
pub use view::{KioskView, OrderPanel, OrderRow, Sender, format_price};
