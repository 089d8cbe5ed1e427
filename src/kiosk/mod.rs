//! The kiosk: the controller that turns customer actions into service calls
//! and view updates.
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`controller`]: the [`Kiosk`] handle and its handlers
//! - [`commands`]: slash command parsing for the terminal front end

mod commands;
mod config;
mod controller;

pub use commands::{KioskCommand, help_text, parse_command};
pub use config::{KioskArgs, KioskConfig};
pub use controller::{
    CHAT_FAILED_MESSAGE, CHECKOUT_FAILED_MESSAGE, Kiosk, Outcome, SESSION_START_FAILED_MESSAGE,
    confirmation_message,
};
