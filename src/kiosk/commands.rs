//! Slash command parsing for the kiosk.
//!
//! Lines starting with `/` control the kiosk instead of being sent to the
//! ordering service.

/// A parsed kiosk command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCommand {
    /// Complete the current order.
    Checkout,

    /// Abandon the current order and start over.
    NewOrder,

    /// Send the suggestion with this 1-based number.
    Pick(usize),

    /// Show the menu.
    Menu,

    /// Show the current order again.
    Order,

    /// Check whether the service is up.
    Health,

    /// Display help information.
    Help,

    /// Exit the kiosk.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(KioskCommand)` if the input is a command, or `None` if it
/// should be sent to the ordering service as a message.
///
/// # Examples
///
/// ```
/// # use nopickles::kiosk::{parse_command, KioskCommand};
/// assert_eq!(parse_command("/checkout"), Some(KioskCommand::Checkout));
/// assert_eq!(parse_command("/pick 2"), Some(KioskCommand::Pick(2)));
/// assert!(parse_command("two cheeseburgers").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<KioskCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "checkout" | "done" => KioskCommand::Checkout,
        "new" | "reset" => KioskCommand::NewOrder,
        "pick" => match argument {
            Some(arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => KioskCommand::Pick(n),
                _ => KioskCommand::Invalid("/pick expects a suggestion number".to_string()),
            },
            None => KioskCommand::Invalid("/pick requires a suggestion number".to_string()),
        },
        "menu" => KioskCommand::Menu,
        "order" => KioskCommand::Order,
        "health" => KioskCommand::Health,
        "help" | "?" => KioskCommand::Help,
        "quit" | "exit" | "q" => KioskCommand::Quit,
        _ => KioskCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /checkout              Complete your order
  /new                   Start a new order (clears the current one)
  /pick <n>              Send suggestion number <n>
  /menu                  Show the menu
  /order                 Show your current order
  /health                Check the ordering service
  /help                  Show this help message
  /quit                  Exit the kiosk
Anything else is sent to the assistant."#
}
