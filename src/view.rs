//! The surface the kiosk draws on.
//!
//! [`KioskView`] is everything the controller needs from a display: a
//! transcript, an order panel, a row of suggestion chips, a checkout control,
//! and a way to interrupt the customer with an alert.  The controller never
//! touches a concrete display; the terminal front end lives in
//! [`crate::render`].

use std::fmt;

use crate::types::Order;

/// Text shown in the order panel when there is nothing in the order.
pub const EMPTY_ORDER_PLACEHOLDER: &str = "Your order is empty";

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The customer at the kiosk.
    User,
    /// The ordering service.
    Assistant,
}

impl Sender {
    /// The label shown next to each transcript entry.
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A display the kiosk controller renders into.
///
/// Calls arrive one at a time from the controller; implementations do not need
/// their own synchronization.
pub trait KioskView: Send {
    /// Remove every transcript entry.
    fn clear_transcript(&mut self);

    /// Append one entry to the transcript and bring it into view.
    fn add_message(&mut self, sender: Sender, text: &str);

    /// Replace the order panel.
    fn render_order(&mut self, panel: &OrderPanel);

    /// Enable or disable the checkout control.
    fn set_checkout_enabled(&mut self, enabled: bool);

    /// Replace the suggestion chips.  An empty slice leaves the area empty.
    fn render_suggestions(&mut self, suggestions: &[String]);

    /// Interrupt the customer with a message they must acknowledge.
    fn alert(&mut self, message: &str);
}

/// Format an amount of money the way every panel and message shows it.
///
/// ```
/// assert_eq!(nopickles::format_price(12.5), "$12.50");
/// assert_eq!(nopickles::format_price(0.0), "$0.00");
/// ```
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// One row of the order panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    /// Item name.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price times quantity, already formatted.
    pub line_total: String,
}

/// What the order panel shows for a given order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderPanel {
    /// Placeholder, zero total, checkout disabled.
    Empty,
    /// One row per item and the service-reported total.
    Items {
        /// Rows in the order the service listed the items.
        rows: Vec<OrderRow>,
        /// The order's own total, formatted.  Never recomputed from the rows.
        total: String,
    },
}

impl OrderPanel {
    /// Project an order into panel contents.  `None` and an order without items
    /// both produce [`OrderPanel::Empty`].
    pub fn from_order(order: Option<&Order>) -> Self {
        match order {
            Some(order) if !order.items.is_empty() => OrderPanel::Items {
                rows: order
                    .items
                    .iter()
                    .map(|item| OrderRow {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        line_total: format_price(item.line_total()),
                    })
                    .collect(),
                total: format_price(order.total),
            },
            _ => OrderPanel::Empty,
        }
    }

    /// The footer total.
    pub fn total(&self) -> String {
        match self {
            OrderPanel::Empty => format_price(0.0),
            OrderPanel::Items { total, .. } => total.clone(),
        }
    }

    /// Checkout is offered iff there is at least one row.
    pub fn checkout_enabled(&self) -> bool {
        matches!(self, OrderPanel::Items { rows, .. } if !rows.is_empty())
    }
}
