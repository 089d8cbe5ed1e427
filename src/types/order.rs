use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// A single line of an order, as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu identifier of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item_id: Option<String>,

    /// Display name.
    pub name: String,

    /// How many of this item are in the order.
    pub quantity: u32,

    /// Unit price.
    pub price: f64,

    /// Free-form customization such as "no pickles".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderItem {
    /// Create a new `OrderItem` with the given name, quantity and unit price.
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            menu_item_id: None,
            name: name.into(),
            quantity,
            price,
            special_instructions: None,
        }
    }

    /// Set the menu identifier.
    pub fn with_menu_item_id(mut self, id: impl Into<String>) -> Self {
        self.menu_item_id = Some(id.into());
        self
    }

    /// Set the special instructions.
    pub fn with_special_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// The order attached to a session.
///
/// The service is authoritative: the client renders this as received and never
/// recomputes `total` from the items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Session that owns the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    /// Line items in the order the service reported them.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Total as computed by the service.
    #[serde(default)]
    pub total: f64,
}

impl Order {
    /// Create an order from items and a service-reported total.
    pub fn new(items: Vec<OrderItem>, total: f64) -> Self {
        Self {
            session_id: None,
            items,
            total,
        }
    }

    /// True when there is nothing to check out.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
