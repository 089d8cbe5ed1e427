use serde::{Deserialize, Serialize};

use crate::types::OrderItem;

/// Response to `POST /api/order/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Identifier of the finalized order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Items that were ordered.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Amount charged.
    pub total: f64,

    /// Service-side status, e.g. "confirmed".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl OrderConfirmation {
    /// Create a confirmation carrying only a total.
    pub fn new(total: f64) -> Self {
        Self {
            order_id: None,
            items: Vec::new(),
            total,
            status: None,
        }
    }
}
