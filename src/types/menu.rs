use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry of the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable identifier, e.g. `burger_classic`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category key, e.g. `burgers`.
    pub category: String,
    /// Unit price.
    pub price: f64,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Whether the item can currently be ordered.
    #[serde(default = "available_default")]
    pub available: bool,
}

fn available_default() -> bool {
    true
}

/// Response to `GET /api/menu`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// Category keys in display order.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Items grouped by category key.
    #[serde(default)]
    pub items_by_category: HashMap<String, Vec<MenuItem>>,
}

impl Menu {
    /// Categories in display order, each with its items.
    ///
    /// Categories listed without items are yielded with an empty slice.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[MenuItem])> {
        self.categories.iter().map(|category| {
            let items = self
                .items_by_category
                .get(category)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            (category.as_str(), items)
        })
    }
}
