use serde::{Deserialize, Serialize};

use super::{OrderItem, OrderItemStatus};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filters for the seller order-item listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub statuses: Vec<OrderItemStatus>,
    pub search: Option<String>,
    pub org_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            statuses: OrderItemStatus::open(),
            search: None,
            org_id: None,
            cursor: None,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Same filters, positioned at `cursor`.
    pub fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }

    /// Query-string pairs. `statuses` repeats; blank optionals are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = self
            .statuses
            .iter()
            .map(|status| ("statuses", status.to_string()))
            .collect();

        let optional = [
            ("search", &self.search),
            ("org_id", &self.org_id),
            ("cursor", &self.cursor),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, value.to_string()));
            }
        }

        params.push(("limit", self.limit.to_string()));
        params
    }
}

/// One cursor page of order items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItemPage {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}
