use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status of a single order item as reported by the backend.
///
/// Strings the client does not know deserialize into [`OrderItemStatus::Unknown`]
/// instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderItemStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    Unknown(String),
}

impl OrderItemStatus {
    /// Every status the backend currently defines, in lifecycle order.
    pub const KNOWN: [OrderItemStatus; 7] = [
        OrderItemStatus::Pending,
        OrderItemStatus::Confirmed,
        OrderItemStatus::Processing,
        OrderItemStatus::Shipped,
        OrderItemStatus::Delivered,
        OrderItemStatus::Cancelled,
        OrderItemStatus::Refunded,
    ];

    /// Statuses a supplier still has work to do on.
    pub fn open() -> Vec<OrderItemStatus> {
        vec![
            OrderItemStatus::Pending,
            OrderItemStatus::Confirmed,
            OrderItemStatus::Processing,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderItemStatus::Pending => "pending",
            OrderItemStatus::Confirmed => "confirmed",
            OrderItemStatus::Processing => "processing",
            OrderItemStatus::Shipped => "shipped",
            OrderItemStatus::Delivered => "delivered",
            OrderItemStatus::Cancelled => "cancelled",
            OrderItemStatus::Refunded => "refunded",
            OrderItemStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderItemStatus::Delivered | OrderItemStatus::Cancelled | OrderItemStatus::Refunded
        )
    }
}

impl From<&str> for OrderItemStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => OrderItemStatus::Pending,
            "confirmed" => OrderItemStatus::Confirmed,
            "processing" => OrderItemStatus::Processing,
            "shipped" => OrderItemStatus::Shipped,
            "delivered" => OrderItemStatus::Delivered,
            "cancelled" => OrderItemStatus::Cancelled,
            "refunded" => OrderItemStatus::Refunded,
            other => OrderItemStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for OrderItemStatus {
    fn from(raw: String) -> Self {
        OrderItemStatus::from(raw.as_str())
    }
}

impl From<OrderItemStatus> for String {
    fn from(status: OrderItemStatus) -> Self {
        match status {
            OrderItemStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for OrderItemStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OrderItemStatus::from(s))
    }
}

impl fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Buyer summary shared with suppliers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuyerPreview {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// One line of a buyer's order, as the seller endpoints return it.
///
/// The backend owns this record; the client only ever replaces its copy with
/// a fresh server representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub status: OrderItemStatus,
    pub quantity: u32,
    pub product_title: String,
    pub order_reference: String,
    pub buyer: BuyerPreview,

    #[serde(default, deserialize_with = "decimal_string")]
    pub unit_price: Option<String>,
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_price: Option<String>,
    #[serde(default)]
    pub product_part_number: Option<String>,
    #[serde(default)]
    pub order_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl OrderItem {
    /// Builds a bare item carrying only an id and a status.
    pub fn new(id: impl Into<String>, status: OrderItemStatus) -> Self {
        Self {
            id: id.into(),
            status,
            quantity: 1,
            product_title: String::new(),
            order_reference: String::new(),
            buyer: BuyerPreview::default(),
            unit_price: None,
            total_price: None,
            product_part_number: None,
            order_created_at: None,
            payment_status: None,
            shipping_address: None,
            notes: None,
            carrier_code: None,
            tracking_number: None,
            tracking_url: None,
            shipped_at: None,
            delivered_at: None,
        }
    }

    /// Short code shown in lists; falls back to the id prefix.
    pub fn reference_label(&self) -> &str {
        if !self.order_reference.is_empty() {
            return &self.order_reference;
        }
        match self.id.char_indices().nth(8) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    pub fn buyer_label(&self) -> &str {
        self.buyer
            .username
            .as_deref()
            .or(self.buyer.email.as_deref())
            .unwrap_or(&self.buyer.id)
    }
}

// Prices arrive as decimal strings, but tolerate plain JSON numbers as well.
fn decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_survives_decoding() {
        let item: OrderItem = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "status": "on_hold",
            "quantity": 2,
            "product_title": "Brake pad",
            "order_reference": "AB12CD34",
            "buyer": { "id": "b1" }
        }))
        .unwrap();

        assert_eq!(item.status, OrderItemStatus::Unknown("on_hold".to_string()));
        assert_eq!(item.status.to_string(), "on_hold");
        assert!(!item.status.is_terminal());
    }

    #[test]
    fn test_full_seller_item_decodes() {
        let item: OrderItem = serde_json::from_value(serde_json::json!({
            "id": "5f0c9a8e-1111-2222-3333-444455556666",
            "status": "shipped",
            "quantity": 1,
            "unit_price": "120.50",
            "total_price": 120.5,
            "product_title": "Headlight assembly",
            "product_part_number": "HL-2020",
            "order_reference": "",
            "order_created_at": "2025-03-01T10:00:00+00:00",
            "payment_status": "paid",
            "buyer": { "id": "b1", "email": "buyer@example.com", "username": null },
            "carrier_code": "DHL",
            "tracking_number": "123",
            "tracking_url": null,
            "shipped_at": "2025-03-02T08:30:00Z",
            "delivered_at": null,
            "seller_organization": { "id": "org" }
        }))
        .unwrap();

        assert_eq!(item.status, OrderItemStatus::Shipped);
        assert_eq!(item.unit_price.as_deref(), Some("120.50"));
        assert_eq!(item.total_price.as_deref(), Some("120.5"));
        assert_eq!(item.reference_label(), "5f0c9a8e");
        assert_eq!(item.buyer_label(), "buyer@example.com");
        assert!(item.shipped_at.is_some());
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let value = serde_json::to_value(OrderItemStatus::Processing).unwrap();
        assert_eq!(value, serde_json::json!("processing"));
        assert!(OrderItemStatus::Refunded.is_terminal());
    }
}
