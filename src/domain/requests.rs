use serde::{Deserialize, Serialize};

/// Body for `POST .../reject`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body for `POST .../ship`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipRequest {
    pub carrier_code: String,
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
}

/// Body for `POST .../deliver`; always `{}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliverRequest {}
