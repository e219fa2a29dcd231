use reqwest::Url;

use super::ItemAction;
use crate::domain::{DeliverRequest, RejectRequest, ShipRequest};
use crate::error::ValidationError;

pub const MAX_CARRIER_CODE_LEN: usize = 64;
pub const MAX_TRACKING_NUMBER_LEN: usize = 128;

/// Raw input collected for an action, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    Accept,
    Reject {
        reason: Option<String>,
    },
    Ship {
        carrier_code: String,
        tracking_number: String,
        tracking_url: Option<String>,
    },
    Deliver,
}

/// A validated action, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Accept,
    Reject(RejectRequest),
    Ship(ShipRequest),
    Deliver(DeliverRequest),
}

impl ActionInput {
    pub fn action(&self) -> ItemAction {
        match self {
            ActionInput::Accept => ItemAction::Accept,
            ActionInput::Reject { .. } => ItemAction::Reject,
            ActionInput::Ship { .. } => ItemAction::Ship,
            ActionInput::Deliver => ItemAction::Deliver,
        }
    }

    /// Checks required fields and trims text.
    ///
    /// # Errors
    /// `ship` without a carrier or tracking number, fields over the backend
    /// length limits, or a tracking URL that is not absolute http(s).
    pub fn validate(self) -> Result<ActionRequest, ValidationError> {
        match self {
            ActionInput::Accept => Ok(ActionRequest::Accept),
            ActionInput::Reject { reason } => Ok(ActionRequest::Reject(RejectRequest {
                reason: non_blank(reason),
            })),
            ActionInput::Ship {
                carrier_code,
                tracking_number,
                tracking_url,
            } => {
                let carrier_code = required("carrier_code", &carrier_code, MAX_CARRIER_CODE_LEN)?;
                let tracking_number =
                    required("tracking_number", &tracking_number, MAX_TRACKING_NUMBER_LEN)?;
                let tracking_url = non_blank(tracking_url).map(check_tracking_url).transpose()?;

                Ok(ActionRequest::Ship(ShipRequest {
                    carrier_code,
                    tracking_number,
                    tracking_url,
                }))
            }
            ActionInput::Deliver => Ok(ActionRequest::Deliver(DeliverRequest::default())),
        }
    }
}

impl ActionRequest {
    pub fn action(&self) -> ItemAction {
        match self {
            ActionRequest::Accept => ItemAction::Accept,
            ActionRequest::Reject(_) => ItemAction::Reject,
            ActionRequest::Ship(_) => ItemAction::Ship,
            ActionRequest::Deliver(_) => ItemAction::Deliver,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}

fn check_tracking_url(raw: String) -> Result<String, ValidationError> {
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw),
        Ok(url) => Err(ValidationError::InvalidTrackingUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        ))),
        Err(e) => Err(ValidationError::InvalidTrackingUrl(e.to_string())),
    }
}
