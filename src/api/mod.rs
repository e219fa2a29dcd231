//! The seller order-item REST contract.

mod http;

pub use http::HttpSellerOrdersApi;

use async_trait::async_trait;

use crate::domain::{
    DeliverRequest, ListQuery, OrderItem, OrderItemPage, RejectRequest, ShipRequest,
};
use crate::error::ApiError;
use crate::workflow::ActionRequest;

/// Backend endpoints the supplier order desk depends on.
///
/// Every mutating call returns the server's representation of the item after
/// the transition; callers must use that instead of predicting the status.
#[async_trait]
pub trait SellerOrdersApi: Send + Sync {
    async fn list_items(&self, query: &ListQuery) -> Result<OrderItemPage, ApiError>;

    async fn get_item(&self, id: &str) -> Result<OrderItem, ApiError>;

    async fn accept_item(&self, id: &str) -> Result<OrderItem, ApiError>;

    async fn reject_item(&self, id: &str, request: &RejectRequest) -> Result<OrderItem, ApiError>;

    async fn ship_item(&self, id: &str, request: &ShipRequest) -> Result<OrderItem, ApiError>;

    async fn deliver_item(&self, id: &str, request: &DeliverRequest) -> Result<OrderItem, ApiError>;

    /// Sends a validated action to its endpoint.
    async fn perform(&self, id: &str, request: &ActionRequest) -> Result<OrderItem, ApiError> {
        match request {
            ActionRequest::Accept => self.accept_item(id).await,
            ActionRequest::Reject(body) => self.reject_item(id, body).await,
            ActionRequest::Ship(body) => self.ship_item(id, body).await,
            ActionRequest::Deliver(body) => self.deliver_item(id, body).await,
        }
    }
}
