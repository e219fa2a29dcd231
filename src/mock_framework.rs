//! # Mock Framework
//!
//! Utilities for testing the order desk without a backend.
//!
//! Use [`create_mock_client`] to get a client wired to a live view actor and a
//! receiver standing in for the backend. Then use helpers like
//! [`expect_accept`] or [`expect_list`] to assert what was sent and answer it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::ViewActor;
use crate::api::SellerOrdersApi;
use crate::clients::OrderItemClient;
use crate::domain::{
    DeliverRequest, ListQuery, OrderItem, OrderItemPage, RejectRequest, ShipRequest,
};
use crate::error::ApiError;

pub type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

/// One backend call, captured with the channel its answer goes back on.
#[derive(Debug)]
pub enum ApiCall {
    List {
        query: ListQuery,
        respond_to: Responder<OrderItemPage>,
    },
    Get {
        id: String,
        respond_to: Responder<OrderItem>,
    },
    Accept {
        id: String,
        respond_to: Responder<OrderItem>,
    },
    Reject {
        id: String,
        request: RejectRequest,
        respond_to: Responder<OrderItem>,
    },
    Ship {
        id: String,
        request: ShipRequest,
        respond_to: Responder<OrderItem>,
    },
    Deliver {
        id: String,
        request: DeliverRequest,
        respond_to: Responder<OrderItem>,
    },
}

/// [`SellerOrdersApi`] that forwards every call to a test-owned receiver.
///
/// # Testing Strategy
/// The test plays the backend: it reads each [`ApiCall`], inspects it and
/// answers through the oneshot sender. That makes success, failure and
/// ordering of responses fully deterministic.
pub struct MockSellerOrdersApi {
    sender: mpsc::Sender<ApiCall>,
}

impl MockSellerOrdersApi {
    async fn call<T>(&self, build: impl FnOnce(Responder<T>) -> ApiCall) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::Transport("mock backend closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Transport("mock backend dropped the request".to_string()))?
    }
}

#[async_trait]
impl SellerOrdersApi for MockSellerOrdersApi {
    async fn list_items(&self, query: &ListQuery) -> Result<OrderItemPage, ApiError> {
        let query = query.clone();
        self.call(|respond_to| ApiCall::List { query, respond_to }).await
    }

    async fn get_item(&self, id: &str) -> Result<OrderItem, ApiError> {
        let id = id.to_string();
        self.call(|respond_to| ApiCall::Get { id, respond_to }).await
    }

    async fn accept_item(&self, id: &str) -> Result<OrderItem, ApiError> {
        let id = id.to_string();
        self.call(|respond_to| ApiCall::Accept { id, respond_to }).await
    }

    async fn reject_item(&self, id: &str, request: &RejectRequest) -> Result<OrderItem, ApiError> {
        let (id, request) = (id.to_string(), request.clone());
        self.call(|respond_to| ApiCall::Reject { id, request, respond_to }).await
    }

    async fn ship_item(&self, id: &str, request: &ShipRequest) -> Result<OrderItem, ApiError> {
        let (id, request) = (id.to_string(), request.clone());
        self.call(|respond_to| ApiCall::Ship { id, request, respond_to }).await
    }

    async fn deliver_item(&self, id: &str, request: &DeliverRequest) -> Result<OrderItem, ApiError> {
        let (id, request) = (id.to_string(), request.clone());
        self.call(|respond_to| ApiCall::Deliver { id, request, respond_to }).await
    }
}

/// Creates a mock backend and the receiver for asserting its calls.
pub fn create_mock_api(buffer_size: usize) -> (Arc<MockSellerOrdersApi>, mpsc::Receiver<ApiCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(MockSellerOrdersApi { sender }), receiver)
}

/// Creates an [`OrderItemClient`] over a running view actor and a mock backend.
pub fn create_mock_client(buffer_size: usize) -> (OrderItemClient, mpsc::Receiver<ApiCall>) {
    let (api, receiver) = create_mock_api(buffer_size);
    let (actor, view) = ViewActor::new(buffer_size, ListQuery::default());
    tokio::spawn(actor.run());
    (OrderItemClient::new(view, api), receiver)
}

/// Helper to verify that the next call is a listing
pub async fn expect_list(receiver: &mut mpsc::Receiver<ApiCall>) -> Option<(ListQuery, Responder<OrderItemPage>)> {
    match receiver.recv().await {
        Some(ApiCall::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a detail fetch
pub async fn expect_get(receiver: &mut mpsc::Receiver<ApiCall>) -> Option<(String, Responder<OrderItem>)> {
    match receiver.recv().await {
        Some(ApiCall::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_accept(receiver: &mut mpsc::Receiver<ApiCall>) -> Option<(String, Responder<OrderItem>)> {
    match receiver.recv().await {
        Some(ApiCall::Accept { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_reject(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(String, RejectRequest, Responder<OrderItem>)> {
    match receiver.recv().await {
        Some(ApiCall::Reject { id, request, respond_to }) => Some((id, request, respond_to)),
        _ => None,
    }
}

pub async fn expect_ship(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(String, ShipRequest, Responder<OrderItem>)> {
    match receiver.recv().await {
        Some(ApiCall::Ship { id, request, respond_to }) => Some((id, request, respond_to)),
        _ => None,
    }
}

pub async fn expect_deliver(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(String, DeliverRequest, Responder<OrderItem>)> {
    match receiver.recv().await {
        Some(ApiCall::Deliver { id, request, respond_to }) => Some((id, request, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderItemStatus;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let get_task = tokio::spawn(async move { api.get_item("item_1").await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get call");
        assert_eq!(id, "item_1");
        responder.send(Ok(OrderItem::new("item_1", OrderItemStatus::Pending))).unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result.map(|item| item.id), Ok("item_1".to_string()));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_transport_error() {
        let (api, mut receiver) = create_mock_api(10);

        let accept_task = tokio::spawn(async move { api.accept_item("item_1").await });
        let (_, responder) = expect_accept(&mut receiver).await.expect("Expected Accept call");
        drop(responder);

        assert!(matches!(accept_task.await.unwrap(), Err(ApiError::Transport(_))));
    }
}
