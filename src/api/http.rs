use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::SellerOrdersApi;
use crate::config::ApiConfig;
use crate::domain::{
    DeliverRequest, ListQuery, OrderItem, OrderItemPage, RejectRequest, ShipRequest,
};
use crate::error::ApiError;

/// [`SellerOrdersApi`] over HTTP.
#[derive(Clone)]
pub struct HttpSellerOrdersApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSellerOrdersApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.token.clone(), config.timeout())
    }

    /// `base_url` + `/seller/orders/` + segments. Ids are percent-encoded.
    fn orders_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["seller", "orders"])
            .extend(segments);
        Ok(url)
    }

    fn item_url(&self, id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        match action {
            Some(action) => self.orders_url(&[id, action]),
            None => self.orders_url(&[id]),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body_len = body.len(),
                body = %body_preview(&body),
                "Request rejected by server"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Longest error body, in bytes, that goes into a log line.
const MAX_LOGGED_BODY: usize = 256;

fn body_preview(body: &str) -> &str {
    if body.len() <= MAX_LOGGED_BODY {
        return body;
    }
    let mut end = MAX_LOGGED_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[async_trait]
impl SellerOrdersApi for HttpSellerOrdersApi {
    #[instrument(skip(self), fields(limit = query.limit))]
    async fn list_items(&self, query: &ListQuery) -> Result<OrderItemPage, ApiError> {
        debug!("Sending request");
        // Trailing slash: the list route is mounted at `/seller/orders/`.
        let url = self.orders_url(&[""])?;
        self.send(self.client.get(url).query(&query.to_params())).await
    }

    #[instrument(skip(self))]
    async fn get_item(&self, id: &str) -> Result<OrderItem, ApiError> {
        debug!("Sending request");
        let url = self.item_url(id, None)?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn accept_item(&self, id: &str) -> Result<OrderItem, ApiError> {
        debug!("Sending request");
        let url = self.item_url(id, Some("accept"))?;
        self.send(self.client.post(url)).await
    }

    #[instrument(skip(self, request))]
    async fn reject_item(&self, id: &str, request: &RejectRequest) -> Result<OrderItem, ApiError> {
        debug!("Sending request");
        let url = self.item_url(id, Some("reject"))?;
        self.send(self.client.post(url).json(request)).await
    }

    #[instrument(skip(self, request), fields(carrier = %request.carrier_code))]
    async fn ship_item(&self, id: &str, request: &ShipRequest) -> Result<OrderItem, ApiError> {
        debug!("Sending request");
        let url = self.item_url(id, Some("ship"))?;
        self.send(self.client.post(url).json(request)).await
    }

    #[instrument(skip(self, request))]
    async fn deliver_item(&self, id: &str, request: &DeliverRequest) -> Result<OrderItem, ApiError> {
        debug!("Sending request");
        let url = self.item_url(id, Some("deliver"))?;
        self.send(self.client.post(url).json(request)).await
    }
}
