use std::sync::Arc;

use tracing::{error, info};

use crate::actor_framework::ViewActor;
use crate::api::{HttpSellerOrdersApi, SellerOrdersApi};
use crate::clients::OrderItemClient;
use crate::config::AppConfig;
use crate::domain::{ListQuery, OrderItem};
use crate::error::ApiError;
use crate::order_actor::OrderItemError;

/// The running order desk: the view actor plus the client wired to it.
///
/// Responsible for starting the actor and for shutting it down.
pub struct OrderDesk {
    pub orders: OrderItemClient,
    handle: tokio::task::JoinHandle<()>,
}

impl OrderDesk {
    pub fn new(api: Arc<dyn SellerOrdersApi>, query: ListQuery, buffer_size: usize) -> Self {
        let (view_actor, view_client) = ViewActor::<OrderItem>::new(buffer_size, query);
        let handle = tokio::spawn(view_actor.run());
        let orders = OrderItemClient::new(view_client, api);

        info!("Order desk started");
        Self { orders, handle }
    }

    /// Builds an HTTP-backed desk from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let api = HttpSellerOrdersApi::from_config(&config.api)?;
        Ok(Self::new(
            Arc::new(api),
            config.list_query(),
            config.actor.buffer_size,
        ))
    }

    /// Drops the client and waits for the actor to drain.
    ///
    /// The actor only stops once every clone of `orders` is gone.
    pub async fn shutdown(self) -> Result<(), OrderItemError> {
        info!("Shutting down order desk...");
        drop(self.orders);

        if let Err(e) = self.handle.await {
            error!("View actor task failed: {:?}", e);
            return Err(OrderItemError::ActorCommunicationError(format!(
                "View actor task failed: {}",
                e
            )));
        }

        info!("Order desk shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::create_mock_api;

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let (api, _receiver) = create_mock_api(4);
        let desk = OrderDesk::new(api, ListQuery::default(), 4);

        let view = desk.orders.snapshot().await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.generation, 0);

        desk.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_from_config_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "data:text/plain,hello".to_string();
        assert!(matches!(OrderDesk::from_config(&config), Err(ApiError::InvalidUrl(_))));
    }
}
