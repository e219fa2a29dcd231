use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{ViewClient, ViewSnapshot};
use crate::api::SellerOrdersApi;
use crate::domain::{ListQuery, OrderItem};
use crate::order_actor::OrderItemError;
use crate::workflow::{ActionInput, ItemAction};

/// A row as the desk renders it: the cached item plus the buttons it gets.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub item: OrderItem,
    pub actions: &'static [ItemAction],
}

/// Entry point for everything a supplier does with order items.
///
/// This client orchestrates the backend and the view actor: it performs the
/// network call in the caller's task and then routes the server's answer
/// through the actor, which is the only place cached items and the active
/// filters change.
#[derive(Clone)]
pub struct OrderItemClient {
    view: ViewClient<OrderItem>,
    api: Arc<dyn SellerOrdersApi>,
}

impl OrderItemClient {
    pub fn new(view: ViewClient<OrderItem>, api: Arc<dyn SellerOrdersApi>) -> Self {
        Self { view, api }
    }

    /// Filters of the most recently started `load`.
    pub async fn current_query(&self) -> Result<ListQuery, OrderItemError> {
        Ok(self.view.current_query().await?)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// Replaces the list with the first page for `query`.
    ///
    /// Returns `false` when a newer load started before this page arrived; the
    /// page is then dropped.
    #[instrument(skip(self, query), fields(statuses = query.statuses.len(), limit = query.limit))]
    pub async fn load(&self, query: ListQuery) -> Result<bool, OrderItemError> {
        let query = ListQuery {
            cursor: None,
            ..query
        };
        let generation = self.view.begin_load(query.clone()).await?;

        debug!(generation, "Sending request");
        let page = self.api.list_items(&query).await.map_err(|e| {
            error!(error = %e, "Listing failed");
            e
        })?;

        let applied = self.view.apply_page(generation, page.into(), false).await?;
        if applied {
            info!("Order items loaded");
        }
        Ok(applied)
    }

    /// Runs the last query again from the first page.
    pub async fn refresh(&self) -> Result<bool, OrderItemError> {
        self.load(self.current_query().await?).await
    }

    /// Appends the next page. `Ok(false)` if there is none or one is already loading.
    #[instrument(skip(self))]
    pub async fn load_more(&self) -> Result<bool, OrderItemError> {
        let Some(token) = self.view.claim_next_page().await? else {
            debug!("Nothing to load");
            return Ok(false);
        };

        let query = token.query.with_cursor(token.cursor);
        debug!(generation = token.generation, "Sending request");
        match self.api.list_items(&query).await {
            Ok(page) => Ok(self.view.apply_page(token.generation, page.into(), true).await?),
            Err(e) => {
                error!(error = %e, "Loading next page failed");
                self.view.abort_next_page(token.generation).await?;
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Detail panel
    // =========================================================================

    /// Opens the detail panel on `id` and fills it from the backend.
    ///
    /// Returns what the panel shows, which is an action's answer rather than
    /// the fetched copy when one was merged while the fetch was outstanding.
    /// On failure the panel stays open and empty.
    #[instrument(skip(self))]
    pub async fn open_detail(&self, id: &str) -> Result<OrderItem, OrderItemError> {
        self.view.select(id.to_string()).await?;

        debug!("Sending request");
        let item = self.api.get_item(id).await.map_err(|e| {
            error!(error = %e, "Fetching item failed");
            e
        })?;

        match self.view.show_detail(item.clone()).await? {
            Some(shown) => Ok(shown),
            None => {
                debug!("Panel moved on before the item arrived");
                Ok(item)
            }
        }
    }

    pub async fn close_detail(&self) -> Result<(), OrderItemError> {
        Ok(self.view.close_detail().await?)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Validates `input`, sends it, and merges the server's answer.
    ///
    /// Nothing is sent when validation fails or another action on the same
    /// item has not resolved yet. Failures leave the view untouched. The item
    /// stays claimed until this call finishes or its future is dropped.
    #[instrument(skip(self, input), fields(item_id = %id, action = %input.action()))]
    pub async fn dispatch(&self, id: &str, input: ActionInput) -> Result<OrderItem, OrderItemError> {
        let request = input.validate().map_err(|e| {
            warn!(error = %e, "Validation failed");
            e
        })?;

        let Some(claim) = self.view.claim(id.to_string()).await? else {
            warn!("Action already in flight");
            return Err(OrderItemError::ActionInFlight(id.to_string()));
        };

        debug!("Sending request");
        let outcome = match self.api.perform(id, &request).await {
            Ok(item) => {
                let merged = self.view.merge(item.clone()).await;
                merged
                    .map(|outcome| {
                        info!(
                            status = %item.status,
                            list = outcome.list_updated,
                            detail = outcome.detail_updated,
                            "Action applied"
                        );
                        item
                    })
                    .map_err(OrderItemError::from)
            }
            Err(e) => {
                error!(error = %e, "Action failed");
                Err(e.into())
            }
        };

        claim.release().await?;
        outcome
    }

    pub async fn accept(&self, id: &str) -> Result<OrderItem, OrderItemError> {
        self.dispatch(id, ActionInput::Accept).await
    }

    pub async fn reject(&self, id: &str, reason: Option<String>) -> Result<OrderItem, OrderItemError> {
        self.dispatch(id, ActionInput::Reject { reason }).await
    }

    pub async fn ship(
        &self,
        id: &str,
        carrier_code: impl Into<String>,
        tracking_number: impl Into<String>,
        tracking_url: Option<String>,
    ) -> Result<OrderItem, OrderItemError> {
        let input = ActionInput::Ship {
            carrier_code: carrier_code.into(),
            tracking_number: tracking_number.into(),
            tracking_url,
        };
        self.dispatch(id, input).await
    }

    pub async fn deliver(&self, id: &str) -> Result<OrderItem, OrderItemError> {
        self.dispatch(id, ActionInput::Deliver).await
    }

    // =========================================================================
    // Reading the view
    // =========================================================================

    pub async fn snapshot(&self) -> Result<ViewSnapshot<OrderItem>, OrderItemError> {
        Ok(self.view.snapshot().await?)
    }

    /// The cached list with each item's permitted actions.
    pub async fn rows(&self) -> Result<Vec<ItemRow>, OrderItemError> {
        let view = self.view.snapshot().await?;
        Ok(view
            .items
            .into_iter()
            .map(|item| ItemRow {
                actions: item.permitted_actions(),
                item,
            })
            .collect())
    }
}
