use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to be cached by a [`ViewActor`].
///
/// The actor never builds or edits entities itself: it only stores server
/// representations and swaps them by id.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    /// Filters a listing of this entity is loaded with.
    type Query: Clone + Send + Sync + Debug + PartialEq + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;
}

/// One cursor page as returned by a listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Detail panel: selected id, and the item once it has been fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail<T: Entity> {
    pub id: T::Id,
    pub item: Option<T>,
}

/// A consistent copy of everything the actor holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<T: Entity> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub generation: u64,
    pub query: T::Query,
    pub loading_more: bool,
    pub detail: Option<Detail<T>>,
    pub in_flight: HashSet<T::Id>,
}

impl<T: Entity> ViewSnapshot<T> {
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn detail_item(&self) -> Option<&T> {
        self.detail.as_ref().and_then(|d| d.item.as_ref())
    }
}

/// What a merge touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub list_updated: bool,
    pub detail_updated: bool,
}

/// Cursor handed out for a load-more, with the load it belongs to and the
/// filters that load was started with.
#[derive(Debug, Clone, PartialEq)]
pub struct PageToken<Q> {
    pub generation: u64,
    pub cursor: String,
    pub query: Q,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum ViewRequest<T: Entity> {
    /// Start a new list load for `query`: bump the generation and clear the list.
    BeginLoad {
        query: T::Query,
        respond_to: Response<u64>,
    },
    /// Install (or append) a page if `generation` is still current.
    ApplyPage {
        generation: u64,
        page: Page<T>,
        append: bool,
        respond_to: Response<bool>,
    },
    /// Claim the next-page cursor unless a load-more is already running.
    ClaimNextPage {
        respond_to: Response<Option<PageToken<T::Query>>>,
    },
    /// A load-more failed; release the claim.
    AbortNextPage {
        generation: u64,
        respond_to: Response<()>,
    },
    Select {
        id: T::Id,
        respond_to: Response<()>,
    },
    /// Fill the panel with a fetched item. Answers with what the panel shows.
    ShowDetail {
        item: T,
        respond_to: Response<Option<T>>,
    },
    CloseDetail {
        respond_to: Response<()>,
    },
    /// Replace the cached copy (list and detail) with a server representation.
    Merge {
        item: T,
        respond_to: Response<MergeOutcome>,
    },
    Claim {
        id: T::Id,
        respond_to: Response<bool>,
    },
    Release {
        id: T::Id,
        respond_to: Response<()>,
    },
    CurrentQuery {
        respond_to: Response<T::Query>,
    },
    Snapshot {
        respond_to: Response<ViewSnapshot<T>>,
    },
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// Sole owner of the cached list page, its filters, the detail panel and the
/// in-flight set.
///
/// All writes arrive as [`ViewRequest`]s on one channel, so list and detail can
/// never diverge and no locking is needed.
pub struct ViewActor<T: Entity> {
    receiver: mpsc::Receiver<ViewRequest<T>>,
    items: Vec<T>,
    next_cursor: Option<String>,
    generation: u64,
    query: T::Query,
    loading_more: bool,
    detail: Option<Detail<T>>,
    in_flight: HashSet<T::Id>,
}

impl<T: Entity> ViewActor<T> {
    /// `query` is what `current_query` reports until the first load.
    pub fn new(buffer_size: usize, query: T::Query) -> (Self, ViewClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            items: Vec::new(),
            next_cursor: None,
            generation: 0,
            query,
            loading_more: false,
            detail: None,
            in_flight: HashSet::new(),
        };
        (actor, ViewClient::new(sender))
    }

    #[instrument(name = "view_actor", skip(self))]
    pub async fn run(mut self) {
        info!("ViewActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ViewRequest::BeginLoad { query, respond_to } => {
                    let _ = respond_to.send(self.begin_load(query));
                }
                ViewRequest::ApplyPage { generation, page, append, respond_to } => {
                    let _ = respond_to.send(self.apply_page(generation, page, append));
                }
                ViewRequest::ClaimNextPage { respond_to } => {
                    let _ = respond_to.send(self.claim_next_page());
                }
                ViewRequest::AbortNextPage { generation, respond_to } => {
                    if generation == self.generation {
                        self.loading_more = false;
                    }
                    let _ = respond_to.send(());
                }
                ViewRequest::Select { id, respond_to } => {
                    debug!(item_id = %id, "Detail selected");
                    self.detail = Some(Detail { id, item: None });
                    let _ = respond_to.send(());
                }
                ViewRequest::ShowDetail { item, respond_to } => {
                    let _ = respond_to.send(self.show_detail(item));
                }
                ViewRequest::CloseDetail { respond_to } => {
                    self.detail = None;
                    let _ = respond_to.send(());
                }
                ViewRequest::Merge { item, respond_to } => {
                    let _ = respond_to.send(self.merge(item));
                }
                ViewRequest::Claim { id, respond_to } => {
                    let claimed = self.in_flight.insert(id);
                    let _ = respond_to.send(claimed);
                }
                ViewRequest::Release { id, respond_to } => {
                    self.in_flight.remove(&id);
                    let _ = respond_to.send(());
                }
                ViewRequest::CurrentQuery { respond_to } => {
                    let _ = respond_to.send(self.query.clone());
                }
                ViewRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.snapshot());
                }
            }
        }

        info!("ViewActor stopped");
    }

    fn begin_load(&mut self, query: T::Query) -> u64 {
        self.generation += 1;
        self.query = query;
        self.items.clear();
        self.next_cursor = None;
        self.loading_more = false;
        debug!(generation = self.generation, "Load started");
        self.generation
    }

    #[instrument(skip(self, page), fields(page_len = page.items.len()))]
    fn apply_page(&mut self, generation: u64, page: Page<T>, append: bool) -> bool {
        if generation != self.generation {
            warn!(current = self.generation, "Discarding page from superseded load");
            return false;
        }
        if append {
            self.items.extend(page.items);
            self.loading_more = false;
        } else {
            self.items = page.items;
        }
        self.next_cursor = page.next_cursor;
        info!(item_count = self.items.len(), "Page applied");
        true
    }

    fn claim_next_page(&mut self) -> Option<PageToken<T::Query>> {
        if self.loading_more {
            return None;
        }
        let cursor = self.next_cursor.clone()?;
        self.loading_more = true;
        Some(PageToken {
            generation: self.generation,
            cursor,
            query: self.query.clone(),
        })
    }

    // A merge that landed after the selection is newer than any fetch sent
    // before it, so an already filled panel is kept.
    fn show_detail(&mut self, item: T) -> Option<T> {
        match &mut self.detail {
            Some(detail) if detail.id == *item.id() => match &detail.item {
                Some(current) => {
                    debug!(item_id = %item.id(), "Detail already merged; dropping fetched copy");
                    Some(current.clone())
                }
                None => {
                    detail.item = Some(item.clone());
                    Some(item)
                }
            },
            _ => {
                debug!(item_id = %item.id(), "Detail no longer selected; dropping");
                None
            }
        }
    }

    // In-place replace by id. No insert, no reorder.
    #[instrument(skip(self, item), fields(item_id = %item.id()))]
    fn merge(&mut self, item: T) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        if let Some(detail) = &mut self.detail {
            if detail.id == *item.id() {
                detail.item = Some(item.clone());
                outcome.detail_updated = true;
            }
        }
        if let Some(slot) = self.items.iter_mut().find(|cached| cached.id() == item.id()) {
            *slot = item;
            outcome.list_updated = true;
        }

        debug!(list = outcome.list_updated, detail = outcome.detail_updated, "Merged");
        outcome
    }

    fn snapshot(&self) -> ViewSnapshot<T> {
        ViewSnapshot {
            items: self.items.clone(),
            next_cursor: self.next_cursor.clone(),
            generation: self.generation,
            query: self.query.clone(),
            loading_more: self.loading_more,
            detail: self.detail.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ViewClient<T: Entity> {
    sender: mpsc::Sender<ViewRequest<T>>,
}

impl<T: Entity> ViewClient<T> {
    pub fn new(sender: mpsc::Sender<ViewRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ViewRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    pub async fn begin_load(&self, query: T::Query) -> Result<u64, FrameworkError> {
        self.request(|respond_to| ViewRequest::BeginLoad { query, respond_to }).await
    }

    pub async fn apply_page(
        &self,
        generation: u64,
        page: Page<T>,
        append: bool,
    ) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ViewRequest::ApplyPage { generation, page, append, respond_to })
            .await
    }

    pub async fn claim_next_page(&self) -> Result<Option<PageToken<T::Query>>, FrameworkError> {
        self.request(|respond_to| ViewRequest::ClaimNextPage { respond_to }).await
    }

    pub async fn abort_next_page(&self, generation: u64) -> Result<(), FrameworkError> {
        self.request(|respond_to| ViewRequest::AbortNextPage { generation, respond_to })
            .await
    }

    pub async fn select(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ViewRequest::Select { id, respond_to }).await
    }

    pub async fn show_detail(&self, item: T) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ViewRequest::ShowDetail { item, respond_to }).await
    }

    pub async fn close_detail(&self) -> Result<(), FrameworkError> {
        self.request(|respond_to| ViewRequest::CloseDetail { respond_to }).await
    }

    pub async fn merge(&self, item: T) -> Result<MergeOutcome, FrameworkError> {
        self.request(|respond_to| ViewRequest::Merge { item, respond_to }).await
    }

    /// Marks `id` as having a request in flight. `None` if it already had one.
    ///
    /// The claim lasts until the returned guard is released or dropped.
    pub async fn claim(&self, id: T::Id) -> Result<Option<ClaimGuard<T>>, FrameworkError> {
        let claimed_id = id.clone();
        let claimed = self.request(|respond_to| ViewRequest::Claim { id, respond_to }).await?;
        Ok(claimed.then(|| ClaimGuard {
            client: self.clone(),
            id: Some(claimed_id),
        }))
    }

    async fn release(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ViewRequest::Release { id, respond_to }).await
    }

    pub async fn current_query(&self) -> Result<T::Query, FrameworkError> {
        self.request(|respond_to| ViewRequest::CurrentQuery { respond_to }).await
    }

    pub async fn snapshot(&self) -> Result<ViewSnapshot<T>, FrameworkError> {
        self.request(|respond_to| ViewRequest::Snapshot { respond_to }).await
    }
}

/// An in-flight claim on one id.
///
/// Dropping the guard without [`ClaimGuard::release`] (a cancelled or timed
/// out caller) still frees the id.
#[must_use = "the claim is released as soon as the guard is dropped"]
pub struct ClaimGuard<T: Entity> {
    client: ViewClient<T>,
    id: Option<T::Id>,
}

impl<T: Entity> ClaimGuard<T> {
    /// Releases the claim and waits for the actor to record it.
    pub async fn release(mut self) -> Result<(), FrameworkError> {
        match self.id.take() {
            Some(id) => self.client.release(id).await,
            None => Ok(()),
        }
    }
}

impl<T: Entity> Drop for ClaimGuard<T> {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        debug!(item_id = %id, "Claim dropped; releasing");

        // Nobody waits for this answer.
        let (respond_to, _) = oneshot::channel();
        let request = ViewRequest::Release { id, respond_to };
        match self.client.sender.try_send(request) {
            Ok(()) | Err(mpsc::error::TrySendError::Closed(_)) => {}
            Err(mpsc::error::TrySendError::Full(request)) => {
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        let sender = self.client.sender.clone();
                        handle.spawn(async move {
                            let _ = sender.send(request).await;
                        });
                    }
                    Err(_) => warn!("No runtime to release a dropped claim"),
                }
            }
        }
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
