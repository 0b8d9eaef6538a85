//! Generic paginated list controller.
//!
//! One instance owns the query and result state of one entity page. State is
//! published through a `watch` channel so a UI can re-render on every change.
//! Fetches are tagged with a sequence token; only the most recently issued
//! fetch may write results back, so a slow earlier response never clobbers a
//! newer one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::endpoints::EntityEndpoints;
use crate::entity::Entity;
use crate::error::{BackofficeError, Result};
use crate::page::{PageEnvelope, PageMeta};
use crate::query::{QueryState, StatusFilter};

type EntityOf<P> = <P as EntityEndpoints>::Entity;
type IdOf<P> = <EntityOf<P> as Entity>::Id;

/// Everything a list page renders.
#[derive(Debug, Clone)]
pub struct ListState<E: Entity> {
    pub query: QueryState,
    /// Rows from the most recent applied fetch.
    pub items: Vec<E>,
    /// `None` until the first successful fetch.
    pub meta: Option<PageMeta>,
    pub loading: bool,
    pub error: Option<String>,
    /// A create/update/delete is in flight.
    pub submitting: bool,
    /// Id staged by [`ListController::request_delete`].
    pub pending_delete: Option<E::Id>,
}

impl<E: Entity> ListState<E> {
    fn new(query: QueryState) -> Self {
        Self {
            query,
            items: Vec::new(),
            meta: None,
            loading: false,
            error: None,
            submitting: false,
            pending_delete: None,
        }
    }
}

/// What happened to the result of one list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued before this one finished.
    Discarded,
    /// The error was recorded in [`ListState::error`].
    Failed,
}

#[derive(Debug, Default)]
struct FetchTracker {
    latest: u64,
    issued: Option<QueryState>,
}

pub struct ListController<P: EntityEndpoints> {
    endpoints: P,
    state: watch::Sender<ListState<EntityOf<P>>>,
    tracker: Mutex<FetchTracker>,
}

impl<P: EntityEndpoints> ListController<P> {
    pub fn new(endpoints: P, page_size: u32) -> Self {
        Self::with_query(endpoints, QueryState::with_page_size(page_size))
    }

    pub fn with_query(endpoints: P, query: QueryState) -> Self {
        let (state, _) = watch::channel(ListState::new(query));
        Self {
            endpoints,
            state,
            tracker: Mutex::new(FetchTracker::default()),
        }
    }

    pub fn endpoints(&self) -> &P {
        &self.endpoints
    }

    pub fn snapshot(&self) -> ListState<EntityOf<P>> {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> QueryState {
        self.state.borrow().query.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<EntityOf<P>>> {
        self.state.subscribe()
    }

    fn label(&self) -> &'static str {
        <EntityOf<P> as Entity>::RESOURCE.label
    }

    // A poisoned tracker only means a panic elsewhere mid-update; the
    // counters are still usable.
    fn tracker(&self) -> MutexGuard<'_, FetchTracker> {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- query setters -------------------------------------------------

    pub fn set_search(&self, text: &str) -> bool {
        self.state.send_if_modified(|s| s.query.set_search(text))
    }

    pub fn set_status_filter(&self, filter: StatusFilter) -> bool {
        self.state.send_if_modified(|s| s.query.set_status_filter(filter))
    }

    pub fn set_page_size(&self, size: u32) -> bool {
        self.state.send_if_modified(|s| s.query.set_page_size(size))
    }

    /// Clamped to the known page count; returns false when nothing moved.
    pub fn set_page(&self, page: u32) -> bool {
        self.state.send_if_modified(|s| {
            let max_page = s.meta.map(|m| m.max_page());
            s.query.set_page(page, max_page)
        })
    }

    pub fn set_sort(&self, key: &str) -> bool {
        self.state.send_if_modified(|s| s.query.set_sort(key))
    }

    pub fn set_filter(&self, key: &str, value: &str) -> bool {
        self.state.send_if_modified(|s| s.query.set_filter(key, value))
    }

    pub fn clear_filter(&self, key: &str) -> bool {
        self.state.send_if_modified(|s| s.query.clear_filter(key))
    }

    // ---- fetching ------------------------------------------------------

    /// Fetch the current query unconditionally.
    pub async fn refresh(&self) -> FetchOutcome {
        let (token, query) = self.begin_fetch();
        let result = self.endpoints.list(&query).await;
        self.finish_fetch(token, result)
    }

    /// Fetch only if the query changed since the last issued fetch. Any
    /// number of setter calls in between cost a single request.
    pub async fn sync(&self) -> Option<FetchOutcome> {
        let (token, query) = self.begin_fetch_if_stale()?;
        let result = self.endpoints.list(&query).await;
        Some(self.finish_fetch(token, result))
    }

    fn begin_fetch(&self) -> (u64, QueryState) {
        let mut tracker = self.tracker();
        self.issue(&mut tracker)
    }

    fn begin_fetch_if_stale(&self) -> Option<(u64, QueryState)> {
        let mut tracker = self.tracker();
        let current = self.state.borrow().query.clone();
        if tracker.issued.as_ref() == Some(&current) {
            return None;
        }
        Some(self.issue(&mut tracker))
    }

    fn issue(&self, tracker: &mut FetchTracker) -> (u64, QueryState) {
        tracker.latest += 1;
        let token = tracker.latest;
        let mut query = QueryState::default();
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            query = s.query.clone();
        });
        tracker.issued = Some(query.clone());
        debug!(
            entity = self.label(),
            token,
            page = query.page,
            search = %query.search,
            "list fetch issued"
        );
        (token, query)
    }

    fn finish_fetch(
        &self,
        token: u64,
        result: Result<PageEnvelope<EntityOf<P>>>,
    ) -> FetchOutcome {
        // Held while applying so a newer fetch cannot be issued between the
        // token check and the write.
        let tracker = self.tracker();
        if token != tracker.latest {
            debug!(
                entity = self.label(),
                token,
                latest = tracker.latest,
                "stale list response discarded"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let meta = page.meta;
                self.state.send_modify(|s| {
                    s.items = page.items;
                    s.meta = Some(meta);
                    s.loading = false;
                    s.error = None;
                    // The list shrank under us (e.g. last row of the last
                    // page deleted); the next sync fetches the clamped page.
                    if s.query.page > meta.max_page() {
                        s.query.page = meta.max_page();
                    }
                });
                debug!(
                    entity = self.label(),
                    token,
                    total = meta.total_elements,
                    pages = meta.total_pages,
                    "list fetch applied"
                );
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(entity = self.label(), token, error = %e, "list fetch failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Re-fetch after every query change, once the query has been quiet for
    /// `debounce`. Each fetch runs on its own task so a newer one supersedes
    /// an older one still in flight. The task ends when the controller is
    /// dropped.
    pub fn spawn_auto_refresh(self: &Arc<Self>, debounce: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let mut rx = self.state.subscribe();
        tokio::spawn(async move {
            loop {
                {
                    let Some(controller) = weak.upgrade() else {
                        break;
                    };
                    if let Some((token, query)) = controller.begin_fetch_if_stale() {
                        tokio::spawn(async move {
                            let result = controller.endpoints.list(&query).await;
                            controller.finish_fetch(token, result);
                        });
                    }
                }

                if rx.changed().await.is_err() {
                    break;
                }
                loop {
                    match tokio::time::timeout(debounce, rx.changed()).await {
                        Ok(Ok(())) => continue,
                        Ok(Err(_)) => return,
                        Err(_) => break,
                    }
                }
                rx.borrow_and_update();
            }
        })
    }

    // ---- mutations -----------------------------------------------------

    fn set_submitting(&self, submitting: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.submitting != submitting;
            s.submitting = submitting;
            changed
        });
    }

    /// Validate, create, then refresh the current page.
    pub async fn create(
        &self,
        payload: &<EntityOf<P> as Entity>::Create,
    ) -> Result<EntityOf<P>> {
        payload.validate()?;
        self.set_submitting(true);
        let result = self.endpoints.create(payload).await;
        self.set_submitting(false);

        let created = result.inspect_err(|e| {
            warn!(entity = self.label(), error = %e, "create failed");
        })?;
        info!(entity = self.label(), id = %created.id(), "created");
        self.refresh().await;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &IdOf<P>,
        payload: &<EntityOf<P> as Entity>::Update,
    ) -> Result<EntityOf<P>> {
        payload.validate()?;
        self.set_submitting(true);
        let result = self.endpoints.update(id, payload).await;
        self.set_submitting(false);

        let updated = result.inspect_err(|e| {
            warn!(entity = self.label(), %id, error = %e, "update failed");
        })?;
        info!(entity = self.label(), %id, "updated");
        self.refresh().await;
        Ok(updated)
    }

    /// Load one record for a detail view. Leaves list state untouched.
    pub async fn view(&self, id: &IdOf<P>) -> Result<EntityOf<P>> {
        self.endpoints.fetch(id).await
    }

    /// Stage `id` for deletion pending confirmation.
    pub fn request_delete(&self, id: IdOf<P>) {
        self.state.send_modify(|s| s.pending_delete = Some(id));
    }

    pub fn cancel_delete(&self) {
        self.state.send_if_modified(|s| s.pending_delete.take().is_some());
    }

    /// Delete the staged id and refresh. On failure the id stays staged so
    /// the user can retry or cancel.
    pub async fn confirm_delete(&self) -> Result<String> {
        let id = self
            .state
            .borrow()
            .pending_delete
            .clone()
            .ok_or(BackofficeError::NoPendingDelete)?;

        self.set_submitting(true);
        let result = self.endpoints.delete(&id).await;
        self.set_submitting(false);

        let message = result.inspect_err(|e| {
            warn!(entity = self.label(), %id, error = %e, "delete failed");
        })?;
        self.state.send_if_modified(|s| {
            if s.pending_delete.as_ref() == Some(&id) {
                s.pending_delete = None;
                true
            } else {
                false
            }
        });
        info!(entity = self.label(), %id, "deleted");
        self.refresh().await;
        Ok(message)
    }
}
