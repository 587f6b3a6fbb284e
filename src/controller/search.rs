//! Search session controller
//!
//! A single task owns the [`SearchSession`] and the one search request that
//! may still apply. Query changes arrive from the input side and the search
//! future is polled inside the same `select!`, so a search is always started
//! after every older one has been dropped. Every state change is published on
//! a `watch` channel that presentation subscribes to.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::model::{Artist, Catalog, ClientError, Completion, ResultsState, SearchSession, SearchToken};

struct SearchCompletion {
    token: SearchToken,
    result: Result<Vec<Artist>, ClientError>,
}

struct PendingSearch {
    token: SearchToken,
    query: String,
    deadline: Instant,
}

type RunningSearch = Pin<Box<dyn Future<Output = SearchCompletion> + Send>>;

/// Handle to the search session task. Cloning shares the same session.
#[derive(Clone)]
pub struct SearchController {
    queries: mpsc::UnboundedSender<String>,
    results: watch::Receiver<ResultsState>,
}

impl SearchController {
    /// Start the session task. `debounce` is the quiet period before a query
    /// is dispatched; a newer query typed within it replaces the pending one.
    pub fn spawn<C: Catalog>(catalog: Arc<C>, debounce: Duration) -> Self {
        let (queries_tx, queries_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = watch::channel(ResultsState::default());

        tokio::spawn(run_session(catalog, debounce, queries_rx, results_tx));

        Self {
            queries: queries_tx,
            results: results_rx,
        }
    }

    /// Query text changed (every keystroke)
    pub fn query_changed(&self, query: impl Into<String>) {
        if self.queries.send(query.into()).is_err() {
            tracing::warn!("Search session task is gone; query dropped");
        }
    }

    /// Subscription point for presentation; fires on every published change
    pub fn subscribe(&self) -> watch::Receiver<ResultsState> {
        self.results.clone()
    }

    pub fn current(&self) -> ResultsState {
        self.results.borrow().clone()
    }
}

async fn run_session<C: Catalog>(
    catalog: Arc<C>,
    debounce: Duration,
    mut queries: mpsc::UnboundedReceiver<String>,
    results: watch::Sender<ResultsState>,
) {
    let mut session = SearchSession::new();
    let mut pending: Option<PendingSearch> = None;
    let mut running: Option<RunningSearch> = None;

    tracing::debug!(debounce_ms = debounce.as_millis() as u64, "Search session started");

    loop {
        let deadline = pending.as_ref().map(|p| p.deadline);

        tokio::select! {
            query = queries.recv() => {
                let Some(query) = query else { break };

                // Dropping the running search aborts its request
                running = None;
                match session.query_changed(&query) {
                    Some(token) => {
                        tracing::debug!(query = %query, ?token, "Query changed");
                        catalog.cancel_search().await;
                        let search = PendingSearch { token, query, deadline: Instant::now() + debounce };
                        if debounce.is_zero() {
                            running = Some(start_search(&catalog, search));
                            pending = None;
                        } else {
                            pending = Some(search);
                        }
                    }
                    None => {
                        tracing::debug!("Query cleared");
                        pending = None;
                        catalog.cancel_search().await;
                    }
                }
                results.send_replace(session.snapshot());
            }
            done = next_completion(&mut running) => {
                running = None;
                match session.complete(done.token, done.result) {
                    Completion::Applied => {
                        let state = session.snapshot();
                        tracing::info!(query = %state.query, artists = state.artists.len(), "Search results applied");
                        results.send_replace(state);
                    }
                    Completion::Failed => {
                        let state = session.snapshot();
                        if let Some(error) = &state.error {
                            tracing::warn!(query = %state.query, error = %error, "Search failed");
                        }
                        results.send_replace(state);
                    }
                    Completion::Superseded => {
                        tracing::trace!(token = ?done.token, "Discarding superseded search reply");
                    }
                }
            }
            _ = sleep_until_deadline(deadline) => {
                if let Some(search) = pending.take() {
                    running = Some(start_search(&catalog, search));
                }
            }
        }
    }

    tracing::debug!("Search session stopped");
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn next_completion(running: &mut Option<RunningSearch>) -> SearchCompletion {
    match running {
        Some(search) => search.await,
        None => std::future::pending().await,
    }
}

/// The request is issued when the session task first polls the returned future
fn start_search<C: Catalog>(catalog: &Arc<C>, search: PendingSearch) -> RunningSearch {
    let catalog = catalog.clone();
    Box::pin(async move {
        let result = catalog.search_artists(&search.query, true).await;
        SearchCompletion {
            token: search.token,
            result,
        }
    })
}
