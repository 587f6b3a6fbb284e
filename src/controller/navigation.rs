//! Navigation from search results to an artist's albums and an album's tracklist
//!
//! Each selection fetches the next screen's records using the identifier of
//! the selected row. Empty or failed fetches leave the current screen in place
//! and set an inline notice instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{Album, Artist, Catalog, ClientError, ContentState, InlineNotice, Screen};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Navigated,
    /// Nothing to show; navigation blocked
    Empty,
    Failed(ClientError),
    /// Busy with another selection, not valid on this screen, cancelled, or
    /// overtaken by a reset
    Ignored,
}

pub struct NavigationFlow<C> {
    catalog: Arc<C>,
    state: Arc<Mutex<ContentState>>,
    /// Bumped by `reset`; a fetch started under an older epoch is discarded
    epoch: Arc<AtomicU64>,
}

impl<C> Clone for NavigationFlow<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            state: self.state.clone(),
            epoch: self.epoch.clone(),
        }
    }
}

impl<C: Catalog> NavigationFlow<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            state: Arc::new(Mutex::new(ContentState::default())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> ContentState {
        self.state.lock().await.clone()
    }

    /// Mark a fetch as started, unless one is already running or the current
    /// screen doesn't accept this selection
    async fn begin(&self, accepts: impl Fn(&Screen) -> bool) -> Option<u64> {
        let mut state = self.state.lock().await;
        if state.is_loading || !accepts(&state.view) {
            return None;
        }
        state.is_loading = true;
        state.notice = None;
        Some(self.epoch.load(Ordering::SeqCst))
    }

    async fn finish<T>(
        &self,
        epoch: u64,
        result: Result<Vec<T>, ClientError>,
        empty_notice: InlineNotice,
        next_screen: impl FnOnce(Arc<[T]>) -> Screen,
    ) -> NavigationOutcome {
        let mut state = self.state.lock().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("Discarding selection result after reset");
            return NavigationOutcome::Ignored;
        }
        state.is_loading = false;

        match result {
            Ok(items) if items.is_empty() => {
                tracing::info!(notice = %empty_notice, "Navigation blocked on empty result");
                state.notice = Some(empty_notice);
                NavigationOutcome::Empty
            }
            Ok(items) => {
                let previous = std::mem::replace(&mut state.view, next_screen(items.into()));
                state.navigation_stack.push(previous);
                NavigationOutcome::Navigated
            }
            Err(ClientError::Cancelled) => NavigationOutcome::Ignored,
            Err(error) => {
                state.notice = Some(InlineNotice::Failed(error.to_string()));
                NavigationOutcome::Failed(error)
            }
        }
    }

    /// Search results -> album list
    pub async fn select_artist(&self, artist: Artist) -> NavigationOutcome {
        let Some(epoch) = self.begin(|screen| matches!(screen, Screen::Search)).await else {
            return NavigationOutcome::Ignored;
        };

        tracing::debug!(artist_id = %artist.id, artist = %artist.name, "Opening artist");
        let result = self.catalog.list_albums(artist.id).await;
        let notice = InlineNotice::NoAlbums { artist: artist.name.clone() };
        self.finish(epoch, result, notice, |albums| Screen::Albums { artist, albums })
            .await
    }

    /// Album list -> tracklist
    pub async fn select_album(&self, album: Album) -> NavigationOutcome {
        let artist = {
            let state = self.state.lock().await;
            match &state.view {
                Screen::Albums { artist, .. } => artist.clone(),
                _ => return NavigationOutcome::Ignored,
            }
        };
        let Some(epoch) = self.begin(|screen| matches!(screen, Screen::Albums { .. })).await else {
            return NavigationOutcome::Ignored;
        };

        tracing::debug!(album_id = %album.id, album = %album.title, "Opening album");
        let result = self.catalog.list_tracks(album.id).await;
        let notice = InlineNotice::NoTracks { album: album.title.clone() };
        self.finish(epoch, result, notice, |tracks| Screen::Tracklist { artist, album, tracks })
            .await
    }

    /// Pop one screen; returns false at the root
    pub async fn back(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.is_loading {
            return false;
        }
        state.notice = None;
        match state.navigation_stack.pop() {
            Some(previous) => {
                state.view = previous;
                true
            }
            None => false,
        }
    }

    /// Return to the search screen (a new query was typed)
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        state.is_loading = false;
        let root = state.navigation_stack.drain(..).next();
        if let Some(root) = root {
            state.view = root;
        }
        state.notice = None;
    }

    pub async fn dismiss_notice(&self) {
        self.state.lock().await.notice = None;
    }
}
