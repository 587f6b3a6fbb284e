//! Controller module - application logic and event handling
//!
//! - `search`: the search session task and its results subscription
//! - `navigation`: artist -> albums -> tracklist drill-down
//! - `input`: key event handling for the terminal UI

mod input;
mod navigation;
mod search;

pub use navigation::{NavigationFlow, NavigationOutcome};
pub use search::SearchController;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::model::{
    AppModel, Artwork, CatalogClient, ClientError, ContentState, ImageLoader, ImageSize, NetworkFailure,
    ResultsState, Screen, SearchStatus,
};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    search: SearchController,
    navigation: NavigationFlow<CatalogClient>,
    images: ImageLoader,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, catalog: Arc<CatalogClient>, images: ImageLoader, debounce: Duration) -> Self {
        Self {
            model,
            search: SearchController::spawn(catalog.clone(), debounce),
            navigation: NavigationFlow::new(catalog),
            images,
        }
    }

    pub fn results(&self) -> ResultsState {
        self.search.current()
    }

    pub async fn content(&self) -> ContentState {
        self.navigation.snapshot().await
    }

    /// React to published search states: load artist pictures for applied
    /// results, raise the error popup for failed ones
    pub fn start_results_listener(&self) {
        let controller = self.clone();
        let mut results = self.search.subscribe();
        tokio::spawn(async move {
            while results.changed().await.is_ok() {
                let state = results.borrow_and_update().clone();
                match state.status {
                    SearchStatus::Applied => {
                        let urls = state
                            .artists
                            .iter()
                            .map(|artist| artist.picture(ImageSize::Small).to_string())
                            .collect();
                        controller.load_artwork(urls).await;
                    }
                    SearchStatus::Failed => {
                        if let Some(error) = &state.error {
                            let message = Self::format_error(error);
                            controller.model.lock().await.set_error(message).await;
                        }
                    }
                    SearchStatus::Idle | SearchStatus::Loading => {}
                }
            }
            tracing::debug!("Results listener stopped");
        });
    }

    /// Fetch each URL not already loaded or loading; completions land in the model
    pub(crate) async fn load_artwork(&self, urls: Vec<String>) {
        for url in urls {
            if !self.model.lock().await.begin_artwork(&url).await {
                continue;
            }
            let model = self.model.clone();
            let images = self.images.clone();
            tokio::spawn(async move {
                let (url, artwork) = match images.load_image(&url).await {
                    Ok(image) => {
                        tracing::trace!(url = %image.url, bytes = image.bytes.len(), "Artwork loaded");
                        let artwork = Artwork::Ready {
                            width: image.width,
                            height: image.height,
                        };
                        (image.url, artwork)
                    }
                    Err(e) => {
                        tracing::debug!(url = %url, error = %e, "Artwork unavailable");
                        (url, Artwork::Failed)
                    }
                };
                model.lock().await.set_artwork(url, artwork).await;
            });
        }
    }

    /// The query text changed: restart the search and drop back to the results screen
    pub(crate) async fn query_changed(&self, query: String) {
        self.search.query_changed(query);
        self.navigation.reset().await;
        let model = self.model.lock().await;
        model.reset_selection().await;
        model.clear_artwork().await;
    }

    /// Open the highlighted row. Runs in the background so input stays live.
    pub(crate) async fn open_selected(&self) {
        let selected = self.model.lock().await.selected().await;
        let content = self.navigation.snapshot().await;
        if content.is_loading {
            return;
        }

        let controller = self.clone();
        match content.view {
            Screen::Search => {
                let Some(artist) = self.search.current().artists.get(selected).cloned() else {
                    return;
                };
                tokio::spawn(async move {
                    let outcome = controller.navigation.select_artist(artist).await;
                    controller.after_navigation(outcome).await;
                });
            }
            Screen::Albums { albums, .. } => {
                let Some(album) = albums.get(selected).cloned() else {
                    return;
                };
                tokio::spawn(async move {
                    let outcome = controller.navigation.select_album(album).await;
                    controller.after_navigation(outcome).await;
                });
            }
            Screen::Tracklist { .. } => {}
        }
    }

    async fn after_navigation(&self, outcome: NavigationOutcome) {
        match outcome {
            NavigationOutcome::Navigated => {
                self.model.lock().await.reset_selection().await;
                if let Screen::Albums { albums, .. } = self.navigation.snapshot().await.view {
                    let covers = albums
                        .iter()
                        .map(|album| album.cover(ImageSize::Small).to_string())
                        .collect();
                    self.load_artwork(covers).await;
                }
            }
            NavigationOutcome::Failed(error) => {
                tracing::warn!(error = %error, "Navigation failed");
            }
            NavigationOutcome::Empty | NavigationOutcome::Ignored => {}
        }
    }

    pub(crate) async fn navigate_back(&self) -> bool {
        let moved = self.navigation.back().await;
        if moved {
            self.model.lock().await.reset_selection().await;
        } else {
            self.navigation.dismiss_notice().await;
        }
        moved
    }

    /// Number of rows on the screen currently shown
    pub(crate) async fn row_count(&self) -> usize {
        match self.navigation.snapshot().await.view {
            Screen::Search => self.search.current().artists.len(),
            Screen::Albums { albums, .. } => albums.len(),
            Screen::Tracklist { tracks, .. } => tracks.len(),
        }
    }

    pub(crate) fn format_error(error: &ClientError) -> String {
        match error {
            ClientError::Network(NetworkFailure::Transport(detail)) if detail.contains("429") => {
                "Rate limited. Please wait a moment.".to_string()
            }
            ClientError::Network(NetworkFailure::Transport(detail)) => {
                format!("Could not reach the catalog: {}", detail)
            }
            ClientError::Network(NetworkFailure::NoData) => "The catalog returned no data.".to_string(),
            ClientError::Decode(e) => format!("Unexpected response: {}", e),
            ClientError::Cancelled => "Request cancelled.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecodeFailure;

    #[test]
    fn test_format_error_messages() {
        let rate_limited = ClientError::Network(NetworkFailure::Transport("unexpected HTTP status 429".to_string()));
        assert_eq!(AppController::format_error(&rate_limited), "Rate limited. Please wait a moment.");

        let refused = ClientError::Network(NetworkFailure::Transport("connection refused".to_string()));
        assert_eq!(
            AppController::format_error(&refused),
            "Could not reach the catalog: connection refused"
        );

        let malformed = ClientError::Decode(DecodeFailure::Malformed("missing field `id`".to_string()));
        assert!(AppController::format_error(&malformed).starts_with("Unexpected response:"));
    }
}
