//! Main application model with UI state management

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::types::{ActiveSection, Artwork, UiState};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Presentation-side state. Search results and the screen stack live with
/// their controllers; this holds what only the terminal UI cares about.
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    artwork: Arc<RwLock<HashMap<String, Artwork>>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            artwork: Arc::new(RwLock::new(HashMap::new())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn toggle_section(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.toggle();
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.selected = state.selected.saturating_sub(1);
    }

    /// `len` is the row count of the screen being shown
    pub async fn move_selection_down(&self, len: usize) {
        let mut state = self.ui_state.lock().await;
        if state.selected < len.saturating_sub(1) {
            state.selected += 1;
        }
    }

    pub async fn reset_selection(&self) {
        self.ui_state.lock().await.selected = 0;
    }

    pub async fn selected(&self) -> usize {
        self.ui_state.lock().await.selected
    }

    /// Returns the query after the edit
    pub async fn append_to_search(&self, c: char) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
        state.search_query.clone()
    }

    /// Returns the query after the edit, or `None` if it was already empty
    pub async fn backspace_search(&self) -> Option<String> {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop()?;
        Some(state.search_query.clone())
    }

    pub async fn clear_search(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        let had_text = !state.search_query.is_empty();
        state.search_query.clear();
        had_text
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() > ERROR_DISPLAY_TIME {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Row artwork
    // ========================================================================

    /// Claim an artwork URL for loading. False if it is already known.
    pub async fn begin_artwork(&self, url: &str) -> bool {
        let mut artwork = self.artwork.write().await;
        if url.is_empty() || artwork.contains_key(url) {
            return false;
        }
        artwork.insert(url.to_string(), Artwork::Loading);
        true
    }

    pub async fn set_artwork(&self, url: String, state: Artwork) {
        self.artwork.write().await.insert(url, state);
    }

    pub async fn get_artwork(&self) -> HashMap<String, Artwork> {
        self.artwork.read().await.clone()
    }

    pub async fn clear_artwork(&self) {
        self.artwork.write().await.clear();
    }
}
