//! View module - UI rendering
//!
//! - `utils`: shared formatting and list helpers
//! - `layout`: top bar and status bar
//! - `content`: main content area
//! - `overlays`: error notification and help popup

mod utils;
mod layout;
mod content;
mod overlays;

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{Artwork, ContentState, ResultsState, UiState};

pub use utils::format_duration;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        results: &ResultsState,
        content_state: &ContentState,
        artwork: &HashMap<String, Artwork>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + status
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Breadcrumb + notice
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, results);
        content::render_main_content(frame, chunks[1], ui_state, results, content_state, artwork);
        layout::render_status_bar(frame, chunks[2], content_state);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
