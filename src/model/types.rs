//! Core type definitions for the application

use std::time::Instant;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Search,
    MainContent,
}

impl ActiveSection {
    pub fn toggle(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }
}

/// Load state of one piece of row artwork, keyed by URL in the model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artwork {
    Loading,
    Ready { width: u32, height: u32 },
    Failed,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    /// Highlighted row on the current content screen
    pub selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}
