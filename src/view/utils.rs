//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

use crate::model::Artwork;

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn row_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Render a duration in whole seconds as `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Short label for a row's artwork column
pub fn format_artwork(artwork: Option<&Artwork>) -> String {
    match artwork {
        Some(Artwork::Ready { width, height }) => format!("{}x{}", width, height),
        Some(Artwork::Loading) => "...".to_string(),
        Some(Artwork::Failed) | None => "-".to_string(),
    }
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(181), "3:01");
        assert_eq!(format_duration(987), "16:27");
    }

    #[test]
    fn test_truncate_string_pads_and_cuts() {
        assert_eq!(truncate_string("Discovery", 12), "Discovery   ");
        assert_eq!(truncate_string("Random Access Memories", 10), "Random ...");
    }

    #[test]
    fn test_calculate_num_width() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(25), 3);
    }

    #[test]
    fn test_format_artwork() {
        assert_eq!(format_artwork(Some(&Artwork::Ready { width: 56, height: 56 })), "56x56");
        assert_eq!(format_artwork(Some(&Artwork::Loading)), "...");
        assert_eq!(format_artwork(None), "-");
    }
}
