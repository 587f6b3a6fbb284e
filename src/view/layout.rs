//! Layout rendering (top bar, status bar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, ContentState, InlineNotice, ResultsState, Screen, SearchStatus, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, results: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(22), // Search status
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type to search artists..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(if is_focused {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(search, chunks[0]);

    let (status_text, status_color) = match results.status {
        SearchStatus::Idle => ("Idle".to_string(), Color::DarkGray),
        SearchStatus::Loading => ("Searching...".to_string(), Color::Yellow),
        SearchStatus::Applied => (format!("{} artists", results.artists.len()), Color::Cyan),
        SearchStatus::Failed => ("Failed".to_string(), Color::Red),
    };
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

/// Breadcrumb of the current screen, plus the inline notice when one is set
pub fn render_status_bar(frame: &mut Frame, area: Rect, content_state: &ContentState) {
    let mut spans = vec![Span::styled(breadcrumb(&content_state.view), Style::default().fg(Color::Cyan))];

    if let Some(notice) = &content_state.notice {
        let color = match notice {
            InlineNotice::Failed(_) => Color::Red,
            InlineNotice::NoAlbums { .. } | InlineNotice::NoTracks { .. } => Color::Yellow,
        };
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(notice.to_string(), Style::default().fg(color)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(bar, area);
}

fn breadcrumb(screen: &Screen) -> String {
    match screen {
        Screen::Search => "Artists".to_string(),
        Screen::Albums { artist, .. } => format!("Artists > {}", artist.name),
        Screen::Tracklist { artist, album, .. } => format!("Artists > {} > {}", artist.name, album.title),
    }
}
