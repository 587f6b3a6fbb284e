//! Main content area rendering (artist results, album list, tracklist)

use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{
    ActiveSection, Album, Artist, Artwork, ContentState, ImageSize, ResultsState, Screen, SearchStatus, Track,
    UiState,
};
use super::utils::{
    calculate_num_width, format_artwork, format_duration, render_scrollable_list, row_style, truncate_string,
};

const ARTWORK_WIDTH: usize = 9;

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    results: &ResultsState,
    content_state: &ContentState,
    artwork: &HashMap<String, Artwork>,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let title = if content_state.is_loading {
        format!("{}(loading...) ", content_state.view.title())
    } else {
        content_state.view.title()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    let content_width = area.width.saturating_sub(4) as usize;
    let selected = ui_state.selected;

    match &content_state.view {
        Screen::Search => {
            if let Some(message) = search_placeholder(results) {
                let placeholder = Paragraph::new(message)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                frame.render_widget(placeholder, area);
                return;
            }
            let items = artist_items(&results.artists, selected, is_focused, content_width, artwork);
            render_scrollable_list(frame, area, items, selected, block);
        }
        Screen::Albums { albums, .. } => {
            let items = album_items(albums, selected, is_focused, content_width, artwork);
            render_scrollable_list(frame, area, items, selected, block);
        }
        Screen::Tracklist { tracks, .. } => {
            let items = track_items(tracks, selected, is_focused, content_width);
            render_scrollable_list(frame, area, items, selected, block);
        }
    }
}

fn search_placeholder(results: &ResultsState) -> Option<String> {
    match results.status {
        SearchStatus::Idle => Some("Start typing to search artists\n\nPress H for help".to_string()),
        SearchStatus::Loading => Some("Searching...".to_string()),
        SearchStatus::Failed => Some(format!("Search for \"{}\" failed", results.query)),
        SearchStatus::Applied if results.artists.is_empty() => {
            Some(format!("No artists match \"{}\"", results.query))
        }
        SearchStatus::Applied => None,
    }
}

fn artist_items<'a>(
    artists: &[Artist],
    selected: usize,
    is_focused: bool,
    content_width: usize,
    artwork: &HashMap<String, Artwork>,
) -> Vec<ListItem<'a>> {
    let num_width = calculate_num_width(artists.len());
    let name_width = content_width.saturating_sub(num_width + 3 + ARTWORK_WIDTH);

    artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            let art = format_artwork(artwork.get(artist.picture(ImageSize::Small)));
            let line = format!(
                "{:>num_width$}  {} {:>art_width$}",
                i + 1,
                truncate_string(&artist.name, name_width),
                art,
                num_width = num_width,
                art_width = ARTWORK_WIDTH,
            );
            ListItem::new(line).style(row_style(i == selected, is_focused))
        })
        .collect()
}

fn album_items<'a>(
    albums: &[Album],
    selected: usize,
    is_focused: bool,
    content_width: usize,
    artwork: &HashMap<String, Artwork>,
) -> Vec<ListItem<'a>> {
    let num_width = calculate_num_width(albums.len());
    // year(4) + explicit marker(1) + record type(8) + separators
    let fixed_width = num_width + 2 + 1 + 4 + 2 + 1 + 2 + 8 + 1 + ARTWORK_WIDTH;
    let title_width = content_width.saturating_sub(fixed_width);

    albums
        .iter()
        .enumerate()
        .map(|(i, album)| {
            let year = album
                .release_year()
                .map(|year| year.to_string())
                .unwrap_or_else(|| "----".to_string());
            let explicit = if album.is_explicit { "E" } else { " " };
            let art = format_artwork(artwork.get(album.cover(ImageSize::Small)));
            let line = format!(
                "{:>num_width$}  {} {}  {}  {:<8} {:>art_width$}",
                i + 1,
                truncate_string(&album.title, title_width),
                year,
                explicit,
                truncate_string(&album.record_type, 8),
                art,
                num_width = num_width,
                art_width = ARTWORK_WIDTH,
            );
            ListItem::new(line).style(row_style(i == selected, is_focused))
        })
        .collect()
}

fn track_items<'a>(tracks: &[Track], selected: usize, is_focused: bool, content_width: usize) -> Vec<ListItem<'a>> {
    let num_width = tracks
        .iter()
        .map(|track| track.position.to_string().len() + 1)
        .max()
        .unwrap_or(2);
    let duration_width = 6;
    let title_width = content_width.saturating_sub(num_width + 2 + 1 + 2 + duration_width);

    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let explicit = if track.is_explicit { "E" } else { " " };
            let line = format!(
                "{:>num_width$}  {} {}  {:>duration_width$}",
                track.position,
                truncate_string(&track.title, title_width),
                explicit,
                format_duration(track.duration_seconds),
                num_width = num_width,
                duration_width = duration_width,
            );
            ListItem::new(line).style(row_style(i == selected, is_focused))
        })
        .collect()
}
