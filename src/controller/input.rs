//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Ctrl+Q quits from anywhere, including while typing
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Every edit of the query text is a query change
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter | KeyCode::Down => {
                    model.set_active_section(ActiveSection::MainContent).await;
                }
                KeyCode::Esc => {
                    let cleared = model.clear_search().await;
                    drop(model);
                    if cleared {
                        self.query_changed(String::new()).await;
                    }
                }
                KeyCode::Backspace => {
                    let query = model.backspace_search().await;
                    drop(model);
                    if let Some(query) = query {
                        self.query_changed(query).await;
                    }
                }
                KeyCode::Char(c) => {
                    let query = model.append_to_search(c).await;
                    drop(model);
                    self.query_changed(query).await;
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                model.toggle_section().await;
            }
            // Focus search
            KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            KeyCode::Up => {
                if ui_state.selected == 0 {
                    model.set_active_section(ActiveSection::Search).await;
                } else {
                    model.move_selection_up().await;
                }
            }
            KeyCode::Down => {
                drop(model);
                let rows = self.row_count().await;
                self.model.lock().await.move_selection_down(rows).await;
            }
            KeyCode::Enter | KeyCode::Right => {
                drop(model);
                self.open_selected().await;
            }
            KeyCode::Backspace | KeyCode::Esc | KeyCode::Left => {
                drop(model);
                self.navigate_back().await;
            }
            _ => {}
        }
        Ok(())
    }
}
