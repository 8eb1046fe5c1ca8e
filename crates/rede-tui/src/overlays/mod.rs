//! Modal overlays.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::render::centered_rect;
use crate::state::AppState;

/// The active modal overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// "Deseja realmente sair?" before clearing the session.
    ConfirmSignOut,
}

/// Key handling while an overlay is open.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match app.overlay {
        Some(Overlay::ConfirmSignOut) => match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.overlay = None;
                if app.tui.tasks.state(TaskKind::SignOut).is_running() {
                    return vec![];
                }
                let task = app.tui.task_seq.next_id();
                vec![UiEffect::SpawnSignOut { task }]
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                app.overlay = None;
                vec![]
            }
            _ => vec![],
        },
        None => vec![],
    }
}

/// Renders the active overlay on top of the current screen.
pub fn render(frame: &mut Frame, area: Rect, overlay: Overlay) {
    match overlay {
        Overlay::ConfirmSignOut => {
            let card = centered_rect(40, 5, area);
            frame.render_widget(Clear, card);
            let block = Block::bordered().title(" sign out ");
            let inner = block.inner(card);
            frame.render_widget(block, card);
            let lines = vec![
                Line::from("Deseja realmente sair da conta?"),
                Line::from("Enter/y confirm · Esc/n cancel").dim(),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
        }
    }
}
