//! Top-level render dispatch.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::widgets::Paragraph;

use crate::features::{auth, feed, profile};
use crate::overlays;
use crate::state::{AppState, Screen, SessionView};

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner glyph for the given animation frame.
pub fn spinner_char(frame: usize) -> char {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Renders the whole application.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    if app.tui.session == SessionView::Hydrating {
        frame.render_widget(
            Paragraph::new(format!(
                "{} restoring session…",
                spinner_char(app.tui.spinner_frame)
            ))
            .dim()
            .centered(),
            centered_rect(40, 1, area),
        );
        return;
    }

    match app.tui.screen {
        Screen::Login => auth::render_login(frame, area, &app.tui),
        Screen::Signup => auth::render_signup(frame, area, &app.tui),
        Screen::Feed => feed::render_feed(frame, area, &app.tui),
        Screen::Profile => profile::render_profile(frame, area, &app.tui),
    }

    if let Some(overlay) = app.overlay {
        overlays::render(frame, area, overlay);
    }
}

/// A `width` x `height` rect centered inside `area`, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
