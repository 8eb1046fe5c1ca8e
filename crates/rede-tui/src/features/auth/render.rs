//! Login and signup screen rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::common::TaskKind;
use crate::render::{centered_rect, spinner_char};
use crate::state::TuiState;

use super::AuthField;

/// Renders the login screen.
pub fn render_login(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let card = centered_rect(46, 12, area);
    let block = Block::bordered().title(" rede — sign in ");
    frame.render_widget(&block, card);
    let inner = block.inner(card);

    let rows = Layout::vertical([
        Constraint::Length(2), // email
        Constraint::Length(2), // password
        Constraint::Length(1), // status / error
        Constraint::Length(1),
        Constraint::Min(0), // hints
    ])
    .split(inner);

    render_field(frame, rows[0], "Email", &tui.login.email, false, tui.login.field == AuthField::Email);
    render_field(
        frame,
        rows[1],
        "Password",
        &tui.login.password,
        true,
        tui.login.field == AuthField::Password,
    );

    if tui.tasks.state(TaskKind::SignIn).is_running() {
        let line = Line::from(format!("{} signing in…", spinner_char(tui.spinner_frame)));
        frame.render_widget(Paragraph::new(line).dim(), rows[2]);
    } else if let Some(error) = &tui.login.error {
        frame.render_widget(Paragraph::new(error.as_str()).red(), rows[2]);
    }

    let hints = Line::from(vec![
        Span::raw("Enter sign in · Tab switch field · "),
        Span::raw("Ctrl+N create account · Esc quit"),
    ]);
    frame.render_widget(Paragraph::new(hints).dim(), rows[4]);
}

/// Renders the signup screen.
pub fn render_signup(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let card = centered_rect(46, 14, area);
    let block = Block::bordered().title(" rede — create account ");
    frame.render_widget(&block, card);
    let inner = block.inner(card);

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    render_field(frame, rows[0], "Name", &tui.signup.name, false, tui.signup.field == AuthField::Name);
    render_field(frame, rows[1], "Email", &tui.signup.email, false, tui.signup.field == AuthField::Email);
    render_field(
        frame,
        rows[2],
        "Password",
        &tui.signup.password,
        true,
        tui.signup.field == AuthField::Password,
    );

    if tui.tasks.state(TaskKind::SignUp).is_running() {
        let line = Line::from(format!("{} creating account…", spinner_char(tui.spinner_frame)));
        frame.render_widget(Paragraph::new(line).dim(), rows[3]);
    } else if let Some(error) = &tui.signup.error {
        frame.render_widget(Paragraph::new(error.as_str()).red(), rows[3]);
    }

    frame.render_widget(
        Paragraph::new("Enter create · Tab next field · Esc back").dim(),
        rows[5],
    );
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    masked: bool,
    focused: bool,
) {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let marker = if focused { "▸ " } else { "  " };
    let line = Line::from(vec![
        Span::styled(format!("{marker}{label}: "), Style::new().bold()),
        Span::raw(shown),
        Span::raw(if focused { "▏" } else { "" }),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
