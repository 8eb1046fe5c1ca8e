//! Feed screen rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::common::TaskKind;
use crate::render::spinner_char;
use crate::state::TuiState;

/// Rows of terminal space per rendered post (author line + content + gap).
const ROWS_PER_POST: usize = 3;

/// Renders the feed screen.
pub fn render_feed(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let rows = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // composer
        Constraint::Min(1),    // post list
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(frame, rows[0], tui);
    render_composer(frame, rows[1], tui);
    render_posts(frame, rows[2], tui);
    render_footer(frame, rows[3], tui);
}

fn render_header(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let mut spans = vec![Span::styled("rede — feed", ratatui::style::Style::new().bold())];
    if let Some(user) = tui.session.user() {
        spans.push(Span::raw("   "));
        spans.push(Span::raw(format!("Olá, {}", user.name)).dim());
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_composer(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let publishing = tui.tasks.state(TaskKind::PostCreate).is_running();
    let title = if publishing {
        format!(" {} publishing… ", spinner_char(tui.spinner_frame))
    } else {
        " new post (Enter to publish) ".to_string()
    };
    let block = Block::bordered().title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(tui.composer.text.as_str()), inner);

    let cursor_x = tui.composer.text[..tui.composer.cursor].width() as u16;
    frame.set_cursor_position(Position::new(
        inner.x.saturating_add(cursor_x).min(inner.right().saturating_sub(1)),
        inner.y,
    ));
}

fn render_posts(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let visible = (area.height as usize / ROWS_PER_POST).max(1);
    tui.feed_view.list_rows.set(visible);

    let items = tui.feed.items();
    if items.is_empty() && tui.feed.loaded_once() {
        frame.render_widget(
            Paragraph::new("Nenhum post ainda. Seja o primeiro!").dim().centered(),
            area,
        );
        return;
    }
    if !tui.feed.loaded_once() {
        frame.render_widget(
            Paragraph::new(format!("{} loading feed…", spinner_char(tui.spinner_frame)))
                .dim()
                .centered(),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for post in items.iter().skip(tui.feed_view.scroll) {
        lines.push(post_heading(post));
        lines.push(Line::from(post.content.clone()));
        lines.push(Line::default());
        if lines.len() >= area.height as usize + ROWS_PER_POST {
            break;
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub(crate) fn post_heading(post: &rede_core::api::types::Post) -> Line<'static> {
    let mut spans = vec![Span::styled(
        post.author_label(),
        ratatui::style::Style::new().bold(),
    )];
    if let Some(when) = post.created_at_display() {
        spans.push(Span::raw(" · ").dim());
        spans.push(Span::raw(when).dim());
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, area: Rect, tui: &TuiState) {
    if let Some(error) = tui.composer.error.as_deref().or(tui.feed.error()) {
        frame.render_widget(Paragraph::new(error).red(), area);
        return;
    }
    if tui.tasks.state(TaskKind::FeedRefresh).is_running() {
        frame.render_widget(
            Paragraph::new(format!("{} refreshing…", spinner_char(tui.spinner_frame))).dim(),
            area,
        );
        return;
    }
    if tui.tasks.state(TaskKind::FeedMore).is_running() {
        frame.render_widget(
            Paragraph::new(format!("{} loading more…", spinner_char(tui.spinner_frame))).dim(),
            area,
        );
        return;
    }
    let hints = if tui.feed.loaded_once() && !tui.feed.has_more() {
        "— end of feed —  ·  Ctrl+R refresh · Ctrl+P profile · Ctrl+D sign out · Ctrl+Q quit"
    } else {
        "↑/↓ scroll · Ctrl+R refresh · Ctrl+P profile · Ctrl+D sign out · Ctrl+Q quit"
    };
    frame.render_widget(Paragraph::new(hints).dim(), area);
}
