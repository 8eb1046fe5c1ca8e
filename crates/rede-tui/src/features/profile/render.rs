//! Profile screen rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::common::TaskKind;
use crate::features::feed::post_heading;
use crate::render::spinner_char;
use crate::state::TuiState;

const ROWS_PER_POST: usize = 3;

/// Renders the profile screen.
pub fn render_profile(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(profile) = tui.profile.as_ref() else {
        return;
    };

    let rows = Layout::vertical([
        Constraint::Length(5), // header card
        Constraint::Min(1),    // posts
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(frame, rows[0], tui);
    render_posts(frame, rows[1], tui);

    let footer = if let Some(error) = profile.error.as_deref().or(profile.posts.error()) {
        Paragraph::new(error).red()
    } else if tui.tasks.state(TaskKind::ProfilePosts).is_running() {
        Paragraph::new(format!("{} loading…", spinner_char(tui.spinner_frame))).dim()
    } else {
        Paragraph::new("↑/↓ scroll · Ctrl+R reload · Esc back").dim()
    };
    frame.render_widget(footer, rows[2]);
}

fn render_header(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(profile) = tui.profile.as_ref() else {
        return;
    };
    let block = Block::bordered().title(" profile ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &profile.header {
        Some(header) => {
            let lines = vec![
                Line::from(vec![
                    Span::styled(header.user.name.clone(), Style::new().bold()),
                    Span::raw(format!("  <{}>", header.user.email)).dim(),
                ]),
                Line::from(vec![
                    Span::styled(header.stats.posts.to_string(), Style::new().bold()),
                    Span::raw(" posts · ").dim(),
                    Span::styled(header.stats.followers.to_string(), Style::new().bold()),
                    Span::raw(" seguidores · ").dim(),
                    Span::styled(header.stats.following.to_string(), Style::new().bold()),
                    Span::raw(" seguindo").dim(),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
        }
        None => {
            frame.render_widget(
                Paragraph::new(format!("{} loading profile…", spinner_char(tui.spinner_frame)))
                    .dim(),
                inner,
            );
        }
    }
}

fn render_posts(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(profile) = tui.profile.as_ref() else {
        return;
    };
    let visible = (area.height as usize / ROWS_PER_POST).max(1);
    profile.list_rows.set(visible);

    let items = profile.posts.items();
    if items.is_empty() && profile.posts.loaded_once() {
        frame.render_widget(Paragraph::new("No posts yet.").dim().centered(), area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for post in items.iter().skip(profile.scroll) {
        lines.push(post_heading(post));
        lines.push(Line::from(post.content.clone()));
        lines.push(Line::default());
        if lines.len() >= area.height as usize + ROWS_PER_POST {
            break;
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
