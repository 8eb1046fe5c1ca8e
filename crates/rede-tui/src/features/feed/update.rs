//! Feed feature reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rede_core::feed::FetchKind;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::FeedUiEvent;
use crate::features::profile;
use crate::overlays::Overlay;
use crate::state::{AppState, TuiState};

/// Task slot for each feed fetch kind.
pub fn feed_task_kind(kind: FetchKind) -> TaskKind {
    match kind {
        FetchKind::Initial => TaskKind::FeedInitial,
        FetchKind::Refresh => TaskKind::FeedRefresh,
        FetchKind::More => TaskKind::FeedMore,
    }
}

/// Asks the feed state machine for a fetch and turns the answer into
/// effects. Returns nothing when the fetch is guarded off (already in
/// flight, exhausted, no anchor).
///
/// A new initial/refresh supersedes an outstanding append: its token is
/// cancelled here, and its generation was already invalidated by
/// `FeedState::begin`.
pub fn start_fetch(tui: &mut TuiState, kind: FetchKind) -> Vec<UiEffect> {
    let stale_token = match kind {
        FetchKind::Initial | FetchKind::Refresh => tui.tasks.feed_more.cancel.clone(),
        FetchKind::More => None,
    };

    let Some(request) = tui.feed.begin(kind) else {
        return vec![];
    };

    let mut effects = Vec::new();
    if let Some(token) = stale_token {
        effects.push(UiEffect::CancelTask { token: Some(token) });
    }
    effects.push(UiEffect::SpawnFeedPage {
        task: tui.task_seq.next_id(),
        kind,
        generation: request.generation,
        offset: request.offset,
        limit: request.limit,
    });
    effects
}

/// Applies a feed operation result.
pub fn handle_feed_event(tui: &mut TuiState, event: FeedUiEvent) -> Vec<UiEffect> {
    match event {
        FeedUiEvent::PageFinished {
            id,
            kind,
            generation,
            result,
        } => {
            tui.tasks.state_mut(feed_task_kind(kind)).finish_if_active(id);
            match result {
                Ok(posts) => {
                    tui.feed.apply_page(generation, posts);
                    clamp_scroll(tui);
                }
                Err(err) if err.is_unauthorized() => {
                    tui.feed.fail(generation, &err);
                    tui.on_session_lost();
                }
                Err(err) => {
                    tui.feed.fail(generation, &err);
                }
            }
            vec![]
        }
        FeedUiEvent::CreateFinished { id, result } => {
            tui.tasks.state_mut(TaskKind::PostCreate).finish_if_active(id);
            match result {
                Ok(post) => {
                    tui.feed.prepend(post);
                    tui.composer.clear();
                }
                Err(err) if err.is_unauthorized() => tui.on_session_lost(),
                Err(err) if err.is_cancelled() => {}
                Err(err) => tui.composer.error = Some(err.message),
            }
            vec![]
        }
    }
}

/// Key handling for the feed screen.
pub fn handle_feed_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => return start_fetch(tui, FetchKind::Refresh),
        KeyCode::Char('d') if ctrl => {
            app.overlay = Some(Overlay::ConfirmSignOut);
        }
        KeyCode::Char('p') if ctrl => {
            if let Some(user) = tui.session.user() {
                let user_id = user.id;
                return profile::open(tui, user_id);
            }
        }
        KeyCode::Enter => return submit_composer(tui),
        KeyCode::Up => {
            tui.feed_view.scroll = tui.feed_view.scroll.saturating_sub(1);
        }
        KeyCode::Down => {
            scroll_down(tui, 1);
            return maybe_load_more(tui);
        }
        KeyCode::PageUp => {
            let page = tui.feed_view.list_rows.get().max(1);
            tui.feed_view.scroll = tui.feed_view.scroll.saturating_sub(page);
        }
        KeyCode::PageDown => {
            let page = tui.feed_view.list_rows.get().max(1);
            scroll_down(tui, page);
            return maybe_load_more(tui);
        }
        KeyCode::Home => tui.feed_view.scroll = 0,
        KeyCode::End => {
            scroll_down(tui, usize::MAX);
            return maybe_load_more(tui);
        }
        KeyCode::Esc => tui.composer.error = None,
        KeyCode::Backspace => tui.composer.backspace(),
        KeyCode::Left => tui.composer.move_left(),
        KeyCode::Right => tui.composer.move_right(),
        KeyCode::Char(c) if !ctrl => tui.composer.insert(c),
        _ => {}
    }
    vec![]
}

/// Publishes the composer content; empty input is a no-op, and so is a
/// publish while one is already outstanding.
fn submit_composer(tui: &mut TuiState) -> Vec<UiEffect> {
    let content = tui.composer.text.trim().to_string();
    if content.is_empty() || tui.tasks.state(TaskKind::PostCreate).is_running() {
        return vec![];
    }
    vec![UiEffect::SpawnCreatePost {
        task: tui.task_seq.next_id(),
        content,
    }]
}

fn scroll_down(tui: &mut TuiState, by: usize) {
    let rows = tui.feed_view.list_rows.get().max(1);
    let max = tui.feed.items().len().saturating_sub(rows);
    tui.feed_view.scroll = tui.feed_view.scroll.saturating_add(by).min(max);
}

fn clamp_scroll(tui: &mut TuiState) {
    let rows = tui.feed_view.list_rows.get().max(1);
    let max = tui.feed.items().len().saturating_sub(rows);
    tui.feed_view.scroll = tui.feed_view.scroll.min(max);
}

/// Scroll-to-end affordance: when the viewport shows the tail of the
/// list, ask for the next page. All the dedup/exhaustion guards live in
/// `FeedState::begin`, so rapid repeated calls are no-ops.
fn maybe_load_more(tui: &mut TuiState) -> Vec<UiEffect> {
    let rows = tui.feed_view.list_rows.get().max(1);
    if tui.feed_view.scroll + rows >= tui.feed.items().len() {
        return start_fetch(tui, FetchKind::More);
    }
    vec![]
}
