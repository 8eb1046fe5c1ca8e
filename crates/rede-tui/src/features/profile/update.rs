//! Profile feature reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rede_core::feed::FetchKind;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::ProfileUiEvent;
use crate::state::{AppState, Screen, TuiState};

use super::ProfileState;

/// Opens the profile screen for `user_id` and kicks off both fetches.
pub fn open(tui: &mut TuiState, user_id: i64) -> Vec<UiEffect> {
    let page_size = tui.config.page_size as usize;
    let mut profile = ProfileState::new(user_id, page_size);

    let mut effects = vec![UiEffect::SpawnProfileHeader {
        task: tui.task_seq.next_id(),
        user_id,
    }];
    if let Some(request) = profile.posts.begin(FetchKind::Initial) {
        effects.push(UiEffect::SpawnProfilePosts {
            task: tui.task_seq.next_id(),
            user_id,
            kind: FetchKind::Initial,
            generation: request.generation,
            offset: request.offset,
            limit: request.limit,
        });
    }

    tui.profile = Some(profile);
    tui.screen = Screen::Profile;
    effects
}

/// Closes the profile screen and cancels anything it still has in flight.
fn close(tui: &mut TuiState) {
    for state in [&mut tui.tasks.profile_header, &mut tui.tasks.profile_posts] {
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        state.clear();
    }
    tui.profile = None;
    tui.screen = Screen::Feed;
}

/// Applies a profile operation result.
pub fn handle_profile_event(tui: &mut TuiState, event: ProfileUiEvent) -> Vec<UiEffect> {
    match event {
        ProfileUiEvent::HeaderFinished { id, result } => {
            tui.tasks
                .state_mut(TaskKind::ProfileHeader)
                .finish_if_active(id);
            let Some(profile) = tui.profile.as_mut() else {
                return vec![];
            };
            match result {
                Ok(stats) => profile.header = Some(stats),
                Err(err) if err.is_unauthorized() => tui.on_session_lost(),
                Err(err) if err.is_cancelled() => {}
                Err(err) => profile.error = Some(err.message),
            }
            vec![]
        }
        ProfileUiEvent::PostsFinished {
            id,
            kind: _,
            generation,
            result,
        } => {
            tui.tasks
                .state_mut(TaskKind::ProfilePosts)
                .finish_if_active(id);
            let Some(profile) = tui.profile.as_mut() else {
                return vec![];
            };
            match result {
                Ok(posts) => {
                    profile.posts.apply_page(generation, posts);
                    let rows = profile.list_rows.get().max(1);
                    let max = profile.posts.items().len().saturating_sub(rows);
                    profile.scroll = profile.scroll.min(max);
                }
                Err(err) if err.is_unauthorized() => {
                    profile.posts.fail(generation, &err);
                    tui.on_session_lost();
                }
                Err(err) => profile.posts.fail(generation, &err),
            }
            vec![]
        }
    }
}

/// Key handling for the profile screen.
pub fn handle_profile_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => close(tui),
        KeyCode::Char('r') if ctrl => return refresh(tui),
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(profile) = tui.profile.as_mut() {
                profile.scroll = profile.scroll.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(tui, 1);
            return maybe_load_more(tui);
        }
        KeyCode::PageUp => {
            if let Some(profile) = tui.profile.as_mut() {
                let page = profile.list_rows.get().max(1);
                profile.scroll = profile.scroll.saturating_sub(page);
            }
        }
        KeyCode::PageDown => {
            let page = tui
                .profile
                .as_ref()
                .map_or(1, |p| p.list_rows.get().max(1));
            scroll_down(tui, page);
            return maybe_load_more(tui);
        }
        _ => {}
    }
    vec![]
}

fn refresh(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(profile) = tui.profile.as_mut() else {
        return vec![];
    };
    let user_id = profile.user_id;
    profile.error = None;

    let mut effects = Vec::new();
    if !tui.tasks.state(TaskKind::ProfileHeader).is_running() {
        effects.push(UiEffect::SpawnProfileHeader {
            task: tui.task_seq.next_id(),
            user_id,
        });
    }

    let stale_token = tui.tasks.profile_posts.cancel.clone();
    if let Some(request) = profile.posts.begin(FetchKind::Refresh) {
        effects.push(UiEffect::CancelTask { token: stale_token });
        effects.push(UiEffect::SpawnProfilePosts {
            task: tui.task_seq.next_id(),
            user_id,
            kind: FetchKind::Refresh,
            generation: request.generation,
            offset: request.offset,
            limit: request.limit,
        });
    }
    effects
}

fn scroll_down(tui: &mut TuiState, by: usize) {
    if let Some(profile) = tui.profile.as_mut() {
        let rows = profile.list_rows.get().max(1);
        let max = profile.posts.items().len().saturating_sub(rows);
        profile.scroll = profile.scroll.saturating_add(by).min(max);
    }
}

fn maybe_load_more(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(profile) = tui.profile.as_mut() else {
        return vec![];
    };
    let rows = profile.list_rows.get().max(1);
    if profile.scroll + rows < profile.posts.items().len() {
        return vec![];
    }
    let user_id = profile.user_id;
    let Some(request) = profile.posts.begin(FetchKind::More) else {
        return vec![];
    };
    vec![UiEffect::SpawnProfilePosts {
        task: tui.task_seq.next_id(),
        user_id,
        kind: FetchKind::More,
        generation: request.generation,
        offset: request.offset,
        limit: request.limit,
    }]
}
