//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{auth, feed, profile};
use crate::overlays;
use crate::state::{AppState, Screen, SessionView};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Session(session_event) => auth::handle_session_event(app, session_event),
        UiEvent::Feed(feed_event) => feed::handle_feed_event(&mut app.tui, feed_event),
        UiEvent::Profile(profile_event) => profile::handle_profile_event(&mut app.tui, profile_event),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    let Event::Key(key) = event else {
        return vec![];
    };
    if key.kind != KeyEventKind::Press {
        return vec![];
    }

    if is_quit_key(key) {
        return vec![UiEffect::Quit];
    }

    if app.overlay.is_some() {
        return overlays::handle_key(app, key);
    }

    // Nothing but quit is accepted until hydration settles; the screen
    // choice (login vs feed) depends on its outcome.
    if app.tui.session == SessionView::Hydrating {
        return vec![];
    }

    match app.tui.screen {
        Screen::Login => auth::handle_login_key(app, key),
        Screen::Signup => auth::handle_signup_key(app, key),
        Screen::Feed => feed::handle_feed_key(app, key),
        Screen::Profile => profile::handle_profile_key(app, key),
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

#[cfg(test)]
mod tests {
    use rede_core::api::ApiError;
    use rede_core::api::types::{Post, User};
    use rede_core::config::Config;
    use rede_core::feed::FetchKind;

    use super::*;
    use crate::common::{TaskKind, TaskStarted};
    use crate::events::{FeedUiEvent, SessionUiEvent};

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn ana() -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    fn post(id: i64) -> Post {
        Post {
            id,
            content: format!("post {id}"),
            author_id: 1,
            created_at: None,
            author: None,
        }
    }

    /// Extracts the (task, generation) pair from a spawned feed fetch.
    fn feed_fetch_params(
        effects: &[UiEffect],
    ) -> Option<(crate::common::TaskId, rede_core::feed::FetchGen)> {
        effects.iter().find_map(|e| match e {
            UiEffect::SpawnFeedPage {
                task, generation, ..
            } => Some((*task, *generation)),
            _ => None,
        })
    }

    /// Hydrates into an authenticated session and settles the initial
    /// feed load with `initial` posts.
    fn authenticated_app_with(initial: Vec<Post>) -> AppState {
        let mut app = AppState::new(Config::default());
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::HydrateFinished {
                id: crate::common::TaskId(0),
                user: Some(ana()),
            }),
        );
        // Hydration into an authenticated session starts the initial load.
        let (task, generation) = feed_fetch_params(&effects).expect("initial feed fetch");
        update(
            &mut app,
            UiEvent::Feed(FeedUiEvent::PageFinished {
                id: task,
                kind: FetchKind::Initial,
                generation,
                result: Ok(initial),
            }),
        );
        app
    }

    fn authenticated_app() -> AppState {
        authenticated_app_with(vec![post(1), post(2)])
    }

    /// Test: hydration without a user lands on the login screen.
    #[test]
    fn test_hydrate_anonymous_lands_on_login() {
        let mut app = AppState::new(Config::default());
        assert_eq!(app.tui.session, SessionView::Hydrating);

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::HydrateFinished {
                id: crate::common::TaskId(0),
                user: None,
            }),
        );
        assert!(effects.is_empty());
        assert_eq!(app.tui.screen, Screen::Login);
        assert_eq!(app.tui.session, SessionView::Anonymous);
    }

    /// Test: login submit is gated on non-empty fields and produces a
    /// sign-in effect exactly once while the task runs.
    #[test]
    fn test_login_submit_guarded() {
        let mut app = AppState::new(Config::default());
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::HydrateFinished {
                id: crate::common::TaskId(0),
                user: None,
            }),
        );

        // Empty form: no effect.
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());

        for c in "a@b.com".chars() {
            update(&mut app, key(KeyCode::Char(c)));
        }
        update(&mut app, key(KeyCode::Tab));
        update(&mut app, key(KeyCode::Char('x')));

        let effects = update(&mut app, key(KeyCode::Enter));
        let UiEffect::SpawnSignIn { task, email, .. } = &effects[0] else {
            panic!("expected SpawnSignIn, got {effects:?}");
        };
        assert_eq!(email, "a@b.com");

        // While the task is registered as running, Enter is a no-op.
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::SignIn,
                started: TaskStarted {
                    id: *task,
                    cancel: None,
                },
            },
        );
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
    }

    /// Test: a failed sign-in surfaces the classified message.
    #[test]
    fn test_sign_in_failure_shows_message() {
        let mut app = AppState::new(Config::default());
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::HydrateFinished {
                id: crate::common::TaskId(0),
                user: None,
            }),
        );
        let id = crate::common::TaskId(42);
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::SignIn,
                started: TaskStarted { id, cancel: None },
            },
        );

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SignInFinished {
                id,
                result: Err(ApiError::unauthorized(
                    r#"{"detail": "Credenciais invalidas"}"#,
                )),
            }),
        );
        assert_eq!(app.tui.login.error.as_deref(), Some("Credenciais invalidas"));
        assert_eq!(app.tui.screen, Screen::Login);
    }

    /// Test: the initial page lands in state; a 401 on a later fetch
    /// silently tears the session down instead.
    #[test]
    fn test_feed_page_results() {
        let mut app = authenticated_app();
        assert_eq!(app.tui.screen, Screen::Feed);
        assert_eq!(app.tui.feed.items().len(), 2);
        assert_eq!(app.tui.feed.offset(), 2);

        // A 401 on a refresh clears the session and navigates away.
        let effects = update(&mut app, ctrl('r'));
        let (task, generation) = feed_fetch_params(&effects).unwrap();
        update(
            &mut app,
            UiEvent::Feed(FeedUiEvent::PageFinished {
                id: task,
                kind: FetchKind::Refresh,
                generation,
                result: Err(ApiError::unauthorized("")),
            }),
        );
        assert_eq!(app.tui.screen, Screen::Login);
        assert_eq!(app.tui.session, SessionView::Anonymous);
        assert!(app.tui.feed.items().is_empty());
    }

    /// Test: composer publish round-trip prepends and clears.
    #[test]
    fn test_composer_publish() {
        let mut app = authenticated_app();
        for c in "hello".chars() {
            update(&mut app, key(KeyCode::Char(c)));
        }

        let effects = update(&mut app, key(KeyCode::Enter));
        let UiEffect::SpawnCreatePost { task, content } = &effects[0] else {
            panic!("expected SpawnCreatePost, got {effects:?}");
        };
        assert_eq!(content, "hello");

        update(
            &mut app,
            UiEvent::Feed(FeedUiEvent::CreateFinished {
                id: *task,
                result: Ok(Post {
                    id: 99,
                    content: "hello".to_string(),
                    author_id: 1,
                    created_at: None,
                    author: None,
                }),
            }),
        );
        assert_eq!(app.tui.feed.items()[0].id, 99);
        assert!(app.tui.composer.text.is_empty());
    }

    /// Test: whitespace-only composer content never spawns a publish.
    #[test]
    fn test_empty_composer_is_noop() {
        let mut app = authenticated_app();
        update(&mut app, key(KeyCode::Char(' ')));
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
    }

    /// Test: the sign-out overlay confirms before spawning.
    #[test]
    fn test_sign_out_confirmation() {
        let mut app = authenticated_app();

        update(&mut app, ctrl('d'));
        assert!(app.overlay.is_some());

        // Cancel leaves the session alone.
        assert!(update(&mut app, key(KeyCode::Esc)).is_empty());
        assert!(app.overlay.is_none());

        update(&mut app, ctrl('d'));
        let effects = update(&mut app, key(KeyCode::Enter));
        assert!(matches!(effects[0], UiEffect::SpawnSignOut { .. }));
    }

    /// Test: Ctrl+Q quits from anywhere.
    #[test]
    fn test_quit_key() {
        let mut app = authenticated_app();
        let effects = update(&mut app, ctrl('q'));
        assert!(matches!(effects[0], UiEffect::Quit));
    }
}
