//! Auth feature reducer: form editing and session operation results.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::SessionUiEvent;
use crate::features::feed;
use crate::state::{AppState, Screen, SessionView};

use super::{AuthField, LoginForm, SignupForm};

/// Applies a session operation result to the app state.
pub fn handle_session_event(app: &mut AppState, event: SessionUiEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    match event {
        SessionUiEvent::HydrateFinished { id, user } => {
            tui.tasks.state_mut(TaskKind::Hydrate).finish_if_active(id);
            match user {
                Some(user) => {
                    tui.session = SessionView::Authenticated(user);
                    tui.screen = Screen::Feed;
                    feed::start_fetch(tui, rede_core::feed::FetchKind::Initial)
                }
                None => {
                    tui.session = SessionView::Anonymous;
                    tui.screen = Screen::Login;
                    vec![]
                }
            }
        }
        SessionUiEvent::SignInFinished { id, result } => {
            if !tui.tasks.state_mut(TaskKind::SignIn).finish_if_active(id) {
                return vec![];
            }
            match result {
                Ok(user) => {
                    tui.login = LoginForm::default();
                    tui.session = SessionView::Authenticated(user);
                    tui.screen = Screen::Feed;
                    feed::start_fetch(tui, rede_core::feed::FetchKind::Initial)
                }
                Err(err) => {
                    tui.login.error = Some(err.message);
                    vec![]
                }
            }
        }
        SessionUiEvent::SignUpFinished { id, result } => {
            if !tui.tasks.state_mut(TaskKind::SignUp).finish_if_active(id) {
                return vec![];
            }
            match result {
                Ok(user) => {
                    tui.signup = SignupForm::default();
                    tui.session = SessionView::Authenticated(user);
                    tui.screen = Screen::Feed;
                    feed::start_fetch(tui, rede_core::feed::FetchKind::Initial)
                }
                Err(err) => {
                    tui.signup.error = Some(err.message);
                    vec![]
                }
            }
        }
        SessionUiEvent::SignOutFinished { id } => {
            tui.tasks.state_mut(TaskKind::SignOut).finish_if_active(id);
            tui.on_session_lost();
            vec![]
        }
    }
}

/// Key handling for the login screen.
pub fn handle_login_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => return vec![UiEffect::Quit],
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            tui.signup = SignupForm::default();
            tui.screen = Screen::Signup;
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            tui.login.field = match tui.login.field {
                AuthField::Password => AuthField::Email,
                _ => AuthField::Password,
            };
        }
        KeyCode::Enter => {
            if tui.tasks.state(TaskKind::SignIn).is_running() || !tui.login.can_submit() {
                return vec![];
            }
            tui.login.error = None;
            let task = tui.task_seq.next_id();
            return vec![UiEffect::SpawnSignIn {
                task,
                email: tui.login.email.trim().to_string(),
                password: tui.login.password.clone(),
            }];
        }
        KeyCode::Backspace => {
            login_field_mut(&mut tui.login).pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            tui.login.error = None;
            login_field_mut(&mut tui.login).push(c);
        }
        _ => {}
    }
    vec![]
}

/// Key handling for the signup screen.
pub fn handle_signup_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    match key.code {
        KeyCode::Esc => {
            tui.screen = Screen::Login;
        }
        KeyCode::Tab | KeyCode::Down => {
            tui.signup.field = match tui.signup.field {
                AuthField::Name => AuthField::Email,
                AuthField::Email => AuthField::Password,
                AuthField::Password => AuthField::Name,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.signup.field = match tui.signup.field {
                AuthField::Name => AuthField::Password,
                AuthField::Email => AuthField::Name,
                AuthField::Password => AuthField::Email,
            };
        }
        KeyCode::Enter => {
            if tui.tasks.state(TaskKind::SignUp).is_running() || !tui.signup.can_submit() {
                return vec![];
            }
            tui.signup.error = None;
            let task = tui.task_seq.next_id();
            return vec![UiEffect::SpawnSignUp {
                task,
                name: tui.signup.name.trim().to_string(),
                email: tui.signup.email.trim().to_string(),
                password: tui.signup.password.clone(),
            }];
        }
        KeyCode::Backspace => {
            signup_field_mut(&mut tui.signup).pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            tui.signup.error = None;
            signup_field_mut(&mut tui.signup).push(c);
        }
        _ => {}
    }
    vec![]
}

fn login_field_mut(form: &mut LoginForm) -> &mut String {
    match form.field {
        AuthField::Password => &mut form.password,
        _ => &mut form.email,
    }
}

fn signup_field_mut(form: &mut SignupForm) -> &mut String {
    match form.field {
        AuthField::Name => &mut form.name,
        AuthField::Email => &mut form.email,
        AuthField::Password => &mut form.password,
    }
}
