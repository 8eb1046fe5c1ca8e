//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── screen: Screen           (which main screen is shown)
//! │   ├── session: SessionView     (hydrating / anonymous / authenticated)
//! │   ├── login / signup           (auth form state)
//! │   ├── feed + feed_view         (core cursor state + scroll/composer)
//! │   ├── profile                  (profile screen state, when open)
//! │   └── tasks / task_seq         (async task lifecycle)
//! └── overlay: Option<Overlay>     (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can borrow both mutably at once.

use rede_core::api::types::User;
use rede_core::config::Config;
use rede_core::feed::FeedState;

use crate::common::{TaskSeq, Tasks};
use crate::features::auth::{LoginForm, SignupForm};
use crate::features::feed::{Composer, FeedView};
use crate::features::profile::ProfileState;
use crate::overlays::Overlay;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlay: None,
        }
    }
}

/// Which main screen is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Feed,
    Profile,
}

/// The reducer's view of the session state.
///
/// Mirrors `rede_core::session::SessionState`, minus `Uninitialized`:
/// hydration is kicked off before the first frame, so the UI only ever
/// sees these three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Hydrating,
    Anonymous,
    Authenticated(User),
}

impl SessionView {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionView::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub screen: Screen,
    pub session: SessionView,
    pub login: LoginForm,
    pub signup: SignupForm,
    /// Feed cursor state (items, offset, has-more, generations).
    pub feed: FeedState,
    /// Feed screen presentation state (scroll, composer).
    pub feed_view: FeedView,
    pub composer: Composer,
    /// Profile screen state; `None` while the screen is closed.
    pub profile: Option<ProfileState>,
    pub tasks: Tasks,
    pub task_seq: TaskSeq,
    pub config: Config,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        let page_size = config.page_size as usize;
        Self {
            should_quit: false,
            screen: Screen::Login,
            session: SessionView::Hydrating,
            login: LoginForm::default(),
            signup: SignupForm::default(),
            feed: FeedState::new(page_size),
            feed_view: FeedView::default(),
            composer: Composer::default(),
            profile: None,
            tasks: Tasks::default(),
            task_seq: TaskSeq::default(),
            config,
            spinner_frame: 0,
        }
    }

    /// Tears down everything tied to the authenticated identity.
    ///
    /// Used on sign-out and on any detected 401: in-flight fetches are
    /// cancelled, list state is dropped, and navigation lands on Login.
    pub fn on_session_lost(&mut self) {
        self.tasks.cancel_fetches();
        self.feed.reset();
        self.feed_view = FeedView::default();
        self.composer = Composer::default();
        self.profile = None;
        self.session = SessionView::Anonymous;
        self.screen = Screen::Login;
    }
}
