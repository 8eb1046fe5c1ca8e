//! TUI runtime — owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes
//! them by spawning the async handlers.
//!
//! ## Inbox pattern
//!
//! Handlers send `UiEvent`s to `inbox_tx`; the runtime drains the
//! receiver each frame. A spawned task first announces itself with
//! `TaskStarted` (carrying its cancellation token) and later sends its
//! completion event through the same channel, so the reducer always
//! sees start-before-finish.

mod handlers;

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use rede_core::api::ApiClient;
use rede_core::config::Config;
use rede_core::session::{SessionManager, TokenStore, UnauthorizedRegistry};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while async work is in flight (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Poll duration when idle; longer timeout reduces CPU usage.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(150);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop, panic, and normal exit.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    session: Arc<SessionManager>,
    api: Arc<ApiClient>,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates the runtime: terminal, HTTP client, session manager.
    pub fn new(config: Config) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let tokens = TokenStore::open_default();
        let registry = UnauthorizedRegistry::global();
        let api = Arc::new(ApiClient::new(&config, tokens.clone(), Arc::clone(&registry))?);
        let session = Arc::new(SessionManager::new(Arc::clone(&api), tokens, registry));

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(config),
            inbox_tx,
            inbox_rx,
            session,
            api,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        // Hydration starts before the first screen choice is made; the
        // reducer keeps input (except quit) gated until it settles.
        let task = self.state.tui.task_seq.next_id();
        self.execute_effect(UiEffect::SpawnHydrate { task });

        let result = self.event_loop();
        let _ = terminal::restore_terminal();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }

            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal
                    .draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events: inbox results, terminal input, tick.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tui.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block until the next tick is due unless there is already work;
        // terminal input wakes us early.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async task with a uniform started/completed lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted {
                id,
                cancel: cancel.clone(),
            },
        });
        tokio::spawn(async move {
            let _ = tx.send(f(cancel).await);
        });
    }

    /// Executes a single effect by dispatching to the matching handler.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::CancelTask { token } => {
                if let Some(token) = token {
                    token.cancel();
                }
            }

            UiEffect::SpawnHydrate { task } => {
                let session = Arc::clone(&self.session);
                self.spawn_task(TaskKind::Hydrate, task, false, move |_| {
                    handlers::hydrate(session, task)
                });
            }
            UiEffect::SpawnSignIn {
                task,
                email,
                password,
            } => {
                let session = Arc::clone(&self.session);
                self.spawn_task(TaskKind::SignIn, task, false, move |_| {
                    handlers::sign_in(session, task, email, password)
                });
            }
            UiEffect::SpawnSignUp {
                task,
                name,
                email,
                password,
            } => {
                let session = Arc::clone(&self.session);
                self.spawn_task(TaskKind::SignUp, task, false, move |_| {
                    handlers::sign_up(session, task, name, email, password)
                });
            }
            UiEffect::SpawnSignOut { task } => {
                let session = Arc::clone(&self.session);
                self.spawn_task(TaskKind::SignOut, task, false, move |_| {
                    handlers::sign_out(session, task)
                });
            }

            UiEffect::SpawnFeedPage {
                task,
                kind,
                generation,
                offset,
                limit,
            } => {
                let api = Arc::clone(&self.api);
                let task_kind = crate::features::feed::feed_task_kind(kind);
                self.spawn_task(task_kind, task, true, move |cancel| {
                    handlers::feed_page(api, task, kind, generation, offset, limit, cancel)
                });
            }
            UiEffect::SpawnCreatePost { task, content } => {
                let api = Arc::clone(&self.api);
                self.spawn_task(TaskKind::PostCreate, task, false, move |_| {
                    handlers::create_post(api, task, content)
                });
            }

            UiEffect::SpawnProfileHeader { task, user_id } => {
                let api = Arc::clone(&self.api);
                self.spawn_task(TaskKind::ProfileHeader, task, true, move |cancel| {
                    handlers::profile_header(api, task, user_id, cancel)
                });
            }
            UiEffect::SpawnProfilePosts {
                task,
                user_id,
                kind,
                generation,
                offset,
                limit,
            } => {
                let api = Arc::clone(&self.api);
                self.spawn_task(TaskKind::ProfilePosts, task, true, move |cancel| {
                    handlers::profile_posts(
                        api, task, user_id, kind, generation, offset, limit, cancel,
                    )
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
