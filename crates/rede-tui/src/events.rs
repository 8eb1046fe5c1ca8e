//! UI event types.
//!
//! All async results arrive through the runtime's inbox channel as
//! `UiEvent`s; the reducer is the only consumer.

use rede_core::api::ApiResult;
use rede_core::api::types::{Post, ProfileStats, User};
use rede_core::feed::{FetchGen, FetchKind};

use crate::common::{TaskId, TaskKind, TaskStarted};

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation, render cadence).
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// A spawned task registered itself (carries its cancel token).
    TaskStarted { kind: TaskKind, started: TaskStarted },
    Session(SessionUiEvent),
    Feed(FeedUiEvent),
    Profile(ProfileUiEvent),
}

/// Session manager operation results.
#[derive(Debug)]
pub enum SessionUiEvent {
    /// Startup hydration settled; `user` is the restored identity, if any.
    HydrateFinished { id: TaskId, user: Option<User> },
    SignInFinished {
        id: TaskId,
        result: ApiResult<User>,
    },
    SignUpFinished {
        id: TaskId,
        result: ApiResult<User>,
    },
    SignOutFinished { id: TaskId },
}

/// Feed screen results.
#[derive(Debug)]
pub enum FeedUiEvent {
    PageFinished {
        id: TaskId,
        kind: FetchKind,
        generation: FetchGen,
        result: ApiResult<Vec<Post>>,
    },
    CreateFinished {
        id: TaskId,
        result: ApiResult<Post>,
    },
}

/// Profile screen results.
#[derive(Debug)]
pub enum ProfileUiEvent {
    HeaderFinished {
        id: TaskId,
        result: ApiResult<ProfileStats>,
    },
    PostsFinished {
        id: TaskId,
        kind: FetchKind,
        generation: FetchGen,
        result: ApiResult<Vec<Post>>,
    },
}
