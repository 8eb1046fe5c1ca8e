//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime
//! executes. They represent I/O and task spawning only; the reducer
//! itself never touches the network or spawns anything.

use rede_core::feed::{FetchGen, FetchKind};
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Run startup hydration (exactly once, before any screen choice).
    SpawnHydrate { task: TaskId },

    /// Submit the login form.
    SpawnSignIn {
        task: TaskId,
        email: String,
        password: String,
    },

    /// Submit the signup form.
    SpawnSignUp {
        task: TaskId,
        name: String,
        email: String,
        password: String,
    },

    /// Clear the session (already confirmed by the overlay).
    SpawnSignOut { task: TaskId },

    /// Fetch one feed page at the given cursor.
    SpawnFeedPage {
        task: TaskId,
        kind: FetchKind,
        generation: FetchGen,
        offset: usize,
        limit: usize,
    },

    /// Publish the composer content.
    SpawnCreatePost { task: TaskId, content: String },

    /// Fetch the profile header (user + follower stats).
    SpawnProfileHeader { task: TaskId, user_id: i64 },

    /// Fetch one page of a profile's posts.
    SpawnProfilePosts {
        task: TaskId,
        user_id: i64,
        kind: FetchKind,
        generation: FetchGen,
        offset: usize,
        limit: usize,
    },

    /// Cancel a superseded in-flight request.
    CancelTask { token: Option<CancellationToken> },
}
