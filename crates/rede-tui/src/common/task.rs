//! Async task lifecycle bookkeeping.
//!
//! One [`TaskState`] per task kind enforces the "at most one request of
//! each kind in flight" rule; overlapping triggers are dropped by the
//! reducer before anything is spawned. Completions carry their
//! [`TaskId`] and are gated through [`TaskState::finish_if_active`], so
//! a completion from a superseded task cannot clobber newer state.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Hydrate,
    SignIn,
    SignUp,
    SignOut,
    FeedInitial,
    FeedRefresh,
    FeedMore,
    PostCreate,
    ProfileHeader,
    ProfilePosts,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

/// Task lifecycle state (stored in the app state, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    /// Clears the slot if `id` is the active task. Returns whether it was.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub hydrate: TaskState,
    pub sign_in: TaskState,
    pub sign_up: TaskState,
    pub sign_out: TaskState,
    pub feed_initial: TaskState,
    pub feed_refresh: TaskState,
    pub feed_more: TaskState,
    pub post_create: TaskState,
    pub profile_header: TaskState,
    pub profile_posts: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Hydrate => &self.hydrate,
            TaskKind::SignIn => &self.sign_in,
            TaskKind::SignUp => &self.sign_up,
            TaskKind::SignOut => &self.sign_out,
            TaskKind::FeedInitial => &self.feed_initial,
            TaskKind::FeedRefresh => &self.feed_refresh,
            TaskKind::FeedMore => &self.feed_more,
            TaskKind::PostCreate => &self.post_create,
            TaskKind::ProfileHeader => &self.profile_header,
            TaskKind::ProfilePosts => &self.profile_posts,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Hydrate => &mut self.hydrate,
            TaskKind::SignIn => &mut self.sign_in,
            TaskKind::SignUp => &mut self.sign_up,
            TaskKind::SignOut => &mut self.sign_out,
            TaskKind::FeedInitial => &mut self.feed_initial,
            TaskKind::FeedRefresh => &mut self.feed_refresh,
            TaskKind::FeedMore => &mut self.feed_more,
            TaskKind::PostCreate => &mut self.post_create,
            TaskKind::ProfileHeader => &mut self.profile_header,
            TaskKind::ProfilePosts => &mut self.profile_posts,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.hydrate.is_running()
            || self.sign_in.is_running()
            || self.sign_up.is_running()
            || self.sign_out.is_running()
            || self.feed_initial.is_running()
            || self.feed_refresh.is_running()
            || self.feed_more.is_running()
            || self.post_create.is_running()
            || self.profile_header.is_running()
            || self.profile_posts.is_running()
    }

    /// Cancels and clears every data-fetch task. Used when the session
    /// is lost so nothing from the old identity lands in fresh state.
    pub fn cancel_fetches(&mut self) {
        for state in [
            &mut self.feed_initial,
            &mut self.feed_refresh,
            &mut self.feed_more,
            &mut self.post_create,
            &mut self.profile_header,
            &mut self.profile_posts,
        ] {
            if let Some(cancel) = state.cancel.take() {
                cancel.cancel();
            }
            state.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: finish_if_active only clears the matching task.
    #[test]
    fn test_finish_if_active() {
        let mut state = TaskState::default();
        let started = TaskStarted {
            id: TaskId(1),
            cancel: None,
        };
        state.on_started(&started);

        assert!(!state.finish_if_active(TaskId(2)));
        assert!(state.is_running());
        assert!(state.finish_if_active(TaskId(1)));
        assert!(!state.is_running());
    }

    /// Test: cancel_fetches fires tokens and clears the fetch slots.
    #[test]
    fn test_cancel_fetches() {
        let mut tasks = Tasks::default();
        let token = CancellationToken::new();
        tasks.feed_more.on_started(&TaskStarted {
            id: TaskId(7),
            cancel: Some(token.clone()),
        });
        tasks.sign_out.on_started(&TaskStarted {
            id: TaskId(8),
            cancel: None,
        });

        tasks.cancel_fetches();
        assert!(token.is_cancelled());
        assert!(!tasks.feed_more.is_running());
        // Session tasks are not fetches and stay untouched.
        assert!(tasks.sign_out.is_running());
    }
}
