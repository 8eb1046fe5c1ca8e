//! Paginated post-list state machine.
//!
//! Drives the feed screen and the profile post list: one instance per
//! list. The state is pure (no I/O); callers ask [`FeedState::begin`]
//! for permission to fetch, perform the HTTP call themselves, and report
//! back with [`FeedState::apply_page`] or [`FeedState::fail`].
//!
//! Every dispatched fetch carries a generation number. A response whose
//! generation is no longer current is discarded, so a superseded request
//! cannot race a newer one into the list — even when the transport could
//! not actually abort it.

use crate::api::error::ApiError;
use crate::api::types::Post;

/// The three fetch affordances of a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First load after mount; replaces the list.
    Initial,
    /// Pull-to-refresh; same semantics as `Initial`.
    Refresh,
    /// Infinite-scroll append at the current cursor.
    More,
}

/// Generation marker attached to each dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchGen(u64);

/// Fetch lifecycle per list: at most one request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    InFlight { kind: FetchKind, generation: FetchGen },
}

/// A fetch the caller is now allowed to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: FetchGen,
    pub offset: usize,
    pub limit: usize,
}

/// Cursor state for a reverse-chronological post list.
#[derive(Debug)]
pub struct FeedState {
    items: Vec<Post>,
    page_size: usize,
    phase: Phase,
    has_more: bool,
    loaded_once: bool,
    next_gen: u64,
    error: Option<String>,
}

impl FeedState {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            phase: Phase::Idle,
            has_more: true,
            loaded_once: false,
            next_gen: 0,
            error: None,
        }
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    /// The cursor: always equal to the number of items held.
    pub fn offset(&self) -> usize {
        self.items.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// True once an initial load (or refresh) has settled.
    pub fn loaded_once(&self) -> bool {
        self.loaded_once
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, Phase::InFlight { .. })
    }

    pub fn in_flight_kind(&self) -> Option<FetchKind> {
        match self.phase {
            Phase::InFlight { kind, .. } => Some(kind),
            Phase::Idle => None,
        }
    }

    /// Asks to start a fetch of `kind`.
    ///
    /// Returns `None` when the fetch must not be dispatched:
    /// - `More` requires an idle list with more pages, a completed
    ///   initial load, and at least one anchor item.
    /// - `Initial`/`Refresh` are dropped while another initial/refresh is
    ///   outstanding; an outstanding `More` is superseded instead (its
    ///   generation is invalidated and the caller should cancel it).
    ///
    /// On success the returned request carries the new current
    /// generation and the offset/limit to fetch.
    pub fn begin(&mut self, kind: FetchKind) -> Option<PageRequest> {
        match kind {
            FetchKind::More => {
                if self.is_fetching()
                    || !self.has_more
                    || !self.loaded_once
                    || self.items.is_empty()
                {
                    return None;
                }
                let generation = self.bump_gen(FetchKind::More);
                Some(PageRequest {
                    generation,
                    offset: self.items.len(),
                    limit: self.page_size,
                })
            }
            FetchKind::Initial | FetchKind::Refresh => {
                if matches!(
                    self.phase,
                    Phase::InFlight {
                        kind: FetchKind::Initial | FetchKind::Refresh,
                        ..
                    }
                ) {
                    return None;
                }
                // An in-flight append is superseded: bumping the
                // generation makes its eventual response stale.
                let generation = self.bump_gen(kind);
                self.has_more = true;
                Some(PageRequest {
                    generation,
                    offset: 0,
                    limit: self.page_size,
                })
            }
        }
    }

    fn bump_gen(&mut self, kind: FetchKind) -> FetchGen {
        let generation = FetchGen(self.next_gen);
        self.next_gen = self.next_gen.wrapping_add(1);
        self.phase = Phase::InFlight { kind, generation };
        generation
    }

    /// Applies a successful page. Returns false if the response was stale.
    pub fn apply_page(&mut self, generation: FetchGen, posts: Vec<Post>) -> bool {
        let Phase::InFlight { kind, generation: current } = self.phase else {
            return false;
        };
        if current != generation {
            return false;
        }

        if posts.len() < self.page_size {
            self.has_more = false;
        }
        match kind {
            FetchKind::Initial | FetchKind::Refresh => {
                self.items = posts;
                self.loaded_once = true;
            }
            FetchKind::More => self.items.extend(posts),
        }
        self.phase = Phase::Idle;
        self.error = None;
        true
    }

    /// Records a failed fetch. Stale generations are ignored.
    ///
    /// Cancelled and unauthorized failures are suppressed (supersession
    /// is routine; sign-out navigation owns the 401 UX). Anything else
    /// becomes a visible message and stops further pagination.
    pub fn fail(&mut self, generation: FetchGen, err: &ApiError) {
        let Phase::InFlight { kind, generation: current } = self.phase else {
            return;
        };
        if current != generation {
            return;
        }
        self.phase = Phase::Idle;

        if matches!(kind, FetchKind::Initial | FetchKind::Refresh) {
            self.loaded_once = true;
        }
        if err.is_cancelled() || err.is_unauthorized() {
            return;
        }

        tracing::debug!(kind = ?kind, "page fetch failed: {err}");
        self.has_more = false;
        self.error = Some(err.message.clone());
    }

    /// Prepends a freshly created post (after server acknowledgment).
    ///
    /// The cursor stays `items.len()`, so pagination naturally accounts
    /// for the new head; `has_more` is untouched.
    pub fn prepend(&mut self, post: Post) {
        self.items.insert(0, post);
    }

    /// Drops all list state, e.g. when the session is lost.
    pub fn reset(&mut self) {
        let page_size = self.page_size;
        let next_gen = self.next_gen;
        *self = FeedState::new(page_size);
        // Keep the generation monotonic so responses from before the
        // reset can never be applied to the fresh list.
        self.next_gen = next_gen;
    }
}
