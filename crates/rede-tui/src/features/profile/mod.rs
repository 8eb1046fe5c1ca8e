//! Profile screen: user card, follower stats, the user's own posts.

mod render;
mod update;

pub use render::render_profile;
pub use update::{handle_profile_event, handle_profile_key, open};

use rede_core::api::types::ProfileStats;
use rede_core::feed::FeedState;

/// Profile screen state; created when the screen opens, dropped on close.
#[derive(Debug)]
pub struct ProfileState {
    pub user_id: i64,
    /// User record + follower stats; `None` until the header fetch lands.
    pub header: Option<ProfileStats>,
    /// The user's own posts, paginated like the feed.
    pub posts: FeedState,
    pub scroll: usize,
    pub list_rows: std::cell::Cell<usize>,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn new(user_id: i64, page_size: usize) -> Self {
        Self {
            user_id,
            header: None,
            posts: FeedState::new(page_size),
            scroll: 0,
            list_rows: std::cell::Cell::new(1),
            error: None,
        }
    }
}
