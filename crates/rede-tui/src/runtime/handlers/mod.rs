//! Effect handlers: pure async functions that call `rede-core` and
//! return the `UiEvent` to feed back into the reducer.
//!
//! The runtime spawns these; cancellation (when a request is superseded)
//! races the HTTP future against the task's token, and an aborted fetch
//! reports itself as a cancelled `ApiError` so the reducer can discard
//! it silently.

use std::sync::Arc;

use rede_core::api::{ApiClient, ApiError, ApiResult, classify, posts, users};
use rede_core::feed::{FetchGen, FetchKind};
use rede_core::session::SessionManager;
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;
use crate::events::{FeedUiEvent, ProfileUiEvent, SessionUiEvent, UiEvent};

async fn with_cancel<T>(
    cancel: Option<CancellationToken>,
    fut: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    match cancel {
        Some(token) => {
            tokio::select! {
                () = token.cancelled() => Err(ApiError::cancelled()),
                result = fut => result,
            }
        }
        None => fut.await,
    }
}

pub async fn hydrate(session: Arc<SessionManager>, id: TaskId) -> UiEvent {
    session.hydrate().await;
    UiEvent::Session(SessionUiEvent::HydrateFinished {
        id,
        user: session.current_user(),
    })
}

pub async fn sign_in(
    session: Arc<SessionManager>,
    id: TaskId,
    email: String,
    password: String,
) -> UiEvent {
    let result = session
        .sign_in(&email, &password)
        .await
        .map_err(|err| classify(&err));
    UiEvent::Session(SessionUiEvent::SignInFinished { id, result })
}

pub async fn sign_up(
    session: Arc<SessionManager>,
    id: TaskId,
    name: String,
    email: String,
    password: String,
) -> UiEvent {
    let result = session
        .sign_up(&name, &email, &password)
        .await
        .map_err(|err| classify(&err));
    UiEvent::Session(SessionUiEvent::SignUpFinished { id, result })
}

pub async fn sign_out(session: Arc<SessionManager>, id: TaskId) -> UiEvent {
    session.sign_out().await;
    UiEvent::Session(SessionUiEvent::SignOutFinished { id })
}

#[allow(clippy::too_many_arguments)]
pub async fn feed_page(
    api: Arc<ApiClient>,
    id: TaskId,
    kind: FetchKind,
    generation: FetchGen,
    offset: usize,
    limit: usize,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = with_cancel(cancel, posts::feed(&api, limit, offset)).await;
    UiEvent::Feed(FeedUiEvent::PageFinished {
        id,
        kind,
        generation,
        result,
    })
}

pub async fn create_post(api: Arc<ApiClient>, id: TaskId, content: String) -> UiEvent {
    let result = posts::create(&api, &content).await;
    UiEvent::Feed(FeedUiEvent::CreateFinished { id, result })
}

pub async fn profile_header(
    api: Arc<ApiClient>,
    id: TaskId,
    user_id: i64,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = with_cancel(cancel, users::stats(&api, user_id)).await;
    UiEvent::Profile(ProfileUiEvent::HeaderFinished { id, result })
}

#[allow(clippy::too_many_arguments)]
pub async fn profile_posts(
    api: Arc<ApiClient>,
    id: TaskId,
    user_id: i64,
    kind: FetchKind,
    generation: FetchGen,
    offset: usize,
    limit: usize,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = with_cancel(cancel, users::posts(&api, user_id, limit, offset)).await;
    UiEvent::Profile(ProfileUiEvent::PostsFinished {
        id,
        kind,
        generation,
        result,
    })
}
