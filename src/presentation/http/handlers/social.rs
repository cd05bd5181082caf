//! Friend Request and Playlist Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::request::{FriendRequestBody, PlaylistBindingRequest};
use crate::application::dto::response::{FriendResponse, ReceivedFriendRequestResponse, RelationResponse};
use crate::application::services::SocialError;
use crate::infrastructure::metrics;
use crate::presentation::http::extractors::{Caller, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::snowflake;
use crate::startup::AppState;

fn map_social_error(e: SocialError) -> AppError {
    match e {
        SocialError::SelfRequest => AppError::BadRequest(e.to_string()),
        SocialError::AlreadyRequested
        | SocialError::ReverseRequestPending
        | SocialError::AlreadyFriends
        | SocialError::HostConflict => AppError::Conflict(e.to_string()),
        SocialError::RequestNotFound
        | SocialError::RelationNotFound
        | SocialError::PlaylistNotFound => AppError::NotFound(e.to_string()),
        SocialError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Send a friend request
pub async fn send_friend_request(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(body): ValidatedJson<FriendRequestBody>,
) -> Result<StatusCode, AppError> {
    state
        .social
        .send_friend_request(&caller.user_id, body.target_user_id.trim())
        .await
        .map_err(map_social_error)?;

    metrics::record_friend_request_event("sent");
    Ok(StatusCode::OK)
}

/// Pending requests the caller has received
pub async fn received_friend_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<ReceivedFriendRequestResponse>>, AppError> {
    let requests = state
        .social
        .received_requests(&caller.user_id)
        .await
        .map_err(map_social_error)?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Accept the request `user_id` sent to the caller
pub async fn accept_friend_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .social
        .accept_friend_request(&caller.user_id, &user_id)
        .await
        .map_err(map_social_error)?;

    metrics::record_friend_request_event("accepted");
    Ok(StatusCode::OK)
}

/// Decline the request `user_id` sent to the caller
pub async fn decline_friend_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .social
        .decline_friend_request(&caller.user_id, &user_id)
        .await
        .map_err(map_social_error)?;

    metrics::record_friend_request_event("declined");
    Ok(StatusCode::OK)
}

/// Users the caller has sent a still-pending request to
pub async fn sent_friend_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<String>>, AppError> {
    let targets = state
        .social
        .sent_request_targets(&caller.user_id)
        .await
        .map_err(map_social_error)?;

    Ok(Json(targets))
}

/// The caller's friends
pub async fn list_friends(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<FriendResponse>>, AppError> {
    let friends = state
        .social
        .friends(&caller.user_id)
        .await
        .map_err(map_social_error)?;

    Ok(Json(friends.into_iter().map(Into::into).collect()))
}

/// Bind a common playlist to its host. Called service-to-service, so no caller.
pub async fn register_common_playlist(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PlaylistBindingRequest>,
) -> Result<StatusCode, AppError> {
    state
        .social
        .register_playlist(body.playlist_id.trim(), body.host_id.trim())
        .await
        .map_err(map_social_error)?;

    Ok(StatusCode::OK)
}

/// Host of a common playlist, as plain text
pub async fn get_playlist_host(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<String, AppError> {
    state
        .social
        .playlist_host(playlist_id.trim())
        .await
        .map_err(map_social_error)
}

/// Both users of a relation. An unknown relation is a bare 404.
pub async fn get_relation(
    State(state): State<AppState>,
    Path(relation_id): Path<String>,
) -> Result<Response, AppError> {
    let relation_id = snowflake::parse(&relation_id)
        .ok_or_else(|| AppError::BadRequest("Invalid relation ID".into()))?;

    match state.social.relation_members(relation_id).await {
        Ok(members) => Ok(Json(RelationResponse::from(members)).into_response()),
        Err(SocialError::RelationNotFound) => Ok(StatusCode::NOT_FOUND.into_response()),
        Err(e) => Err(map_social_error(e)),
    }
}
