//! Chat Room Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::SendMessageRequest;
use crate::application::dto::response::{ChatMessageResponse, ChatRoomResponse, MyChatRoomResponse};
use crate::application::services::ChatError;
use crate::infrastructure::metrics;
use crate::presentation::http::extractors::{Caller, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::snowflake;
use crate::startup::AppState;

fn map_chat_error(e: ChatError) -> AppError {
    match e {
        ChatError::RoomNotFound => AppError::NotFound(e.to_string()),
        ChatError::NotMember => AppError::Forbidden(e.to_string()),
        ChatError::NotFriends => AppError::Conflict(e.to_string()),
        ChatError::InvalidMessage => AppError::Validation(e.to_string()),
        ChatError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_relation_id(raw: &str) -> Result<i64, AppError> {
    snowflake::parse(raw).ok_or_else(|| AppError::BadRequest("Invalid relation ID".into()))
}

/// Enter the room and return its history in one call
pub async fn open_chat_room(
    State(state): State<AppState>,
    caller: Caller,
    Path(relation_id): Path<String>,
) -> Result<Json<ChatRoomResponse>, AppError> {
    let relation_id = parse_relation_id(&relation_id)?;

    let room = state
        .chat
        .open_room(&caller.user_id, relation_id)
        .await
        .map_err(map_chat_error)?;

    metrics::record_chat_room_event("entered");
    Ok(Json(room.into()))
}

/// Join the room and mark the caller present
pub async fn enter_chat_room(
    State(state): State<AppState>,
    caller: Caller,
    Path(relation_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let relation_id = parse_relation_id(&relation_id)?;

    state
        .chat
        .enter_room(&caller.user_id, relation_id)
        .await
        .map_err(map_chat_error)?;

    metrics::record_chat_room_event("entered");
    Ok(StatusCode::NO_CONTENT)
}

/// Room participants and messages, without side effects
pub async fn get_chat_history(
    State(state): State<AppState>,
    caller: Caller,
    Path(relation_id): Path<String>,
) -> Result<Json<ChatRoomResponse>, AppError> {
    let relation_id = parse_relation_id(&relation_id)?;

    let room = state
        .chat
        .room_history(&caller.user_id, relation_id)
        .await
        .map_err(map_chat_error)?;

    Ok(Json(room.into()))
}

/// Post a message to the room
pub async fn send_chat_message(
    State(state): State<AppState>,
    caller: Caller,
    Path(relation_id): Path<String>,
    ValidatedJson(body): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>), AppError> {
    let relation_id = parse_relation_id(&relation_id)?;

    let message = state
        .chat
        .send_message(&caller.user_id, relation_id, &body.content)
        .await
        .map_err(map_chat_error)?;

    metrics::record_chat_room_event("message");
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Leave the room. Membership and history are kept.
pub async fn leave_chat_room(
    State(state): State<AppState>,
    caller: Caller,
    Path(relation_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let relation_id = parse_relation_id(&relation_id)?;

    state
        .chat
        .leave_room(&caller.user_id, relation_id)
        .await
        .map_err(map_chat_error)?;

    metrics::record_chat_room_event("left");
    Ok(StatusCode::OK)
}

/// Every room the caller has joined
pub async fn my_chat_rooms(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<MyChatRoomResponse>>, AppError> {
    let rooms = state
        .chat
        .my_rooms(&caller.user_id)
        .await
        .map_err(map_chat_error)?;

    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}
