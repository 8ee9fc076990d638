//! Chat page and conversation endpoints.
//!
//! | route                    | effect                                   |
//! |--------------------------|------------------------------------------|
//! | `GET /`                  | render the full history                  |
//! | `POST /get_response`     | store input, generate, store reply       |
//! | `GET\|POST /clear_chat`  | delete the log, reset the context window |
//! | `GET /api/messages`      | the history as JSON                      |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::chat::{
    ClearResponse, ErrorResponse, MessageResponse, SubmitRequest, SubmitResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(index, get_response, clear_chat, list_messages),
    components(schemas(
        SubmitRequest,
        SubmitResponse,
        ClearResponse,
        ErrorResponse,
        MessageResponse
    ))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/get_response", post(get_response))
        .route("/clear_chat", get(clear_chat).post(clear_chat))
        .route("/api/messages", get(list_messages))
}

/// Render the chat page with the full message history.
#[utoipa::path(
    get,
    path = "/",
    tag = "chat",
    responses(
        (status = 200, description = "Chat page", body = String, content_type = "text/html"),
        (status = 500, description = "Storage error", body = ErrorResponse),
    )
)]
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    let history = state.chat.history().await?;
    Ok(Html(state.pages.index(&history)?))
}

/// Submit a message and return the generated reply.
#[utoipa::path(
    post,
    path = "/get_response",
    tag = "chat",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Reply generated", body = SubmitResponse),
        (status = 400, description = "Empty or malformed message", body = ErrorResponse),
        (status = 500, description = "Generation or storage failure", body = ErrorResponse),
    )
)]
pub async fn get_response(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ServerError> {
    let Json(req) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    let input = req.message.unwrap_or_default();
    debug!(input_len = input.len(), "submit request");

    let reply = state.chat.submit(&input).await?;
    Ok(Json(SubmitResponse { response: reply.text }))
}

/// Delete every stored message and reset the conversational context.
#[utoipa::path(
    post,
    path = "/clear_chat",
    tag = "chat",
    responses(
        (status = 200, description = "Chat cleared", body = ClearResponse),
        (status = 500, description = "Storage error", body = ErrorResponse),
    )
)]
pub async fn clear_chat(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ServerError> {
    state.chat.clear().await?;
    Ok(Json(ClearResponse {
        status: "Chat cleared".to_owned(),
    }))
}

/// Full message history in insertion order.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "chat",
    responses(
        (status = 200, description = "Message history", body = Vec<MessageResponse>),
        (status = 500, description = "Storage error", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageResponse>>, ServerError> {
    let history = state.chat.history().await?;
    Ok(Json(history.into_iter().map(MessageResponse::from).collect()))
}
