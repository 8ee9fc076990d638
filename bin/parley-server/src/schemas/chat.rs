use parley_core::Message;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /get_response`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// The user's message.  Missing or `null` is treated as empty.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for a successful `POST /get_response`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    /// The generated reply.
    pub response: String,
}

/// Response body for `/clear_chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    /// Always `"Chat cleared"`.
    pub status: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// One entry of `GET /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: i64,
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            role: m.role.to_string(),
            content: m.content,
        }
    }
}
