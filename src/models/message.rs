use crate::entities::message;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MAX_MESSAGE_LEN: usize = 140;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<message::Model> for MessageResponse {
    fn from(message: message::Model) -> Self {
        MessageResponse {
            id: message.id,
            user_id: message.user_id,
            text: message.text,
            created_at: message.created_at,
        }
    }
}
