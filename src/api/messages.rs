use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::entities::message;
use crate::error::ServiceError;
use crate::models::{MessageResponse, NewMessageRequest, MAX_MESSAGE_LEN};
use crate::services::follows;
use actix_web::{web, HttpResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/messages/new",
    request_body = NewMessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Empty or too-long text"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "messages"
)]
pub async fn create_message(
    req: web::Json<NewMessageRequest>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ServiceError::BadRequest(
            "Message text cannot be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(ServiceError::BadRequest(format!(
            "Message text cannot exceed {} characters",
            MAX_MESSAGE_LEN
        )));
    }

    let new_message = message::ActiveModel {
        user_id: Set(auth.user_id),
        text: Set(text.to_string()),
        ..Default::default()
    };

    let message = message::Entity::insert(new_message)
        .exec_with_returning(pool.get_ref())
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::from(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages/{message_id}",
    params(
        ("message_id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "The message", body = MessageResponse),
        (status = 404, description = "Message not found")
    ),
    tag = "messages"
)]
pub async fn show_message(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let message_id = path.into_inner();

    let message = message::Entity::find_by_id(message_id)
        .one(pool.get_ref())
        .await?
        .ok_or(ServiceError::NotFound("Message"))?;

    Ok(HttpResponse::Ok().json(MessageResponse::from(message)))
}

#[utoipa::path(
    post,
    path = "/api/messages/{message_id}/delete",
    params(
        ("message_id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the message owner"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "messages"
)]
pub async fn delete_message(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let message_id = path.into_inner();
    let db = pool.get_ref();

    let message = message::Entity::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Message"))?;

    if message.user_id != auth.user_id {
        return Err(ServiceError::Forbidden);
    }

    message::Entity::delete_by_id(message_id).exec(db).await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Message deleted"})))
}

#[utoipa::path(
    get,
    path = "/api/timeline",
    responses(
        (status = 200, description = "Latest messages from followed users and self", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "messages"
)]
pub async fn timeline(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let db = pool.get_ref();

    let mut ids = follows::following_ids(db, auth.user_id).await?;
    ids.push(auth.user_id);

    let messages = message::Entity::find()
        .filter(message::Column::UserId.is_in(ids))
        .order_by_desc(message::Column::CreatedAt)
        .limit(100)
        .all(db)
        .await?;

    let responses: Vec<MessageResponse> =
        messages.into_iter().map(MessageResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}
