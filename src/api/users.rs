use crate::auth::{verify_password, AuthenticatedUser};
use crate::db::DbPool;
use crate::entities::{like, message, user};
use crate::error::ServiceError;
use crate::models::{MessageResponse, UpdateProfileRequest, UserProfileResponse, UserResponse};
use crate::services::{accounts, follows};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UserQuery {
    #[schema(example = "test")]
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("q" = Option<String>, Query, description = "Substring filter on username")
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>)
    ),
    tag = "users"
)]
pub async fn list_users(
    query: web::Query<UserQuery>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let mut select = user::Entity::find().order_by_asc(user::Column::Id);
    if let Some(q) = &query.q {
        select = select.filter(user::Column::Username.contains(q.as_str()));
    }
    let users = select.all(pool.get_ref()).await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile with counts", body = UserProfileResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn show_user(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    let db = pool.get_ref();

    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let message_count = message::Entity::find()
        .filter(message::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    let following_count = follows::following_ids(db, user_id).await?.len() as u64;
    let follower_count = follows::follower_ids(db, user_id).await?.len() as u64;
    let like_count = like::Entity::find()
        .filter(like::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    Ok(HttpResponse::Ok().json(UserProfileResponse {
        user: user.into(),
        message_count,
        following_count,
        follower_count,
        like_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/following",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Users this user follows", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the resource owner")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn list_following(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    if auth.user_id != user_id {
        return Err(ServiceError::Forbidden);
    }
    let db = pool.get_ref();

    let ids = follows::following_ids(db, user_id).await?;
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/followers",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Users following this user", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the resource owner")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn list_followers(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    if auth.user_id != user_id {
        return Err(ServiceError::Forbidden);
    }
    let db = pool.get_ref();

    let ids = follows::follower_ids(db, user_id).await?;
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/likes",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Messages this user has liked", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the resource owner")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn list_likes(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    if auth.user_id != user_id {
        return Err(ServiceError::Forbidden);
    }
    let db = pool.get_ref();

    let likes = like::Entity::find()
        .filter(like::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    let message_ids: Vec<i64> = likes.into_iter().map(|l| l.message_id).collect();

    let messages = message::Entity::find()
        .filter(message::Column::Id.is_in(message_ids))
        .order_by_desc(message::Column::CreatedAt)
        .all(db)
        .await?;

    let responses: Vec<MessageResponse> =
        messages.into_iter().map(MessageResponse::from).collect();
    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    post,
    path = "/api/users/follow/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User to follow")
    ),
    responses(
        (status = 200, description = "Now following"),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn follow_user(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let followed_id = path.into_inner();
    follows::follow(pool.get_ref(), auth.user_id, followed_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Now following"})))
}

#[utoipa::path(
    post,
    path = "/api/users/stop-following/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User to stop following")
    ),
    responses(
        (status = 200, description = "Stopped following"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn stop_following(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let followed_id = path.into_inner();
    follows::unfollow(pool.get_ref(), auth.user_id, followed_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Stopped following"})))
}

#[utoipa::path(
    post,
    path = "/api/users/add_like/{message_id}",
    params(
        ("message_id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message liked"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn add_like(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let message_id = path.into_inner();
    let db = pool.get_ref();

    // Check if already liked
    let existing = like::Entity::find()
        .filter(
            Condition::all()
                .add(like::Column::MessageId.eq(message_id))
                .add(like::Column::UserId.eq(auth.user_id)),
        )
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(HttpResponse::Ok().json(json!({"message": "Already liked"})));
    }

    let target = message::Entity::find_by_id(message_id).one(db).await?;
    if target.is_none() {
        return Err(ServiceError::NotFound("Message"));
    }

    let new_like = like::ActiveModel {
        message_id: Set(message_id),
        user_id: Set(auth.user_id),
        ..Default::default()
    };

    match like::Entity::insert(new_like).exec(db).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({"message": "Message liked"}))),
        // Race with a concurrent like of the same message.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(HttpResponse::Ok().json(json!({"message": "Already liked"})))
        }
        Err(e) => Err(ServiceError::Database(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/users/delete_like/{message_id}",
    params(
        ("message_id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message unliked"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn delete_like(
    path: web::Path<i64>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let message_id = path.into_inner();

    like::Entity::delete_many()
        .filter(
            Condition::all()
                .add(like::Column::MessageId.eq(message_id))
                .add(like::Column::UserId.eq(auth.user_id)),
        )
        .exec(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Message unliked"})))
}

#[utoipa::path(
    patch,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Password check failed"),
        (status = 409, description = "Username or email taken")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn update_profile(
    req: web::Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    let db = pool.get_ref();

    let current = user::Entity::find_by_id(auth.user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    // Profile edits require the current password.
    if !verify_password(&req.password, &current.password_hash) {
        return Err(ServiceError::Forbidden);
    }

    let mut active: user::ActiveModel = current.into();
    if let Some(username) = &req.username {
        active.username = Set(username.clone());
    }
    if let Some(email) = &req.email {
        active.email = Set(email.clone());
    }
    if let Some(image_url) = &req.image_url {
        active.image_url = Set(image_url.clone());
    }
    if let Some(header_image_url) = &req.header_image_url {
        active.header_image_url = Set(header_image_url.clone());
    }
    if let Some(bio) = &req.bio {
        active.bio = Set(Some(bio.clone()));
    }
    if let Some(location) = &req.location {
        active.location = Set(Some(location.clone()));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(UserResponse::from(updated))),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::DuplicateUser),
            _ => Err(ServiceError::Database(e)),
        },
    }
}

#[utoipa::path(
    post,
    path = "/api/users/delete",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn delete_account(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    accounts::delete_account(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Account deleted"})))
}
