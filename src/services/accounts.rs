use crate::auth::{hash_password, verify_password};
use crate::entities::user;
use crate::error::ServiceError;
use crate::models::SignupRequest;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};

/// Hash the password and insert the new user. A duplicate username or
/// email surfaces from the unique constraints at insert time.
pub async fn signup(
    db: &DatabaseConnection,
    req: &SignupRequest,
) -> Result<user::Model, ServiceError> {
    let password_hash = hash_password(&req.password)?;

    let mut new_user = user::ActiveModel {
        email: Set(req.email.clone()),
        username: Set(req.username.clone()),
        password_hash: Set(password_hash),
        ..Default::default()
    };
    if let Some(image_url) = &req.image_url {
        new_user.image_url = Set(image_url.clone());
    }

    match user::Entity::insert(new_user).exec_with_returning(db).await {
        Ok(user) => {
            log::info!("Created user {} (id {})", user.username, user.id);
            Ok(user)
        }
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::DuplicateUser),
            _ => Err(ServiceError::Database(e)),
        },
    }
}

/// Look up by username and verify the password. Unknown username and
/// wrong password both return `None` so callers cannot tell them apart.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, ServiceError> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Ok(None),
    };

    if verify_password(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Delete the user row; messages, follows and likes go with it via
/// ON DELETE CASCADE.
pub async fn delete_account(db: &DatabaseConnection, user_id: i64) -> Result<(), ServiceError> {
    let result = user::Entity::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound("User"));
    }
    log::info!("Deleted user {}", user_id);
    Ok(())
}
