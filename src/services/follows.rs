use crate::entities::{follow, user};
use crate::error::ServiceError;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};

/// True iff `user_id` follows `other_id`. Single point lookup on the
/// follows primary key.
pub async fn is_following(
    db: &DatabaseConnection,
    user_id: i64,
    other_id: i64,
) -> Result<bool, ServiceError> {
    let edge = follow::Entity::find_by_id((other_id, user_id)).one(db).await?;
    Ok(edge.is_some())
}

/// True iff `other_id` follows `user_id`.
pub async fn is_followed_by(
    db: &DatabaseConnection,
    user_id: i64,
    other_id: i64,
) -> Result<bool, ServiceError> {
    let edge = follow::Entity::find_by_id((user_id, other_id)).one(db).await?;
    Ok(edge.is_some())
}

pub async fn follow(
    db: &DatabaseConnection,
    follower_id: i64,
    followed_id: i64,
) -> Result<(), ServiceError> {
    if follower_id == followed_id {
        return Err(ServiceError::BadRequest(
            "You cannot follow yourself".to_string(),
        ));
    }

    let target = user::Entity::find_by_id(followed_id).one(db).await?;
    if target.is_none() {
        return Err(ServiceError::NotFound("User"));
    }

    let edge = follow::ActiveModel {
        user_being_followed_id: Set(followed_id),
        user_following_id: Set(follower_id),
        ..Default::default()
    };

    match follow::Entity::insert(edge).exec(db).await {
        Ok(_) => Ok(()),
        // A racing duplicate follow collapses into a no-op.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
        Err(e) => Err(ServiceError::Database(e)),
    }
}

pub async fn unfollow(
    db: &DatabaseConnection,
    follower_id: i64,
    followed_id: i64,
) -> Result<(), ServiceError> {
    follow::Entity::delete_many()
        .filter(
            Condition::all()
                .add(follow::Column::UserBeingFollowedId.eq(followed_id))
                .add(follow::Column::UserFollowingId.eq(follower_id)),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Ids of everyone `user_id` follows.
pub async fn following_ids(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<i64>, ServiceError> {
    let edges = follow::Entity::find()
        .filter(follow::Column::UserFollowingId.eq(user_id))
        .all(db)
        .await?;
    Ok(edges.into_iter().map(|e| e.user_being_followed_id).collect())
}

/// Ids of everyone following `user_id`.
pub async fn follower_ids(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<i64>, ServiceError> {
    let edges = follow::Entity::find()
        .filter(follow::Column::UserBeingFollowedId.eq(user_id))
        .all(db)
        .await?;
    Ok(edges.into_iter().map(|e| e.user_following_id).collect())
}
