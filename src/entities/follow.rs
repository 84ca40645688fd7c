use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Follow edge: `user_following_id` follows `user_being_followed_id`.
/// The composite primary key doubles as the uniqueness constraint.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_being_followed_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_following_id: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserBeingFollowedId",
        to = "super::user::Column::Id"
    )]
    FollowedUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserFollowingId",
        to = "super::user::Column::Id"
    )]
    FollowingUser,
}

impl ActiveModelBehavior for ActiveModel {}
