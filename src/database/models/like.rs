use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::likes;

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "likes"]
pub struct NewLike {
    pub user_id: i32,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}
