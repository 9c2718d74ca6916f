use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::comments;

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub is_updated: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: i32,
    pub post_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: i32,
    pub post_id: i32,
}

impl Comment {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }

    /** Edits always mark the comment as updated, there is no way back */
    pub fn edit(&mut self, content: Option<String>, now: DateTime<Utc>) {
        if let Some(content) = content {
            self.content = content;
        }
        self.is_updated = true;
        self.updated_at = now;
    }

    pub fn toggle_archive(&mut self) -> bool {
        self.is_archived = !self.is_archived;
        self.is_archived
    }

    pub fn archive_message(&self) -> &'static str {
        if self.is_archived {
            "Comment archived"
        } else {
            "Comment unarchived"
        }
    }
}
