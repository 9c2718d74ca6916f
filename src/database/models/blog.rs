use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::AuthorSummary;
use crate::schema::blogs;

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
    pub author_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "blogs"]
pub struct NewBlog {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i32,
}

/// Partial edit of a blog. Only the content fields can ever change through it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Blog {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.author_id == user_id
    }

    pub fn edit(&mut self, patch: BlogPatch, now: DateTime<Utc>) {
        if patch.title.is_none() && patch.body.is_none() {
            return;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        self.updated_at = now;
    }

    /** Flips the archive flag and returns the new value */
    pub fn toggle_archive(&mut self) -> bool {
        self.is_archived = !self.is_archived;
        self.is_archived
    }

    pub fn archive_message(&self) -> &'static str {
        if self.is_archived {
            "Blog has been archived"
        } else {
            "Blog has been unarchived"
        }
    }
}

/// Blog as served to readers, with its author and like count resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogView {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorSummary,
    pub likes: i64,
}
