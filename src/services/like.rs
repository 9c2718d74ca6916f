use chrono::Utc;
use serde::Serialize;

use super::blog::find_blog;
use crate::{
    app::AppError,
    database::{models::like::NewLike, Database, Repository},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeOutcome {
    pub message: &'static str,
    pub likes: i64,
}

/** Likes a post once. The store's unique (user, post) constraint turns a repeat into a conflict */
pub fn like_post<D: Database>(db: &D, blog_id: i32, actor_id: i32) -> Result<LikeOutcome, AppError> {
    db.transaction(|repo| {
        find_blog(repo, blog_id)?;

        repo.insert_like(NewLike {
            user_id: actor_id,
            post_id: blog_id,
            created_at: Utc::now(),
        })?;

        Ok(LikeOutcome {
            message: "Liked",
            likes: repo.count_likes(blog_id)?,
        })
    })
}
