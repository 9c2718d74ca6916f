use chrono::Utc;

use super::{blog::find_blog, ArchiveOutcome};
use crate::{
    app::AppError,
    database::{
        models::comment::{Comment, NewComment},
        Database, Repository,
    },
    validation::{CreateCommentRequest, UpdateCommentRequest},
};

/// Loads a comment on the given blog that the actor is allowed to modify.
/// A comment that belongs to another blog is treated as missing.
fn owned_comment<R: Repository>(
    repo: &R,
    blog_id: i32,
    comment_id: i32,
    actor_id: i32,
) -> Result<Comment, AppError> {
    find_blog(repo, blog_id)?;

    let comment = repo
        .find_comment(comment_id)?
        .filter(|c| c.post_id == blog_id)
        .ok_or_else(|| AppError::not_found("Comment"))?;
    if !comment.is_owned_by(actor_id) {
        return Err(AppError::Forbidden(
            "You are not allowed to modify this comment".into(),
        ));
    }

    Ok(comment)
}

pub fn create_comment<D: Database>(
    db: &D,
    blog_id: i32,
    actor_id: i32,
    request: CreateCommentRequest,
) -> Result<Comment, AppError> {
    db.transaction(|repo| {
        find_blog(repo, blog_id)?;
        let content = request.into_valid()?;
        let now = Utc::now();

        repo.insert_comment(NewComment {
            content,
            created_at: now,
            updated_at: now,
            user_id: actor_id,
            post_id: blog_id,
        })
    })
}

pub fn update_comment<D: Database>(
    db: &D,
    blog_id: i32,
    comment_id: i32,
    actor_id: i32,
    request: UpdateCommentRequest,
) -> Result<Comment, AppError> {
    db.transaction(|repo| {
        let mut comment = owned_comment(repo, blog_id, comment_id, actor_id)?;
        let content = request.into_valid()?;

        comment.edit(content, Utc::now());
        repo.save_comment(&comment)
    })
}

pub fn toggle_comment_archive<D: Database>(
    db: &D,
    blog_id: i32,
    comment_id: i32,
    actor_id: i32,
) -> Result<ArchiveOutcome, AppError> {
    db.transaction(|repo| {
        let mut comment = owned_comment(repo, blog_id, comment_id, actor_id)?;

        comment.toggle_archive();
        let comment = repo.save_comment(&comment)?;

        Ok(ArchiveOutcome {
            message: comment.archive_message(),
            is_archived: comment.is_archived,
        })
    })
}

pub fn list_comments_for_blog<D: Database>(db: &D, blog_id: i32) -> Result<Vec<Comment>, AppError> {
    db.transaction(|repo| {
        find_blog(repo, blog_id)?;

        let comments = repo.list_comments(blog_id)?;
        if comments.is_empty() {
            return Err(AppError::NotFound("No comments found".into()));
        }

        Ok(comments)
    })
}
