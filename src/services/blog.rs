use chrono::Utc;

use super::ArchiveOutcome;
use crate::{
    app::AppError,
    database::{
        models::blog::{Blog, BlogView, NewBlog},
        Database, Repository,
    },
    validation::{CreateBlogRequest, UpdateBlogRequest},
};

/// Loads a blog the actor is allowed to modify.
pub(crate) fn owned_blog<R: Repository>(
    repo: &R,
    blog_id: i32,
    actor_id: i32,
) -> Result<Blog, AppError> {
    let blog = find_blog(repo, blog_id)?;
    if !blog.is_owned_by(actor_id) {
        return Err(AppError::Forbidden(
            "You are not allowed to modify this blog".into(),
        ));
    }

    Ok(blog)
}

pub(crate) fn find_blog<R: Repository>(repo: &R, blog_id: i32) -> Result<Blog, AppError> {
    repo.find_blog(blog_id)?
        .ok_or_else(|| AppError::not_found("Blog"))
}

fn view<R: Repository>(repo: &R, blog: Blog) -> Result<BlogView, AppError> {
    let author = repo
        .find_user(blog.author_id)?
        .ok_or_else(|| AppError::internal(format!("blog {} has no author", blog.id)))?;
    let likes = repo.count_likes(blog.id)?;

    Ok(BlogView {
        blog,
        author: author.summary(),
        likes,
    })
}

/** Creates a blog owned by the authenticated author, whatever the payload says */
pub fn create_blog<D: Database>(
    db: &D,
    author_id: i32,
    request: CreateBlogRequest,
) -> Result<Blog, AppError> {
    db.transaction(|repo| {
        repo.find_user(author_id)?
            .ok_or_else(|| AppError::NotFound("No user found".into()))?;
        let input = request.into_valid()?;
        let now = Utc::now();

        let blog = repo.insert_blog(NewBlog {
            title: input.title,
            body: input.body,
            created_at: now,
            updated_at: now,
            author_id,
        })?;
        log::info!("user {} created blog {}", author_id, blog.id);

        Ok(blog)
    })
}

pub fn update_blog<D: Database>(
    db: &D,
    blog_id: i32,
    actor_id: i32,
    request: UpdateBlogRequest,
) -> Result<Blog, AppError> {
    db.transaction(|repo| {
        let mut blog = owned_blog(repo, blog_id, actor_id)?;
        let patch = request.into_valid()?;

        blog.edit(patch, Utc::now());
        repo.save_blog(&blog)
    })
}

pub fn toggle_blog_archive<D: Database>(
    db: &D,
    blog_id: i32,
    actor_id: i32,
) -> Result<ArchiveOutcome, AppError> {
    db.transaction(|repo| {
        let mut blog = owned_blog(repo, blog_id, actor_id)?;

        blog.toggle_archive();
        let blog = repo.save_blog(&blog)?;
        log::info!(
            "user {} set blog {} archived={}",
            actor_id,
            blog.id,
            blog.is_archived
        );

        Ok(ArchiveOutcome {
            message: blog.archive_message(),
            is_archived: blog.is_archived,
        })
    })
}

pub fn get_blog<D: Database>(db: &D, blog_id: i32) -> Result<BlogView, AppError> {
    db.transaction(|repo| {
        let blog = find_blog(repo, blog_id)?;
        view(repo, blog)
    })
}

/// An empty listing is reported as not found, see DESIGN.md.
pub fn list_blogs<D: Database>(db: &D) -> Result<Vec<BlogView>, AppError> {
    db.transaction(|repo| {
        let blogs = repo.list_blogs()?;
        if blogs.is_empty() {
            return Err(AppError::NotFound("No blogs found".into()));
        }

        blogs.into_iter().map(|blog| view(repo, blog)).collect()
    })
}
