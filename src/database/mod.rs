pub mod db_utils;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postgres;

use crate::app::AppError;
use models::{
    blog::{Blog, NewBlog},
    comment::{Comment, NewComment},
    like::{Like, NewLike},
    user::{NewUser, User, UserChanges},
};

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const UNIQUE_USER_POST_LIKE: &str = "unique_user_post_like";

/// Translates a unique constraint violation into the conflict reported to the client.
pub fn unique_violation(constraint: Option<&str>) -> AppError {
    let message = match constraint {
        Some(USERS_EMAIL_KEY) => "Email already registered",
        Some(USERS_USERNAME_KEY) => "Username already taken",
        Some(UNIQUE_USER_POST_LIKE) => "You have already liked this post",
        _ => "Database integrity error",
    };

    AppError::Conflict(message.to_string())
}

/// Row level access to the four tables. Every call happens inside a transaction
/// opened by [`Database::transaction`].
///
/// Save operations only write the mutable columns of a row, owner columns and
/// creation timestamps are never touched after insert.
pub trait Repository {
    fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    fn update_user(&self, user_id: i32, changes: &UserChanges) -> Result<Option<User>, AppError>;
    /// Removes the user along with every blog, comment and like that depends on them.
    fn delete_user(&self, user_id: i32) -> Result<bool, AppError>;

    fn insert_blog(&self, blog: NewBlog) -> Result<Blog, AppError>;
    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, AppError>;
    fn list_blogs(&self) -> Result<Vec<Blog>, AppError>;
    fn save_blog(&self, blog: &Blog) -> Result<Blog, AppError>;

    fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError>;
    fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError>;
    fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, AppError>;
    fn save_comment(&self, comment: &Comment) -> Result<Comment, AppError>;

    /// Fails with a conflict when the user already liked the post.
    fn insert_like(&self, like: NewLike) -> Result<Like, AppError>;
    fn count_likes(&self, post_id: i32) -> Result<i64, AppError>;
}

/// Handle on the persistence store, shared by every request.
pub trait Database: Clone + Send + Sync + 'static {
    type Repo: Repository;

    /// Runs `f` in a single transaction: committed when it returns `Ok`,
    /// rolled back on any error.
    fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Self::Repo) -> Result<T, AppError>;
}
