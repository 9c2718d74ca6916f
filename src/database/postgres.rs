use diesel::{
    pg::PgConnection,
    prelude::*,
    r2d2::{ConnectionManager, PooledConnection},
};

use super::{db_utils::PgPool, Database, Repository};
use crate::{
    app::AppError,
    database::models::{
        blog::{Blog, NewBlog},
        comment::{Comment, NewComment},
        like::{Like, NewLike},
        user::{NewUser, User, UserChanges},
    },
    schema::{blogs, comments, likes, users},
};

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One pooled connection, only handed out while its transaction is open.
pub struct PgRepo {
    conn: PooledConnection<ConnectionManager<PgConnection>>,
}

impl PgRepo {
    fn conn(&self) -> &PgConnection {
        &self.conn
    }
}

impl Database for PgDatabase {
    type Repo = PgRepo;

    fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&PgRepo) -> Result<T, AppError>,
    {
        let repo = PgRepo {
            conn: self.pool.get()?,
        };

        repo.conn().transaction(|| f(&repo))
    }
}

impl Repository for PgRepo {
    fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        Ok(diesel::insert_into(users::table)
            .values(&user)
            .get_result(self.conn())?)
    }

    fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError> {
        Ok(users::table
            .find(user_id)
            .first::<User>(self.conn())
            .optional()?)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(users::table
            .filter(users::email.eq(email))
            .first::<User>(self.conn())
            .optional()?)
    }

    fn update_user(&self, user_id: i32, changes: &UserChanges) -> Result<Option<User>, AppError> {
        // diesel refuses an UPDATE without any SET clause
        if changes.is_empty() {
            return self.find_user(user_id);
        }

        Ok(diesel::update(users::table.find(user_id))
            .set(changes)
            .get_result::<User>(self.conn())
            .optional()?)
    }

    fn delete_user(&self, user_id: i32) -> Result<bool, AppError> {
        // blogs, comments and likes go with it through ON DELETE CASCADE
        let deleted = diesel::delete(users::table.find(user_id)).execute(self.conn())?;

        Ok(deleted > 0)
    }

    fn insert_blog(&self, blog: NewBlog) -> Result<Blog, AppError> {
        Ok(diesel::insert_into(blogs::table)
            .values(&blog)
            .get_result(self.conn())?)
    }

    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, AppError> {
        Ok(blogs::table
            .find(blog_id)
            .first::<Blog>(self.conn())
            .optional()?)
    }

    fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        Ok(blogs::table
            .order(blogs::id.asc())
            .load::<Blog>(self.conn())?)
    }

    fn save_blog(&self, blog: &Blog) -> Result<Blog, AppError> {
        Ok(diesel::update(blogs::table.find(blog.id))
            .set((
                blogs::title.eq(&blog.title),
                blogs::body.eq(&blog.body),
                blogs::is_archived.eq(blog.is_archived),
                blogs::updated_at.eq(blog.updated_at),
            ))
            .get_result(self.conn())?)
    }

    fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        Ok(diesel::insert_into(comments::table)
            .values(&comment)
            .get_result(self.conn())?)
    }

    fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError> {
        Ok(comments::table
            .find(comment_id)
            .first::<Comment>(self.conn())
            .optional()?)
    }

    fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, AppError> {
        Ok(comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::id.asc())
            .load::<Comment>(self.conn())?)
    }

    fn save_comment(&self, comment: &Comment) -> Result<Comment, AppError> {
        Ok(diesel::update(comments::table.find(comment.id))
            .set((
                comments::content.eq(&comment.content),
                comments::is_updated.eq(comment.is_updated),
                comments::is_archived.eq(comment.is_archived),
                comments::updated_at.eq(comment.updated_at),
            ))
            .get_result(self.conn())?)
    }

    fn insert_like(&self, like: NewLike) -> Result<Like, AppError> {
        Ok(diesel::insert_into(likes::table)
            .values(&like)
            .get_result(self.conn())?)
    }

    fn count_likes(&self, post_id: i32) -> Result<i64, AppError> {
        Ok(likes::table
            .filter(likes::post_id.eq(post_id))
            .count()
            .get_result(self.conn())?)
    }
}
