//! Transactional in-process store with the same constraints as the Postgres schema:
//! unique emails, usernames and likes, foreign keys, and cascading deletes.

use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
};

use super::{
    unique_violation, Database, Repository, UNIQUE_USER_POST_LIKE, USERS_EMAIL_KEY,
    USERS_USERNAME_KEY,
};
use crate::{
    app::AppError,
    database::models::{
        blog::{Blog, NewBlog},
        comment::{Comment, NewComment},
        like::{Like, NewLike},
        user::{NewUser, User, UserChanges},
    },
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn check_user_unique(&self, user_id: i32, username: &str, email: &str) -> Result<(), AppError> {
        let others = self.users.iter().filter(|u| u.id != user_id);
        for other in others {
            if other.email == email {
                return Err(unique_violation(Some(USERS_EMAIL_KEY)));
            }
            if other.username == username {
                return Err(unique_violation(Some(USERS_USERNAME_KEY)));
            }
        }
        Ok(())
    }

    fn require_user(&self, user_id: i32) -> Result<(), AppError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(AppError::BadRequest("Database integrity error".into()))
        }
    }

    fn require_blog(&self, blog_id: i32) -> Result<(), AppError> {
        if self.blogs.iter().any(|b| b.id == blog_id) {
            Ok(())
        } else {
            Err(AppError::BadRequest("Database integrity error".into()))
        }
    }
}

/// Mirrors the UPDATE diesel builds from a `UserChanges` changeset: `None` leaves a column alone.
fn apply_changes(user: &mut User, changes: &UserChanges) {
    if let Some(name) = &changes.name {
        user.name = name.clone();
    }
    if let Some(username) = &changes.username {
        user.username = username.clone();
    }
    if let Some(email) = &changes.email {
        user.email = email.clone();
    }
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Works on a private copy of the tables, written back only on commit.
pub struct MemoryRepo {
    tables: RefCell<Tables>,
}

impl Database for MemoryDatabase {
    type Repo = MemoryRepo;

    fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&MemoryRepo) -> Result<T, AppError>,
    {
        let mut committed = self
            .tables
            .lock()
            .map_err(|_| AppError::internal("memory store lock poisoned"))?;

        let repo = MemoryRepo {
            tables: RefCell::new(committed.clone()),
        };
        let out = f(&repo)?;
        *committed = repo.tables.into_inner();

        Ok(out)
    }
}

impl Repository for MemoryRepo {
    fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.borrow_mut();
        tables.check_user_unique(0, &user.username, &user.email)?;

        let row = User {
            id: tables.next_id(),
            name: user.name,
            username: user.username,
            email: user.email,
            password: user.password,
            created_at: user.created_at,
        };
        tables.users.push(row.clone());

        Ok(row)
    }

    fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.borrow();

        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.borrow();

        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    fn update_user(&self, user_id: i32, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.borrow_mut();
        let mut updated = match tables.users.iter().find(|u| u.id == user_id) {
            Some(user) => user.clone(),
            None => return Ok(None),
        };
        apply_changes(&mut updated, changes);
        tables.check_user_unique(user_id, &updated.username, &updated.email)?;

        if let Some(row) = tables.users.iter_mut().find(|u| u.id == user_id) {
            *row = updated.clone();
        }

        Ok(Some(updated))
    }

    fn delete_user(&self, user_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.borrow_mut();
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Ok(false);
        }

        let owned_blogs: Vec<i32> = tables
            .blogs
            .iter()
            .filter(|b| b.author_id == user_id)
            .map(|b| b.id)
            .collect();

        tables
            .likes
            .retain(|l| l.user_id != user_id && !owned_blogs.contains(&l.post_id));
        tables
            .comments
            .retain(|c| c.user_id != user_id && !owned_blogs.contains(&c.post_id));
        tables.blogs.retain(|b| b.author_id != user_id);
        tables.users.retain(|u| u.id != user_id);

        Ok(true)
    }

    fn insert_blog(&self, blog: NewBlog) -> Result<Blog, AppError> {
        let mut tables = self.tables.borrow_mut();
        tables.require_user(blog.author_id)?;

        let row = Blog {
            id: tables.next_id(),
            title: blog.title,
            body: blog.body,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            is_archived: false,
            author_id: blog.author_id,
        };
        tables.blogs.push(row.clone());

        Ok(row)
    }

    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, AppError> {
        let tables = self.tables.borrow();

        Ok(tables.blogs.iter().find(|b| b.id == blog_id).cloned())
    }

    fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        Ok(self.tables.borrow().blogs.clone())
    }

    fn save_blog(&self, blog: &Blog) -> Result<Blog, AppError> {
        let mut tables = self.tables.borrow_mut();
        let row = tables
            .blogs
            .iter_mut()
            .find(|b| b.id == blog.id)
            .ok_or_else(|| AppError::NotFound("Resource not found".into()))?;

        row.title = blog.title.clone();
        row.body = blog.body.clone();
        row.is_archived = blog.is_archived;
        row.updated_at = blog.updated_at;

        Ok(row.clone())
    }

    fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut tables = self.tables.borrow_mut();
        tables.require_user(comment.user_id)?;
        tables.require_blog(comment.post_id)?;

        let row = Comment {
            id: tables.next_id(),
            content: comment.content,
            is_updated: false,
            is_archived: false,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            user_id: comment.user_id,
            post_id: comment.post_id,
        };
        tables.comments.push(row.clone());

        Ok(row)
    }

    fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError> {
        let tables = self.tables.borrow();

        Ok(tables.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.borrow();

        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    fn save_comment(&self, comment: &Comment) -> Result<Comment, AppError> {
        let mut tables = self.tables.borrow_mut();
        let row = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or_else(|| AppError::NotFound("Resource not found".into()))?;

        row.content = comment.content.clone();
        row.is_updated = comment.is_updated;
        row.is_archived = comment.is_archived;
        row.updated_at = comment.updated_at;

        Ok(row.clone())
    }

    fn insert_like(&self, like: NewLike) -> Result<Like, AppError> {
        let mut tables = self.tables.borrow_mut();
        tables.require_user(like.user_id)?;
        tables.require_blog(like.post_id)?;

        if tables
            .likes
            .iter()
            .any(|l| l.user_id == like.user_id && l.post_id == like.post_id)
        {
            return Err(unique_violation(Some(UNIQUE_USER_POST_LIKE)));
        }

        let row = Like {
            id: tables.next_id(),
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: like.created_at,
        };
        tables.likes.push(row.clone());

        Ok(row)
    }

    fn count_likes(&self, post_id: i32) -> Result<i64, AppError> {
        let tables = self.tables.borrow();

        Ok(tables.likes.iter().filter(|l| l.post_id == post_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            name: "test_user".into(),
            username: username.into(),
            email: email.into(),
            password: "hash".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn failed_transaction_leaves_no_writes() {
        let db = MemoryDatabase::new();

        let result: Result<(), AppError> = db.transaction(|repo| {
            repo.insert_user(new_user("testing", "test@test.com"))?;
            Err(AppError::BadRequest("abort".into()))
        });
        assert!(result.is_err());

        let found = db
            .transaction(|repo| repo.find_user_by_email("test@test.com"))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let db = MemoryDatabase::new();
        db.transaction(|repo| repo.insert_user(new_user("testing", "test@test.com")))
            .unwrap();

        let err = db
            .transaction(|repo| repo.insert_user(new_user("other", "test@test.com")))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Email already registered"));
    }

    #[test]
    fn blog_needs_an_existing_author() {
        let db = MemoryDatabase::new();
        let now = Utc::now();

        let err = db
            .transaction(|repo| {
                repo.insert_blog(NewBlog {
                    title: "Test Title".into(),
                    body: "test test test".into(),
                    created_at: now,
                    updated_at: now,
                    author_id: 99,
                })
            })
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn partial_user_update_keeps_other_columns() {
        let db = MemoryDatabase::new();
        let user = db
            .transaction(|repo| repo.insert_user(new_user("testing", "test@test.com")))
            .unwrap();

        let changes = UserChanges {
            username: Some("renamed".into()),
            ..Default::default()
        };
        let updated = db
            .transaction(|repo| repo.update_user(user.id, &changes))
            .unwrap()
            .unwrap();

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.password, user.password);
    }
}
