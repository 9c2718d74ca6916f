use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::users;

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    /// bcrypt hash of the password, never sent to clients
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields a user may change about themselves. The password is not one of them.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[table_name = "users"]
pub struct UserChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none() && self.email.is_none()
    }
}

impl User {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// What readers of a blog get to see about its author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub id: i32,
    pub username: String,
    pub name: String,
}
