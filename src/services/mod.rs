//! Ownership checked operations on users, blogs, comments and likes.
//!
//! Every operation takes the acting user explicitly and runs in exactly one
//! transaction, so a failure anywhere leaves the store untouched.

pub mod blog;
pub mod comment;
pub mod like;
pub mod user;

use serde::Serialize;

/// Result of flipping an archive flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveOutcome {
    pub message: &'static str,
    pub is_archived: bool,
}
