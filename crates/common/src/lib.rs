// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the portal backend and its test suite.
//! This module defines the identifiers and the form/query payloads the
//! HTML front end submits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user account in the credential store
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Raw integer value as stored in the `users.id` column
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Login form posted to `/login`
///
/// Fields are optional so that a missing field surfaces as a validation
/// error instead of an extractor rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Guestbook entry posted to `/comments`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CommentForm {
    pub username: Option<String>,
    pub comment: Option<String>,
}

/// Query string of `/download`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DownloadQuery {
    /// Requested file name, relative to the docs directory
    pub file: Option<String>,
}

/// Query string of `/search`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Query string of `/redirect`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RedirectQuery {
    pub destination: Option<String>,
}
