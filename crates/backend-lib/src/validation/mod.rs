// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation and input neutralization.

use crate::error::AppError;
use portal_common::{CommentForm, LoginForm};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Column limits of the users/comments tables
const MAX_USERNAME_LENGTH: usize = 80;
const MAX_PASSWORD_LENGTH: usize = 120;
const MAX_COMMENT_LENGTH: usize = 1000;
const MAX_REDIRECT_LENGTH: usize = 256;

// Internal pages the redirect helper may send a client to
static REDIRECT_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(|quotes|sitemap|comments|downloads|forum|login|logout|search|profile/[0-9]{1,18})$")
        .unwrap()
});
static REDIRECT_QUERY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.~%+=&-]*$").unwrap());
static FILENAME_STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Invalid destination")]
    InvalidDestination,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Validated login submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Validated guestbook entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub username: String,
    pub text: String,
}

/// Neutralize markup and control characters.
///
/// Control characters are dropped and HTML metacharacters are replaced by
/// their entities. Applied to both login fields before the lookup, and to
/// credentials when accounts are created, so the two always agree.
pub fn neutralize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => {},
            c => out.push(c),
        }
    }
    out
}

fn within(value: String, field: &'static str, max: usize) -> ValidationResult<String> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

fn required(value: Option<String>, field: &'static str, max: usize) -> ValidationResult<String> {
    let value = value.unwrap_or_default();
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    within(value, field, max)
}

fn present(value: Option<String>, field: &'static str, max: usize) -> ValidationResult<String> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    within(value, field, max)
}

/// Validate the login form.
///
/// The password only has to be submitted: a blank one goes through the
/// lookup and counts as a failed attempt like any other wrong password.
pub fn validate_login(form: LoginForm) -> ValidationResult<Credentials> {
    Ok(Credentials {
        username: required(form.username, "Username", MAX_USERNAME_LENGTH)?,
        password: present(form.password, "Password", MAX_PASSWORD_LENGTH)?,
    })
}

/// Validate a guestbook entry
pub fn validate_comment(form: CommentForm) -> ValidationResult<NewComment> {
    Ok(NewComment {
        username: required(form.username, "Username", MAX_USERNAME_LENGTH)?
            .trim()
            .to_string(),
        text: required(form.comment, "Comment", MAX_COMMENT_LENGTH)?,
    })
}

/// Reduce a client supplied name to a plain file name.
///
/// Path separators become spaces, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// trimmed. The result never contains a path component.
pub fn secure_filename(name: &str) -> String {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    FILENAME_STRIP_REGEX
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Validate a download request, returning the safe file name
pub fn validate_download_name(name: Option<&str>) -> ValidationResult<String> {
    let name = secure_filename(name.unwrap_or_default());
    if name.is_empty() {
        return Err(ValidationError::InvalidFileName);
    }
    Ok(name)
}

/// Accept only allow-listed internal destinations
pub fn validate_redirect_target(destination: Option<&str>) -> ValidationResult<&str> {
    let destination = destination.ok_or(ValidationError::InvalidDestination)?;
    if destination.len() > MAX_REDIRECT_LENGTH {
        return Err(ValidationError::InvalidDestination);
    }

    let (path, query) = match destination.split_once('?') {
        Some((path, query)) => (path, query),
        None => (destination, ""),
    };
    if !REDIRECT_PATH_REGEX.is_match(path) || !REDIRECT_QUERY_REGEX.is_match(query) {
        return Err(ValidationError::InvalidDestination);
    }
    Ok(destination)
}
