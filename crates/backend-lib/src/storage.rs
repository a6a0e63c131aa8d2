// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with a SQLite implementation.
//!
//! Every statement built from request data goes through `?` parameter
//! binding. No query in this module is assembled with string formatting.
use crate::error::AppError;
use async_trait::async_trait;
use portal_common::UserId;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    FromRow,
};
use std::str::FromStr;
use tracing::info;

/// Schema applied on connect. Statements are idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS carddetail (
        id INTEGER NOT NULL REFERENCES users(id),
        card_holder TEXT,
        card_number TEXT NOT NULL,
        expiry TEXT
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        text TEXT NOT NULL
    )",
];

/// A user account as seen by the rest of the application.
///
/// The stored credential is never loaded, only compared inside the lookup
/// query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
}

/// Seed data for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Explicit identifier, or `None` to let the database assign one
    pub id: Option<UserId>,
    pub username: String,
    pub password: String,
}

/// Payment card attached to a user profile
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CardDetail {
    pub card_holder: Option<String>,
    pub card_number: String,
    pub expiry: Option<String>,
}

impl CardDetail {
    /// Card number reduced to its last four digits
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** **** **** {tail}")
    }

    pub fn holder_display(&self) -> &str {
        self.card_holder.as_deref().unwrap_or("-")
    }

    pub fn expiry_display(&self) -> &str {
        self.expiry.as_deref().unwrap_or("-")
    }
}

/// Guestbook entry
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
        }
    }
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Find the account whose username and password both match exactly
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, AppError>;

    /// Load an account by identifier
    async fn find_user(&self, id: UserId) -> Result<Option<UserAccount>, AppError>;

    /// Cards stored for an account
    async fn list_cards(&self, id: UserId) -> Result<Vec<CardDetail>, AppError>;

    /// All guestbook entries, oldest first
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError>;

    /// Append a guestbook entry
    async fn add_comment(&self, username: &str, text: &str) -> Result<(), AppError>;

    /// Create an account (seed data)
    async fn create_user(&self, user: &NewUser) -> Result<UserId, AppError>;

    /// Attach a card to an account (seed data)
    async fn add_card(&self, owner: UserId, card: &CardDetail) -> Result<(), AppError>;
}

/// SQLite implementation of the Storage trait
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to `url`, creating the database file and schema if missing
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let storage = Self { pool };
        storage.migrate().await?;
        info!(%url, "datastore ready");
        Ok(storage)
    }

    /// Private in-memory database, used by tests and demos.
    ///
    /// A single connection that is never recycled keeps the data alive for
    /// the lifetime of the pool.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let storage = Self { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Close the pool; every later call fails with `StoreUnavailable`
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username FROM users WHERE username = ? AND password = ?")
                .bind(username)
                .bind(password)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserAccount>, AppError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT id, username FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserAccount::from))
    }

    async fn list_cards(&self, id: UserId) -> Result<Vec<CardDetail>, AppError> {
        let cards = sqlx::query_as(
            "SELECT card_holder, card_number, expiry FROM carddetail WHERE id = ? ORDER BY rowid",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as("SELECT username, text FROM comments ORDER BY comment_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn add_comment(&self, username: &str, text: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO comments (username, text) VALUES (?, ?)")
            .bind(username)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId, AppError> {
        let result = sqlx::query("INSERT INTO users (id, username, password) VALUES (?, ?, ?)")
            .bind(user.id.map(UserId::get))
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await?;
        Ok(UserId(result.last_insert_rowid()))
    }

    async fn add_card(&self, owner: UserId, card: &CardDetail) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO carddetail (id, card_holder, card_number, expiry) VALUES (?, ?, ?, ?)",
        )
        .bind(owner.get())
        .bind(&card.card_holder)
        .bind(&card.card_number)
        .bind(&card.expiry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
