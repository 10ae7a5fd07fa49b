//! Durable SQLite store.
//!
//! Three tables: users, sessions, messages. Messages hang off their
//! session with cascade delete; sessions hang off their owning user. Every
//! write is individually committed, matching the orchestrator's
//! write-per-turn model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;

use parley_core::error::{ParleyError, Result};
use parley_core::memory::Feedback;

/// Message kind column values.
pub const KIND_USER: &str = "user";
pub const KIND_PERSONA: &str = "persona";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    age INTEGER,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    scenario TEXT NOT NULL,
    personas TEXT NOT NULL,
    created_at TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    summary TEXT,
    evaluation TEXT
);
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    content TEXT NOT NULL,
    persona TEXT,
    feedback TEXT,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);
";

/// A registered user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub age: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A durable session row.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub id: i64,
    pub user_id: i64,
    pub scenario: String,
    pub personas: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub summary: Option<String>,
    pub evaluation: Option<String>,
}

/// A durable message row.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub session_id: i64,
    pub kind: String,
    pub content: String,
    pub persona: Option<String>,
    pub feedback: Option<Json<Feedback>>,
    pub timestamp: DateTime<Utc>,
}

/// One row of a user's session history listing.
#[derive(Debug, Clone, FromRow)]
pub struct SessionOverview {
    pub id: i64,
    pub scenario: String,
    pub personas: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub evaluation: Option<String>,
    pub message_count: i64,
}

fn db(err: sqlx::Error) -> ParleyError {
    ParleyError::database(err.to_string())
}

/// Connection-pooled access to the durable tables.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to the given SQLite URL, creating the file and schema as
    /// needed. Foreign keys are enabled per connection so cascade deletes
    /// actually fire.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db)?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory store for tests. A single pooled connection keeps every
    /// query on the same in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(db)?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await.map_err(db)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)
    }

    pub async fn create_user(
        &self,
        username: &str,
        role: &str,
        age: Option<i64>,
    ) -> Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, role, age, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(username)
        .bind(role)
        .bind(age)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub async fn create_session(
        &self,
        user_id: i64,
        scenario: &str,
        personas: &[String],
    ) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO sessions (user_id, scenario, personas, created_at, is_active)
             VALUES (?, ?, ?, ?, 1) RETURNING id",
        )
        .bind(user_id)
        .bind(scenario)
        .bind(Json(personas.to_vec()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;
        Ok(row.0)
    }

    pub async fn find_session(&self, session_id: i64) -> Result<Option<SessionRecord>> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db)
    }

    /// Flips the active flag off. Ending an already ended session is a
    /// no-op at this layer; the orchestrator rejects it earlier.
    pub async fn end_session(&self, session_id: i64) -> Result<()> {
        sqlx::query("UPDATE sessions SET is_active = 0 WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }

    pub async fn save_summary(
        &self,
        session_id: i64,
        summary: &str,
        evaluation: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE sessions SET summary = ?, evaluation = ? WHERE id = ?")
            .bind(summary)
            .bind(evaluation)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }

    /// Newest-first history for a user, with per-session message counts.
    pub async fn user_sessions(&self, user_id: i64) -> Result<Vec<SessionOverview>> {
        sqlx::query_as::<_, SessionOverview>(
            "SELECT s.id, s.scenario, s.personas, s.created_at, s.summary, s.evaluation,
                    (SELECT COUNT(*) FROM messages m WHERE m.session_id = s.id) AS message_count
             FROM sessions s
             WHERE s.user_id = ?
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db)
    }

    /// Deletes a session and, via cascade, its messages. Returns whether a
    /// row was actually removed.
    pub async fn delete_session(&self, session_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub async fn save_user_message(
        &self,
        session_id: i64,
        content: &str,
        feedback: Option<&Feedback>,
    ) -> Result<i64> {
        self.save_message(session_id, KIND_USER, None, content, feedback)
            .await
    }

    pub async fn save_persona_message(
        &self,
        session_id: i64,
        persona: &str,
        content: &str,
    ) -> Result<i64> {
        self.save_message(session_id, KIND_PERSONA, Some(persona), content, None)
            .await
    }

    async fn save_message(
        &self,
        session_id: i64,
        kind: &str,
        persona: Option<&str>,
        content: &str,
        feedback: Option<&Feedback>,
    ) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO messages (session_id, kind, content, persona, feedback, timestamp)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(session_id)
        .bind(kind)
        .bind(content)
        .bind(persona)
        .bind(feedback.map(|f| Json(f.clone())))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;
        Ok(row.0)
    }

    /// Ordered message log for a session, oldest first.
    pub async fn session_messages(&self, session_id: i64) -> Result<Vec<MessageRecord>> {
        sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE session_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db)
    }
}
