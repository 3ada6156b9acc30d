//! SQLite session store with WAL mode.

use crate::state::schema;
use crate::types::AgentMessage;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::path::Path;
use tracing::info;

const NOTE_PREFIX: &str = "note_prompt:";
const SCENARIO_PREFIX: &str = "scenario:";

/// The session state database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let version = self.schema_version();

        if version == 0 {
            info!("Creating session schema v{}", schema::SCHEMA_VERSION);
            self.conn
                .execute_batch(schema::CREATE_SCHEMA)
                .context("Failed to create schema")?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::SCHEMA_VERSION],
            )?;
        }

        Ok(())
    }

    /// Get the current schema version (0 if uninitialized).
    fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Key-value store
    // -----------------------------------------------------------------------

    /// Get a value from the KV store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get(0)).ok();
        Ok(result)
    }

    /// Set a value in the KV store (upsert).
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Author notes and scenario overrides
    // -----------------------------------------------------------------------

    pub fn author_note(&self, chat_id: &str) -> Result<Option<String>> {
        self.kv_get(&format!("{NOTE_PREFIX}{chat_id}"))
    }

    pub fn set_author_note(&self, chat_id: &str, text: &str) -> Result<()> {
        self.kv_set(&format!("{NOTE_PREFIX}{chat_id}"), text)
    }

    pub fn scenario(&self, avatar: &str) -> Result<Option<String>> {
        self.kv_get(&format!("{SCENARIO_PREFIX}{avatar}"))
    }

    pub fn set_scenario(&self, avatar: &str, text: &str) -> Result<()> {
        self.kv_set(&format!("{SCENARIO_PREFIX}{avatar}"), text)
    }

    // -----------------------------------------------------------------------
    // Agent context
    // -----------------------------------------------------------------------

    /// Persist an agent-context message.
    pub fn save_agent_message(&self, msg: &AgentMessage) -> Result<()> {
        self.conn.execute(
            "INSERT INTO agent_messages (id, from_agent, to_agent, subject, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                msg.id,
                msg.from,
                msg.to,
                msg.subject,
                msg.message,
                msg.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List agent-context messages, oldest first, optionally for one recipient.
    pub fn agent_messages(&self, to: Option<&str>) -> Result<Vec<AgentMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, from_agent, to_agent, subject, message, created_at
             FROM agent_messages
             WHERE ?1 IS NULL OR to_agent = ?1
             ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![to], |row| {
            Ok(AgentMessage {
                id: row.get(0)?,
                from: row.get(1)?,
                to: row.get(2)?,
                subject: row.get(3)?,
                message: row.get(4)?,
                created_at: row.get::<_, String>(5).map(|s| {
                    chrono::DateTime::parse_from_rfc3339(&s)
                        .map(|d| d.with_timezone(&chrono::Utc))
                        .unwrap_or_else(|_| chrono::Utc::now())
                })?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    // -----------------------------------------------------------------------
    // Pending host input
    // -----------------------------------------------------------------------

    /// Queue text for the host's input box.
    pub fn push_pending_input(&self, text: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pending_input (text) VALUES (?1)",
            params![text],
        )?;
        Ok(())
    }

    /// Queued input in submission order, without removing it.
    pub fn pending_input(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM pending_input ORDER BY seq")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Take all queued input in submission order.
    ///
    /// Runs under a write lock and deletes only the rows it returns, so input
    /// queued by another process meanwhile stays for the next drain.
    pub fn drain_pending_input(&self) -> Result<Vec<String>> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let rows: Vec<(i64, String)> = {
            let mut stmt = tx.prepare("SELECT seq, text FROM pending_input ORDER BY seq")?;
            let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            mapped.collect::<rusqlite::Result<_>>()?
        };

        if let Some((last, _)) = rows.last() {
            tx.execute("DELETE FROM pending_input WHERE seq <= ?1", params![last])?;
        }
        tx.commit()?;

        Ok(rows.into_iter().map(|(_, text)| text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn message(to: &str, subject: &str, offset_secs: i64) -> AgentMessage {
        AgentMessage {
            id: ulid::Ulid::new().to_string(),
            from: "Ava".into(),
            to: to.into(),
            subject: subject.into(),
            message: "body".into(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn author_note_is_scoped_per_chat() {
        let db = Database::open_memory().unwrap();
        db.set_author_note("chat-a", "keep it short").unwrap();
        db.set_author_note("chat-a", "keep it shorter").unwrap();

        assert_eq!(db.author_note("chat-a").unwrap().as_deref(), Some("keep it shorter"));
        assert_eq!(db.author_note("chat-b").unwrap(), None);
    }

    #[test]
    fn agent_messages_filter_by_recipient() {
        let db = Database::open_memory().unwrap();
        db.save_agent_message(&message("Bram", "first", 0)).unwrap();
        db.save_agent_message(&message("Cleo", "second", 1)).unwrap();
        db.save_agent_message(&message("Bram", "third", 2)).unwrap();

        let all = db.agent_messages(None).unwrap();
        assert_eq!(all.len(), 3);

        let bram: Vec<_> = db
            .agent_messages(Some("Bram"))
            .unwrap()
            .into_iter()
            .map(|m| m.subject)
            .collect();
        assert_eq!(bram, vec!["first", "third"]);
    }

    #[test]
    fn drain_empties_queue_in_order() {
        let db = Database::open_memory().unwrap();
        db.push_pending_input("/trigger Ava").unwrap();
        db.push_pending_input("/imagine background").unwrap();

        assert_eq!(
            db.drain_pending_input().unwrap(),
            vec!["/trigger Ava", "/imagine background"]
        );
        assert!(db.pending_input().unwrap().is_empty());
    }

    #[test]
    fn drain_never_loses_input_queued_by_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let reader = Database::open(&path).unwrap();
        let writer = Database::open(&path).unwrap();

        let pusher = std::thread::spawn(move || {
            for i in 0..200 {
                writer.push_pending_input(&format!("/trigger N{i}")).unwrap();
            }
        });

        let mut seen = Vec::new();
        while !pusher.is_finished() {
            seen.extend(reader.drain_pending_input().unwrap());
        }
        pusher.join().unwrap();
        seen.extend(reader.drain_pending_input().unwrap());

        let expected: Vec<_> = (0..200).map(|i| format!("/trigger N{i}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn reopening_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        {
            let db = Database::open(&path).unwrap();
            db.set_scenario("bram.png", "guarding the gate").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(
            db.scenario("bram.png").unwrap().as_deref(),
            Some("guarding the gate")
        );
    }
}
