//! SQLite-backed checkpointer (feature `sqlite`).
//!
//! One row per checkpoint, keyed by `(thread_id, checkpoint_ns,
//! checkpoint_id)`; state is serialized through `JsonSerializer`. The
//! connection lives behind a mutex, which also serializes writes when two
//! callers race on the same thread id.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::memory::checkpoint::{
    Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource,
};
use crate::memory::checkpointer::{CheckpointError, Checkpointer};
use crate::memory::config::RunnableConfig;
use crate::memory::serializer::{JsonSerializer, Serializer};

/// Persistent Checkpointer backed by a SQLite file.
///
/// Requires `S: Serialize + DeserializeOwned`. Each `put` is one
/// `INSERT OR REPLACE`, so a snapshot is visible atomically or not at all.
pub struct SqliteSaver<S> {
    conn: Mutex<Connection>,
    serializer: JsonSerializer,
    _state: PhantomData<fn() -> S>,
}

impl<S> SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static + serde::Serialize + serde::de::DeserializeOwned,
{
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path).map_err(storage)?;
        Self::with_connection(conn)
    }

    /// Builds a saver over an existing connection (e.g. in-memory for tests).
    pub fn with_connection(conn: Connection) -> Result<Self, CheckpointError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id     TEXT NOT NULL,
                checkpoint_ns TEXT NOT NULL,
                checkpoint_id TEXT NOT NULL,
                ts            TEXT NOT NULL,
                source        TEXT NOT NULL,
                step          INTEGER NOT NULL,
                state         BLOB NOT NULL,
                PRIMARY KEY (thread_id, checkpoint_ns, checkpoint_id)
            )",
            [],
        )
        .map_err(storage)?;
        Ok(Self {
            conn: Mutex::new(conn),
            serializer: JsonSerializer,
            _state: PhantomData,
        })
    }
}

fn storage(e: impl std::fmt::Display) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

fn thread_key(config: &RunnableConfig) -> Result<&str, CheckpointError> {
    config
        .thread_id
        .as_deref()
        .ok_or(CheckpointError::MissingThreadId)
}

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static + serde::Serialize + serde::de::DeserializeOwned,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        let thread_id = thread_key(config)?;
        let bytes = self.serializer.serialize(&checkpoint.state)?;
        let conn = self.conn.lock().map_err(storage)?;
        conn.execute(
            "INSERT OR REPLACE INTO checkpoints
                (thread_id, checkpoint_ns, checkpoint_id, ts, source, step, state)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                thread_id,
                config.checkpoint_ns,
                checkpoint.id,
                checkpoint.ts,
                checkpoint.metadata.source.as_str(),
                checkpoint.metadata.step as i64,
                bytes,
            ],
        )
        .map_err(storage)?;
        Ok(())
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let thread_id = thread_key(config)?;
        let conn = self.conn.lock().map_err(storage)?;
        let row = conn
            .query_row(
                "SELECT checkpoint_id, ts, source, step, state FROM checkpoints
                 WHERE thread_id = ?1 AND checkpoint_ns = ?2
                 ORDER BY step DESC, ts DESC LIMIT 1",
                params![thread_id, config.checkpoint_ns],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Vec<u8>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(storage)?;

        let Some((id, ts, source, step, bytes)) = row else {
            return Ok(None);
        };
        let state = self.serializer.deserialize(&bytes)?;
        let metadata = CheckpointMetadata {
            source: CheckpointSource::parse(&source)
                .ok_or_else(|| CheckpointError::Storage(format!("unknown source: {source}")))?,
            step: step as u64,
            created_at: None,
        };
        Ok(Some((
            Checkpoint {
                id,
                ts,
                state,
                metadata: metadata.clone(),
            },
            metadata,
        )))
    }

    async fn list(&self, config: &RunnableConfig) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread_id = thread_key(config)?;
        let conn = self.conn.lock().map_err(storage)?;
        let mut stmt = conn
            .prepare(
                "SELECT checkpoint_id, source, step FROM checkpoints
                 WHERE thread_id = ?1 AND checkpoint_ns = ?2
                 ORDER BY step ASC, ts ASC",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![thread_id, config.checkpoint_ns], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(storage)?;

        let mut items = Vec::new();
        for row in rows {
            let (checkpoint_id, source, step) = row.map_err(storage)?;
            items.push(CheckpointListItem {
                checkpoint_id,
                metadata: CheckpointMetadata {
                    source: CheckpointSource::parse(&source).ok_or_else(|| {
                        CheckpointError::Storage(format!("unknown source: {source}"))
                    })?,
                    step: step as u64,
                    created_at: None,
                },
            });
        }
        Ok(items)
    }
}
