//! Checkpointing: durable per-thread state snapshots.
//!
//! A [`Checkpointer`] stores one [`Checkpoint`] per completed node execution,
//! keyed by `(thread_id, checkpoint_ns)` from [`RunnableConfig`], so an
//! interrupted run resumes from the last completed node and a finished run
//! can be continued in a later superstep.
//!
//! | Type            | Persistence | Use case                | Feature  |
//! |-----------------|-------------|-------------------------|----------|
//! | [`MemorySaver`] | In-memory   | Dev, tests              | none     |
//! | [`SqliteSaver`] | SQLite file | Single-node, production | `sqlite` |
//!
//! [`JsonSerializer`] is required for `SqliteSaver` (state must be
//! `Serialize + DeserializeOwned`). Concurrent callers for the same thread id
//! are serialized by the store, not by the graph engine.

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
