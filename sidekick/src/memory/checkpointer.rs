//! Checkpointer trait and errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata};
use crate::memory::config::RunnableConfig;

/// Error from a Checkpointer operation.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// State failed to serialize or deserialize.
    #[error("checkpoint serialization failed: {0}")]
    Serialization(String),

    /// Underlying storage failed (e.g. SQLite I/O).
    #[error("checkpoint storage failed: {0}")]
    Storage(String),

    /// Config has no thread_id; a checkpointer cannot key the snapshot.
    #[error("thread_id is required when using a checkpointer")]
    MissingThreadId,
}

/// Durable keyed storage for graph state.
///
/// `put` must be atomic per checkpoint: a reader never observes a partially
/// written snapshot. Per-thread write serialization is the implementation's
/// concern (the engine runs one node at a time per thread id, but distinct
/// callers may race on the same id).
///
/// **Interaction**: called by `CompiledStateGraph::invoke` after every node
/// execution and by runners building the initial state for a continuation.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Saves one checkpoint for `config.thread_id`.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError>;

    /// Loads the latest checkpoint for `config.thread_id`, or `None` when
    /// the thread has no saved state yet.
    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError>;

    /// Lists saved checkpoints for the thread, oldest first.
    async fn list(&self, config: &RunnableConfig) -> Result<Vec<CheckpointListItem>, CheckpointError>;
}
