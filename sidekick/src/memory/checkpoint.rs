//! Checkpoint and metadata types.

use std::time::SystemTime;

/// Metadata for a single checkpoint (source, step, created_at).
///
/// Used by Checkpointer implementations and by `list()` for run history.
#[derive(Debug, Clone)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Number of node executions completed when this snapshot was taken.
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// Source of the checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointSource {
    /// Initial state supplied by the caller.
    Input,
    /// Written by the engine after a node execution.
    Loop,
    /// Written outside the step loop (e.g. a manual state edit).
    Update,
}

impl CheckpointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointSource::Input => "input",
            CheckpointSource::Loop => "loop",
            CheckpointSource::Update => "update",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "input" => Some(CheckpointSource::Input),
            "loop" => Some(CheckpointSource::Loop),
            "update" => Some(CheckpointSource::Update),
            _ => None,
        }
    }
}

/// One checkpoint: a full state snapshot plus id/ts.
///
/// Stored by a Checkpointer keyed by `(thread_id, checkpoint_ns,
/// checkpoint_id)`. The whole state is one aggregate; it is saved and loaded
/// atomically, never field by field.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub id: String,
    pub ts: String,
    pub state: S,
    pub metadata: CheckpointMetadata,
}

/// Item returned by `Checkpointer::list` for run history.
#[derive(Debug, Clone)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint from the current state. Uses current time for
    /// ts and a `{ts}-{step}` id so ids order by step within a thread.
    pub fn from_state(state: S, source: CheckpointSource, step: u64) -> Self {
        let now = SystemTime::now();
        let ts = format!(
            "{}",
            now.duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        );
        let id = format!("{}-{}", ts, step);
        Self {
            id,
            ts,
            state,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}
