//! In-memory checkpointer for dev and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::memory::checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata};
use crate::memory::checkpointer::{CheckpointError, Checkpointer};
use crate::memory::config::RunnableConfig;

/// In-memory Checkpointer: keeps the full checkpoint history per
/// `(thread_id, checkpoint_ns)` in a mutex-guarded map. Not durable; use
/// `SqliteSaver` for persistence across processes.
pub struct MemorySaver<S> {
    threads: Mutex<HashMap<(String, String), Vec<Checkpoint<S>>>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
        }
    }
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn key(config: &RunnableConfig) -> Result<(String, String), CheckpointError> {
    let thread_id = config
        .thread_id
        .clone()
        .ok_or(CheckpointError::MissingThreadId)?;
    Ok((thread_id, config.checkpoint_ns.clone()))
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        let key = key(config)?;
        let mut threads = self
            .threads
            .lock()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        threads.entry(key).or_default().push(checkpoint.clone());
        Ok(())
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let key = key(config)?;
        let threads = self
            .threads
            .lock()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(threads
            .get(&key)
            .and_then(|history| history.last())
            .map(|cp| (cp.clone(), cp.metadata.clone())))
    }

    async fn list(&self, config: &RunnableConfig) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let key = key(config)?;
        let threads = self
            .threads
            .lock()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(threads
            .get(&key)
            .map(|history| {
                history
                    .iter()
                    .map(|cp| CheckpointListItem {
                        checkpoint_id: cp.id.clone(),
                        metadata: cp.metadata.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
