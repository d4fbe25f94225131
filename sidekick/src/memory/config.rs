//! Invoke config: thread identity for checkpointing.

/// Config for a single invoke. Identifies the conversation thread whose
/// state is being driven.
///
/// When a checkpointer is attached, invoke must provide `thread_id`;
/// without one, nothing is persisted and the run is fire-and-forget.
///
/// **Interaction**: passed to `CompiledStateGraph::invoke(state, config)`
/// and to every `Checkpointer` method.
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread. Required when using a
    /// checkpointer.
    pub thread_id: Option<String>,
    /// Optional namespace for checkpoints. Default is empty.
    pub checkpoint_ns: String,
}

impl RunnableConfig {
    /// Config keyed to a thread id, default namespace.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            checkpoint_ns: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: default config has no thread id and empty namespace.
    #[test]
    fn default_has_no_thread() {
        let c = RunnableConfig::default();
        assert!(c.thread_id.is_none());
        assert!(c.checkpoint_ns.is_empty());
    }

    /// **Scenario**: for_thread sets the id and keeps the namespace empty.
    #[test]
    fn for_thread_sets_id() {
        let c = RunnableConfig::for_thread("t1");
        assert_eq!(c.thread_id.as_deref(), Some("t1"));
        assert!(c.checkpoint_ns.is_empty());
    }
}
