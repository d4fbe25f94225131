//! Shared-state contract: a state type plus its partial-update reducer.

use crate::error::AgentError;

/// A graph state: one aggregate record threaded through every step of a run.
///
/// Nodes never mutate state; they return a `Self::Update` that the engine
/// merges through [`apply`](GraphState::apply). The merge policy is owned by
/// the state type: list fields concatenate, scalar fields overwrite when
/// present in the update and stay untouched when absent. The engine calls
/// [`validate`](GraphState::validate) first, so `apply` is infallible and a
/// rejected update leaves the state exactly as it was.
pub trait GraphState: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Partial update returned by nodes. An empty/default update must be a
    /// no-op: `s.apply(Update::default()) == s`.
    type Update: Default + Send + 'static;

    /// Checks the update contract before the merge. A violation fails the
    /// run with `AgentError::MalformedUpdate`; nothing is merged.
    fn validate(update: &Self::Update) -> Result<(), AgentError> {
        let _ = update;
        Ok(())
    }

    /// Merges the update into the state, consuming both.
    fn apply(self, update: Self::Update) -> Self;
}
