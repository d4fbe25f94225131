//! The sidekick agent: worker, specialist, tools, and evaluator nodes on a
//! shared [`crate::state::SidekickState`], wired by [`SidekickRunner`].

mod evaluator;
mod output;
mod routers;
mod runner;
mod specialist;
mod tools;
mod trigger;
mod worker;

pub use evaluator::EvaluatorNode;
pub use output::{Article, EvaluatorVerdict, LanguageItem, LanguageItemKind, SpecialistOutput};
pub use routers::{EvaluatorRouter, WorkerRouter, EVALUATOR, SPECIALIST, TOOLS, WORKER};
pub use runner::{RunError, SidekickCapabilities, SidekickReply, SidekickRunner};
pub use specialist::SpecialistNode;
pub use tools::{HandleToolErrors, ToolNode};
pub use trigger::{DelegationTrigger, KoreanLearningTrigger};
pub use worker::WorkerNode;
