//! Language-model enhancement of weak taxonomy nodes.
//!
//! A batch from the planner is turned into one prompt, sent through a
//! [`TextGenerator`], and the reply is applied to the category fragment
//! files before the consolidated document is rebuilt.

pub mod apply;
pub mod claude;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod reply;

pub use apply::{path_matches, FragmentSet};
pub use claude::{ClaudeClient, ClaudeConfig};
pub use error::{EnhanceError, EnhanceResult, GeneratorError};
pub use generator::{GenerationRequest, TextGenerator};
pub use pipeline::{BatchOutcome, Enhancer, EnhancerSettings, RebuildStatus, RunSummary};
pub use prompt::{build_prompt, PromptSettings};
pub use reply::{parse_reply, Enhancement, EnhancementReply};
