//! Questionnaire flow: the screens a user walks through, from intro to the
//! generated checklist.
//!
//! `Questionnaire` is the synchronous state machine; `FlowSession` shares it
//! behind a lock and runs generation against the configured provider.

pub mod loader;
pub mod machine;
pub mod progress;
pub mod session;
pub mod skills;
pub mod state;

pub use machine::{Applied, FlowSnapshot, GenerationTicket, ProfileUpdate, Questionnaire};
pub use progress::CompletionTracker;
pub use session::FlowSession;
pub use skills::{SKILL_CATALOG, SkillCategory, SkillSet};
pub use state::FlowStep;
