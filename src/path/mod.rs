//! Learning paths: the domain model and the client that generates them.

pub mod generator;
pub mod model;
pub mod prompts;

pub use generator::{PathGenerator, parse_path_response};
pub use model::{LearningPath, LearningStep, StepKind, UserProfile};
