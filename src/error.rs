//! Error types for Upskill Pilot.

use crate::flow::state::FlowStep;

/// Shown whenever the generation service replied with something that is not a
/// usable learning path.
pub const FORMAT_ERROR_MESSAGE: &str = "Failed to generate a valid learning path. \
The AI's response was not in the correct format. Please try again.";

/// Shown for every other generation failure (transport, auth, provider status).
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred while generating \
your learning path. Please check your API key and try again later.";

/// Shown when the user submits without selecting a skill.
pub const NO_SKILLS_MESSAGE: &str = "Please select at least one skill.";

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures of a single learning-path generation.
///
/// Every variant maps onto one of two user-facing messages, see
/// [`GenerationError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Received an empty response from the AI")]
    EmptyResponse,

    #[error("AI response is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("AI response is missing required fields 'title' or 'steps'")]
    MissingFields,

    #[error("AI response step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },

    #[error("Provider failure: {0}")]
    Provider(#[from] LlmError),
}

impl GenerationError {
    /// Whether the reply arrived but could not be used as a learning path.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Provider(_))
    }

    /// The single human-readable message surfaced to the user.
    pub fn user_message(&self) -> &'static str {
        if self.is_format_error() {
            FORMAT_ERROR_MESSAGE
        } else {
            UNEXPECTED_ERROR_MESSAGE
        }
    }
}

/// Rejected questionnaire actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Cannot {action} while in step {step}")]
    InvalidTransition { step: FlowStep, action: &'static str },

    #[error("Name, current role and career goal are all required")]
    IncompleteProfile,

    #[error("Please select at least one skill.")]
    NoSkillsSelected,

    #[error("Step {index} is out of range for a path with {total} steps")]
    StepOutOfRange { index: usize, total: usize },

    #[error("There is no skill number {number}, pick 1 to {total}")]
    SkillNumberOutOfRange { number: usize, total: usize },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
