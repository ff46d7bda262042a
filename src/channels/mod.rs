//! Front ends that drive a `FlowSession` interactively.

pub mod cli;

pub use cli::CliWalkthrough;
