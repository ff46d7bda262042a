//! Upskill Pilot: questionnaire-driven learning paths from a hosted LLM.

pub mod channels;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod llm;
pub mod path;
pub mod routes;
