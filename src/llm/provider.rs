//! Provider trait and request/response types for schema-constrained generation.

use async_trait::async_trait;

use crate::error::LlmError;

pub const JSON_MIME_TYPE: &str = "application/json";

/// One prompt plus the output schema the reply must follow.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
    pub response_mime_type: String,
}

impl StructuredRequest {
    pub fn json(prompt: impl Into<String>, response_schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema,
            response_mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// Raw text returned by the provider. Parsing is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct StructuredResponse {
    pub text: String,
}

/// A hosted generation service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn model_name(&self) -> &str;

    /// Issue exactly one request. No retry.
    async fn generate_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<StructuredResponse, LlmError>;
}
