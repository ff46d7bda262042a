//! Path generator: turns a profile into one schema-constrained request and
//! the reply into a validated `LearningPath`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::error::GenerationError;
use crate::llm::provider::{LlmProvider, StructuredRequest};

use super::model::{LearningPath, StepKind, UserProfile};
use super::prompts::{build_prompt, response_schema};

pub struct PathGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl PathGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Generate a learning path for `profile`.
    ///
    /// Exactly one provider call per invocation. The caller guarantees at
    /// least one skill is selected.
    pub async fn generate(&self, profile: &UserProfile) -> Result<LearningPath, GenerationError> {
        info!(
            model = self.llm.model_name(),
            skills = profile.skills.len(),
            "Generating learning path"
        );

        let request = StructuredRequest::json(build_prompt(profile), response_schema());

        let result = match self.llm.generate_structured(request).await {
            Ok(response) => parse_path_response(&response.text),
            Err(e) => Err(GenerationError::Provider(e)),
        };

        match &result {
            Ok(path) => info!(
                title = %path.title,
                steps = path.steps.len(),
                "Learning path generated"
            ),
            Err(e) => error!(error = %e, "Error generating learning path"),
        }

        result
    }
}

/// Parse and validate the raw reply text.
///
/// The whole path is rejected if the top level or any step breaks the schema.
pub fn parse_path_response(text: &str) -> Result<LearningPath, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(trimmed)?;

    let title_ok = value
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());
    let description_ok = value.get("description").is_some_and(Value::is_string);
    let steps = value.get("steps").and_then(Value::as_array);

    let Some(steps) = steps.filter(|_| title_ok && description_ok) else {
        return Err(GenerationError::MissingFields);
    };

    for (index, step) in steps.iter().enumerate() {
        validate_step(step).map_err(|reason| GenerationError::InvalidStep { index, reason })?;
    }

    Ok(serde_json::from_value(value)?)
}

fn validate_step(step: &Value) -> Result<(), String> {
    let Some(fields) = step.as_object() else {
        return Err("not an object".to_string());
    };

    for key in ["title", "description", "duration"] {
        match fields.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => return Err(format!("'{key}' must be a string")),
            None => return Err(format!("missing '{key}'")),
        }
    }

    match fields.get("type") {
        Some(Value::String(kind)) if StepKind::from_wire(kind).is_some() => {}
        Some(other) => return Err(format!("unknown content type {other}")),
        None => return Err("missing 'type'".to_string()),
    }

    match fields.get("isPro") {
        Some(Value::Bool(_)) => Ok(()),
        Some(_) => Err("'isPro' must be a boolean".to_string()),
        None => Err("missing 'isPro'".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{FORMAT_ERROR_MESSAGE, LlmError, UNEXPECTED_ERROR_MESSAGE};
    use crate::flow::skills::SkillSet;
    use crate::llm::provider::StructuredResponse;

    const UX_ASCENT: &str = r#"{"title":"UX Ascent","description":"...","steps":[{"title":"Intro to UX research","description":"...","type":"TEXT","duration":"1 hour","isPro":false}]}"#;

    /// Stub provider replaying a fixed reply and recording requests.
    struct StubLlm {
        reply: Result<String, fn() -> LlmError>,
        requests: Mutex<Vec<StructuredRequest>>,
    }

    impl StubLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: fn() -> LlmError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn generate_structured(
            &self,
            request: StructuredRequest,
        ) -> Result<StructuredResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(StructuredResponse { text: text.clone() }),
                Err(make) => Err(make()),
            }
        }
    }

    fn ana() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            current_role: "Designer".to_string(),
            career_goal: "UX Lead".to_string(),
            skills: ["SQL"].into_iter().collect::<SkillSet>(),
        }
    }

    #[tokio::test]
    async fn generates_path_from_well_formed_reply() {
        let stub = StubLlm::replying(UX_ASCENT);
        let generator = PathGenerator::new(stub.clone());

        let path = generator.generate(&ana()).await.unwrap();
        assert_eq!(path.title, "UX Ascent");
        assert_eq!(path.steps.len(), 1);
        assert_eq!(path.steps[0].kind, StepKind::Text);

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "exactly one outbound call");
        assert_eq!(requests[0].response_mime_type, "application/json");
        assert!(requests[0].prompt.contains("Existing Skills: SQL"));
    }

    #[tokio::test]
    async fn empty_reply_uses_format_message() {
        let generator = PathGenerator::new(StubLlm::replying("   \n"));
        let err = generator.generate(&ana()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
        assert_eq!(err.user_message(), FORMAT_ERROR_MESSAGE);
        assert_ne!(err.user_message(), UNEXPECTED_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn provider_failure_uses_generic_message() {
        let generator = PathGenerator::new(StubLlm::failing(|| LlmError::AuthFailed {
            provider: "stub".to_string(),
        }));
        let err = generator.generate(&ana()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert_eq!(err.user_message(), UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn reply_is_trimmed_before_parsing() {
        let path = parse_path_response(&format!("\n  {UX_ASCENT}  \n")).unwrap();
        assert_eq!(path.title, "UX Ascent");
    }

    #[test]
    fn missing_steps_fails() {
        let err = parse_path_response(r#"{"title":"X"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MissingFields));
    }

    #[test]
    fn steps_must_be_an_array() {
        let err = parse_path_response(r#"{"title":"X","description":"d","steps":{}}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MissingFields));
    }

    #[test]
    fn empty_title_fails() {
        let err = parse_path_response(r#"{"title":"","description":"d","steps":[]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MissingFields));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_path_response("{\"title\": \"X\", ").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
        assert_eq!(err.user_message(), FORMAT_ERROR_MESSAGE);
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        let reply = r#"{"title":"X","description":"d","steps":[
            {"title":"a","description":"b","type":"TEXT","duration":"1h","isPro":false},
            {"title":"a","description":"b","type":"PODCAST","duration":"1h","isPro":false}
        ]}"#;
        match parse_path_response(reply) {
            Err(GenerationError::InvalidStep { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("PODCAST"));
            }
            other => panic!("Expected InvalidStep, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_types_are_rejected() {
        let reply = r#"{"title":"X","description":"d","steps":[
            {"title":"a","description":"b","type":"VIDEO","duration":"1h","isPro":"yes"}
        ]}"#;
        let err = parse_path_response(reply).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidStep { index: 0, .. }));

        let reply = r#"{"title":"X","description":"d","steps":[
            {"title":"a","type":"VIDEO","duration":"1h","isPro":true}
        ]}"#;
        match parse_path_response(reply) {
            Err(GenerationError::InvalidStep { reason, .. }) => {
                assert!(reason.contains("description"))
            }
            other => panic!("Expected InvalidStep, got {other:?}"),
        }

        let err =
            parse_path_response(r#"{"title":"X","description":"d","steps":[42]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidStep { index: 0, .. }));
    }

    #[test]
    fn accepted_path_is_passed_through_unmodified() {
        let reply = r#"{"title":"Data Path","description":"Go","steps":[
            {"title":"SQL Deep Dive","description":"joins","type":"INTERACTIVE","duration":"3 HOURS","isPro":true},
            {"title":"Mentor chat","description":"talk","type":"MENTORSHIP","duration":"45 minutes","isPro":true}
        ]}"#;
        let path = parse_path_response(reply).unwrap();
        assert_eq!(path.steps.len(), 2);
        assert_eq!(path.steps[0].duration, "3 HOURS");
        assert_eq!(path.steps[1].kind, StepKind::Mentorship);
        assert_eq!(path.pro_step_count(), 2);
    }
}
