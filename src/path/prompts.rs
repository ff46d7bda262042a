//! Prompt text and output schema for learning-path generation.

use crate::path::model::{StepKind, UserProfile};

/// Build the instruction sent to the generation service.
pub fn build_prompt(profile: &UserProfile) -> String {
    format!(
        "\
Analyze the following user profile and generate a personalized upskilling learning path based on current job market trends.
The user wants to transition from their current role to their desired career goal.
The path should be broken down into clear, actionable steps with various content types.
Some steps, especially advanced ones like real-world projects or mentorship, should be marked as 'Pro' content.

User Profile:
- Current Role: {role}
- Career Goal: {goal}
- Existing Skills: {skills}

Generate a response in JSON format that strictly follows the provided schema.
The learning path should be realistic and highly relevant to achieving the user's career goal.
Ensure the descriptions are concise and motivational.",
        role = profile.current_role,
        goal = profile.career_goal,
        skills = profile.skills.join(", "),
    )
}

/// Output schema declared to the service, in its OpenAPI-subset dialect.
pub fn response_schema() -> serde_json::Value {
    let kinds: Vec<&str> = StepKind::ALL.iter().map(StepKind::as_str).collect();

    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A catchy and encouraging title for the personalized learning path."
            },
            "description": {
                "type": "STRING",
                "description": "A short, motivating paragraph summarizing the learning journey."
            },
            "steps": {
                "type": "ARRAY",
                "description": "A list of learning modules or steps.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "Title of the learning step."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A brief description of what the user will learn."
                        },
                        "type": {
                            "type": "STRING",
                            "enum": kinds,
                            "description": "The type of content for this step."
                        },
                        "duration": {
                            "type": "STRING",
                            "description": "Estimated time to complete this step, e.g., '45 minutes' or '3 hours'."
                        },
                        "isPro": {
                            "type": "BOOLEAN",
                            "description": "Set to true for advanced topics, projects, or mentorship sessions that would be part of a premium subscription."
                        }
                    },
                    "required": ["title", "description", "type", "duration", "isPro"]
                }
            }
        },
        "required": ["title", "description", "steps"]
    })
}
