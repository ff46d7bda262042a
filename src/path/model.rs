//! Profile and learning-path data models.

use serde::{Deserialize, Serialize};

use crate::flow::skills::SkillSet;

/// What the user told us about themselves during the questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub current_role: String,
    pub career_goal: String,
    #[serde(default)]
    pub skills: SkillSet,
}

impl UserProfile {
    /// Whether the three free-text fields are all filled in.
    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.current_role, &self.career_goal]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// The kind of content a learning step points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepKind {
    Video,
    Text,
    Interactive,
    Project,
    Mentorship,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        Self::Video,
        Self::Text,
        Self::Interactive,
        Self::Project,
        Self::Mentorship,
    ];

    /// Wire name used in the output schema and the service reply.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "VIDEO",
            Self::Text => "TEXT",
            Self::Interactive => "INTERACTIVE",
            Self::Project => "PROJECT",
            Self::Mentorship => "MENTORSHIP",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::Text => "text",
            Self::Interactive => "interactive",
            Self::Project => "project",
            Self::Mentorship => "mentorship",
        };
        write!(f, "{s}")
    }
}

/// One unit of a learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStep {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Free-text estimate such as "45 minutes".
    pub duration: String,
    /// Premium content marker. Informational only.
    pub is_pro: bool,
}

/// A curriculum returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub title: String,
    pub description: String,
    pub steps: Vec<LearningStep>,
}

impl LearningPath {
    pub fn pro_step_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_pro).count()
    }
}
