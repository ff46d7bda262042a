//! Questionnaire steps and the transitions allowed between them.

use serde::{Deserialize, Serialize};

/// The screens of the questionnaire.
///
/// Progresses Intro → UserInfo → Skills → Generating → Result, with
/// Skills → UserInfo (back), Generating → Skills (failure) and
/// Result → Intro (reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowStep {
    Intro,
    UserInfo,
    Skills,
    Generating,
    Result,
}

impl FlowStep {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Reset is handled separately by the machine since it is allowed from
    /// every step.
    pub fn can_transition_to(&self, target: FlowStep) -> bool {
        use FlowStep::*;
        matches!(
            (self, target),
            (Intro, UserInfo)
                | (UserInfo, Skills)
                | (Skills, UserInfo)
                | (Skills, Generating)
                | (Generating, Result)
                | (Generating, Skills)
                | (Result, Intro)
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Generating)
    }
}

impl Default for FlowStep {
    fn default() -> Self {
        Self::Intro
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::UserInfo => "userInfo",
            Self::Skills => "skills",
            Self::Generating => "generating",
            Self::Result => "result",
        };
        write!(f, "{s}")
    }
}
