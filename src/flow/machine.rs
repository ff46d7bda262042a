//! The questionnaire state machine.
//!
//! Owns the in-progress profile, the last visible error, the generated path
//! and its completion overlay. Every user action is a method that either
//! applies a transition or rejects it without touching state. Generation is
//! split in two halves (`submit` hands out a ticket, `complete` applies the
//! outcome) so the network call can happen outside any lock, and so a late
//! outcome for an abandoned request can be recognized and dropped.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FlowError, GenerationError, NO_SKILLS_MESSAGE};
use crate::path::model::{LearningPath, UserProfile};

use super::loader::status_message;
use super::progress::CompletionTracker;
use super::state::FlowStep;

/// Proof that a generation was started, carrying the profile it was started
/// for. Handed back to [`Questionnaire::complete`] with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub request_id: u64,
    pub profile: UserProfile,
}

/// What `complete` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The path was installed and the flow is in `Result`.
    Completed,
    /// The flow went back to `Skills` with the error shown.
    Failed,
    /// The ticket no longer matches the current request; nothing changed.
    Stale,
}

/// Partial edit of the free-text profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub current_role: Option<String>,
    pub career_goal: Option<String>,
}

/// Serializable view of the whole flow, for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub step: FlowStep,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<LearningPath>,
    pub completed_steps: Vec<usize>,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<&'static str>,
    pub can_continue: bool,
}

#[derive(Debug, Default)]
pub struct Questionnaire {
    step: FlowStep,
    profile: UserProfile,
    error: Option<String>,
    path: Option<LearningPath>,
    tracker: Option<CompletionTracker>,
    request_id: u64,
    generating_since: Option<Instant>,
}

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn path(&self) -> Option<&LearningPath> {
        self.path.as_ref()
    }

    pub fn tracker(&self) -> Option<&CompletionTracker> {
        self.tracker.as_ref()
    }

    /// Id of the most recent request. Bumped on submit and on reset.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    fn require(&self, step: FlowStep, action: &'static str) -> Result<(), FlowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }

    fn transition(&mut self, target: FlowStep) {
        debug_assert!(self.step.can_transition_to(target));
        debug!(from = %self.step, to = %target, "Flow transition");
        self.step = target;
    }

    /// Intro → UserInfo.
    pub fn start(&mut self) -> Result<(), FlowError> {
        self.require(FlowStep::Intro, "start")?;
        self.transition(FlowStep::UserInfo);
        Ok(())
    }

    /// Edit profile text fields. Only allowed on the user info screen.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), FlowError> {
        self.require(FlowStep::UserInfo, "edit the profile")?;
        if let Some(name) = update.name {
            self.profile.name = name;
        }
        if let Some(role) = update.current_role {
            self.profile.current_role = role;
        }
        if let Some(goal) = update.career_goal {
            self.profile.career_goal = goal;
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FlowError> {
        self.update_profile(ProfileUpdate {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    pub fn set_current_role(&mut self, role: impl Into<String>) -> Result<(), FlowError> {
        self.update_profile(ProfileUpdate {
            current_role: Some(role.into()),
            ..Default::default()
        })
    }

    pub fn set_career_goal(&mut self, goal: impl Into<String>) -> Result<(), FlowError> {
        self.update_profile(ProfileUpdate {
            career_goal: Some(goal.into()),
            ..Default::default()
        })
    }

    /// UserInfo → Skills, once name, role and goal are all filled in.
    pub fn next(&mut self) -> Result<(), FlowError> {
        self.require(FlowStep::UserInfo, "continue")?;
        if !self.profile.has_required_fields() {
            return Err(FlowError::IncompleteProfile);
        }
        self.error = None;
        self.transition(FlowStep::Skills);
        Ok(())
    }

    /// Skills → UserInfo.
    pub fn back(&mut self) -> Result<(), FlowError> {
        self.require(FlowStep::Skills, "go back")?;
        self.transition(FlowStep::UserInfo);
        Ok(())
    }

    /// Flip a skill on the skills screen. Returns whether it is now selected.
    pub fn toggle_skill(&mut self, skill: &str) -> Result<bool, FlowError> {
        self.require(FlowStep::Skills, "toggle a skill")?;
        Ok(self.profile.skills.toggle(skill))
    }

    /// Skills → Generating.
    ///
    /// Only accepted from exactly `Skills`, so at most one generation is ever
    /// outstanding. Without a selected skill the flow stays put and shows
    /// the error.
    pub fn submit(&mut self) -> Result<GenerationTicket, FlowError> {
        self.require(FlowStep::Skills, "submit")?;
        if self.profile.skills.is_empty() {
            self.error = Some(NO_SKILLS_MESSAGE.to_string());
            return Err(FlowError::NoSkillsSelected);
        }

        self.error = None;
        self.request_id += 1;
        self.generating_since = Some(Instant::now());
        self.transition(FlowStep::Generating);

        info!(
            request_id = self.request_id,
            skills = self.profile.skills.len(),
            "Learning path requested"
        );

        Ok(GenerationTicket {
            request_id: self.request_id,
            profile: self.profile.clone(),
        })
    }

    /// Apply the outcome of the generation started by `ticket`.
    pub fn complete(
        &mut self,
        ticket: &GenerationTicket,
        outcome: Result<LearningPath, GenerationError>,
    ) -> Applied {
        if ticket.request_id != self.request_id || self.step != FlowStep::Generating {
            warn!(
                request_id = ticket.request_id,
                current = self.request_id,
                step = %self.step,
                "Discarding stale generation result"
            );
            return Applied::Stale;
        }

        self.generating_since = None;
        match outcome {
            Ok(path) => {
                info!(
                    request_id = ticket.request_id,
                    steps = path.steps.len(),
                    "Learning path ready"
                );
                self.tracker = Some(CompletionTracker::for_path(&path));
                self.path = Some(path);
                self.transition(FlowStep::Result);
                Applied::Completed
            }
            Err(e) => {
                self.error = Some(e.user_message().to_string());
                self.transition(FlowStep::Skills);
                Applied::Failed
            }
        }
    }

    /// Flip completion of a step in the result view.
    pub fn toggle_step(&mut self, index: usize) -> Result<bool, FlowError> {
        self.require(FlowStep::Result, "toggle a step")?;
        let tracker = self.tracker.as_mut().ok_or(FlowError::StepOutOfRange { index, total: 0 })?;
        tracker.toggle(index)
    }

    /// Back to Intro from any step, clearing everything.
    ///
    /// Bumps the request id so an outstanding ticket can no longer complete.
    pub fn reset(&mut self) {
        if self.step.is_busy() {
            info!(request_id = self.request_id, "Reset abandons in-flight generation");
        }
        self.profile = UserProfile::default();
        self.path = None;
        self.tracker = None;
        self.error = None;
        self.generating_since = None;
        self.request_id += 1;
        self.step = FlowStep::Intro;
    }

    /// Whether the primary action of the current screen would be accepted.
    pub fn can_continue(&self) -> bool {
        match self.step {
            FlowStep::Intro | FlowStep::Result => true,
            FlowStep::UserInfo => self.profile.has_required_fields(),
            FlowStep::Skills => !self.profile.skills.is_empty(),
            FlowStep::Generating => false,
        }
    }

    fn generating_elapsed(&self) -> Option<Duration> {
        self.generating_since.map(|since| since.elapsed())
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let greeting = match (self.step, &self.path) {
            (FlowStep::Result, Some(_)) => Some(format!(
                "Here's your tailored roadmap to success, {}. Let's get started!",
                self.profile.name
            )),
            _ => None,
        };

        FlowSnapshot {
            step: self.step,
            profile: self.profile.clone(),
            error: self.error.clone(),
            path: self.path.clone(),
            completed_steps: self
                .tracker
                .as_ref()
                .map(CompletionTracker::completed_indices)
                .unwrap_or_default(),
            progress: self
                .tracker
                .as_ref()
                .map(CompletionTracker::rounded_percent)
                .unwrap_or(0),
            greeting,
            status_message: self.generating_elapsed().map(status_message),
            can_continue: self.can_continue(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FORMAT_ERROR_MESSAGE, LlmError, UNEXPECTED_ERROR_MESSAGE};
    use crate::path::model::{LearningStep, StepKind};

    fn sample_path(steps: usize) -> LearningPath {
        LearningPath {
            title: "UX Ascent".to_string(),
            description: "From designer to UX lead".to_string(),
            steps: (0..steps)
                .map(|i| LearningStep {
                    title: format!("Step {i}"),
                    description: "Learn things".to_string(),
                    kind: StepKind::Text,
                    duration: "1 hour".to_string(),
                    is_pro: false,
                })
                .collect(),
        }
    }

    fn at_skills() -> Questionnaire {
        let mut q = Questionnaire::new();
        q.start().unwrap();
        q.set_name("Ana").unwrap();
        q.set_current_role("Designer").unwrap();
        q.set_career_goal("UX Lead").unwrap();
        q.next().unwrap();
        q
    }

    fn at_result(steps: usize) -> Questionnaire {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let ticket = q.submit().unwrap();
        assert_eq!(q.complete(&ticket, Ok(sample_path(steps))), Applied::Completed);
        q
    }

    #[test]
    fn starts_at_intro() {
        let q = Questionnaire::new();
        assert_eq!(q.step(), FlowStep::Intro);
        assert!(q.error().is_none());
        assert!(q.path().is_none());
    }

    #[test]
    fn next_requires_all_three_fields() {
        let mut q = Questionnaire::new();
        q.start().unwrap();
        q.set_name("Ana").unwrap();
        q.set_current_role("Designer").unwrap();
        assert_eq!(q.next(), Err(FlowError::IncompleteProfile));
        assert_eq!(q.step(), FlowStep::UserInfo);

        q.set_career_goal("UX Lead").unwrap();
        q.next().unwrap();
        assert_eq!(q.step(), FlowStep::Skills);
    }

    #[test]
    fn back_returns_to_user_info_keeping_profile() {
        let mut q = at_skills();
        q.toggle_skill("Python").unwrap();
        q.back().unwrap();
        assert_eq!(q.step(), FlowStep::UserInfo);
        assert_eq!(q.profile().name, "Ana");
        assert!(q.profile().skills.contains("Python"));
    }

    #[test]
    fn submit_without_skills_sets_error_and_stays() {
        let mut q = at_skills();
        assert_eq!(q.submit(), Err(FlowError::NoSkillsSelected));
        assert_eq!(q.step(), FlowStep::Skills);
        assert_eq!(q.error(), Some(NO_SKILLS_MESSAGE));

        q.toggle_skill("SQL").unwrap();
        q.submit().unwrap();
        assert!(q.error().is_none(), "error clears on the next successful guard pass");
    }

    #[test]
    fn submit_carries_profile_snapshot() {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let ticket = q.submit().unwrap();
        assert_eq!(q.step(), FlowStep::Generating);
        assert_eq!(ticket.profile.career_goal, "UX Lead");
        assert_eq!(ticket.profile.skills.as_slice(), ["SQL".to_string()]);
        assert_eq!(ticket.request_id, q.request_id());
    }

    #[test]
    fn submit_rejected_outside_skills() {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let first = q.submit().unwrap();

        let err = q.submit().unwrap_err();
        assert_eq!(
            err,
            FlowError::InvalidTransition {
                step: FlowStep::Generating,
                action: "submit"
            }
        );
        assert_eq!(q.request_id(), first.request_id, "no second request started");

        let mut fresh = Questionnaire::new();
        assert!(fresh.submit().is_err());
    }

    #[test]
    fn success_lands_on_result_with_fresh_tracker() {
        let q = at_result(4);
        assert_eq!(q.step(), FlowStep::Result);
        assert_eq!(q.path().unwrap().title, "UX Ascent");
        assert_eq!(q.tracker().unwrap().completed_count(), 0);
        assert_eq!(q.tracker().unwrap().total(), 4);
    }

    #[test]
    fn failure_returns_to_skills_with_message() {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let ticket = q.submit().unwrap();
        let applied = q.complete(&ticket, Err(GenerationError::EmptyResponse));
        assert_eq!(applied, Applied::Failed);
        assert_eq!(q.step(), FlowStep::Skills);
        assert_eq!(q.error(), Some(FORMAT_ERROR_MESSAGE));

        // Immediate resubmit is allowed
        let ticket = q.submit().unwrap();
        let applied = q.complete(
            &ticket,
            Err(GenerationError::Provider(LlmError::AuthFailed {
                provider: "gemini".to_string(),
            })),
        );
        assert_eq!(applied, Applied::Failed);
        assert_eq!(q.error(), Some(UNEXPECTED_ERROR_MESSAGE));
    }

    #[test]
    fn late_result_after_reset_is_discarded() {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let ticket = q.submit().unwrap();

        q.reset();
        assert_eq!(q.complete(&ticket, Ok(sample_path(2))), Applied::Stale);
        assert_eq!(q.step(), FlowStep::Intro);
        assert!(q.path().is_none());
    }

    #[test]
    fn old_ticket_cannot_complete_a_newer_request() {
        let mut q = at_skills();
        q.toggle_skill("SQL").unwrap();
        let old = q.submit().unwrap();
        q.reset();

        q.start().unwrap();
        q.set_name("Ana").unwrap();
        q.set_current_role("Designer").unwrap();
        q.set_career_goal("UX Lead").unwrap();
        q.next().unwrap();
        q.toggle_skill("React").unwrap();
        let current = q.submit().unwrap();

        assert_eq!(q.complete(&old, Ok(sample_path(1))), Applied::Stale);
        assert_eq!(q.step(), FlowStep::Generating);
        assert_eq!(q.complete(&current, Ok(sample_path(3))), Applied::Completed);
        assert_eq!(q.path().unwrap().steps.len(), 3);
    }

    #[test]
    fn progress_in_snapshot() {
        let mut q = at_result(4);
        assert_eq!(q.toggle_step(1), Ok(true));
        let snap = q.snapshot();
        assert_eq!(snap.progress, 25);
        assert_eq!(snap.completed_steps, vec![1]);
        assert_eq!(
            snap.greeting.as_deref(),
            Some("Here's your tailored roadmap to success, Ana. Let's get started!")
        );
    }

    #[test]
    fn toggle_step_only_in_result() {
        let mut q = at_skills();
        assert!(matches!(
            q.toggle_step(0),
            Err(FlowError::InvalidTransition { .. })
        ));
        let mut q = at_result(2);
        assert_eq!(
            q.toggle_step(5),
            Err(FlowError::StepOutOfRange { index: 5, total: 2 })
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut q = at_result(4);
        q.toggle_step(0).unwrap();
        q.reset();

        assert_eq!(q.step(), FlowStep::Intro);
        assert_eq!(q.profile(), &UserProfile::default());
        assert!(q.path().is_none());
        assert!(q.tracker().is_none());
        assert!(q.error().is_none());

        // The user info guard applies again from scratch
        q.start().unwrap();
        assert_eq!(q.next(), Err(FlowError::IncompleteProfile));
        q.set_name("Ana").unwrap();
        assert_eq!(q.next(), Err(FlowError::IncompleteProfile));
        q.set_current_role("Designer").unwrap();
        assert_eq!(q.next(), Err(FlowError::IncompleteProfile));
        q.set_career_goal("UX Lead").unwrap();
        assert!(q.next().is_ok());
    }

    #[test]
    fn new_path_resets_completion() {
        let mut q = at_result(4);
        q.toggle_step(0).unwrap();
        q.toggle_step(1).unwrap();
        q.reset();

        let mut q2 = q;
        q2.start().unwrap();
        q2.update_profile(ProfileUpdate {
            name: Some("Ana".to_string()),
            current_role: Some("Designer".to_string()),
            career_goal: Some("UX Lead".to_string()),
        })
        .unwrap();
        q2.next().unwrap();
        q2.toggle_skill("SQL").unwrap();
        let ticket = q2.submit().unwrap();
        q2.complete(&ticket, Ok(sample_path(4)));
        assert_eq!(q2.snapshot().progress, 0);
    }

    #[test]
    fn profile_edits_only_on_user_info() {
        let mut q = Questionnaire::new();
        assert!(q.set_name("Ana").is_err());
        let mut q = at_skills();
        assert!(q.set_name("Bob").is_err());
        assert_eq!(q.profile().name, "Ana");
    }

    #[test]
    fn snapshot_shows_loader_text_while_generating() {
        let mut q = at_skills();
        assert!(!q.snapshot().can_continue);
        q.toggle_skill("SQL").unwrap();
        assert!(q.snapshot().can_continue);
        q.submit().unwrap();

        let snap = q.snapshot();
        assert_eq!(snap.step, FlowStep::Generating);
        assert!(snap.status_message.is_some());
        assert!(!snap.can_continue);
    }
}
