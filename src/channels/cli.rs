//! CLI channel: walks the questionnaire on a line-oriented terminal.

use std::sync::Arc;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

use crate::dashboard::{DASHBOARD, render_text};
use crate::error::FlowError;
use crate::flow::loader::spawn_status_ticker;
use crate::flow::skills::numbered_skills;
use crate::flow::{FlowSession, FlowSnapshot, FlowStep, ProfileUpdate, SKILL_CATALOG};

const QUIT: &str = "/quit";

/// Terminal front end over a shared `FlowSession`.
pub struct CliWalkthrough {
    session: Arc<FlowSession>,
    /// Print the rotating loader text while generating.
    show_loader: bool,
}

impl CliWalkthrough {
    pub fn new(session: Arc<FlowSession>) -> Self {
        Self {
            session,
            show_loader: true,
        }
    }

    pub fn without_loader(mut self) -> Self {
        self.show_loader = false;
        self
    }

    /// Run until `/quit` or end of input.
    pub async fn run<R, W>(&self, reader: R, mut out: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let mut lines = std::pin::pin!(line_stream(reader));

        let snapshot = self.session.snapshot().await;
        out.write_all(render(&snapshot).as_bytes()).await?;
        out.flush().await?;

        while let Some(line) = lines.next().await {
            let line = line?;
            let line = line.trim();
            if line == QUIT {
                break;
            }
            if line.eq_ignore_ascii_case("dashboard")
                && self.session.snapshot().await.step == FlowStep::Intro
            {
                out.write_all(render_text(&DASHBOARD).as_bytes()).await?;
                out.write_all(b"\n> ").await?;
                out.flush().await?;
                continue;
            }

            let snapshot = self.handle(line).await;
            out.write_all(render(&snapshot).as_bytes()).await?;
            out.flush().await?;
        }

        Ok(())
    }

    async fn handle(&self, line: &str) -> FlowSnapshot {
        let current = self.session.snapshot().await;
        let result = match current.step {
            FlowStep::Intro => self.on_intro(line).await,
            FlowStep::UserInfo => self.on_user_info(line, &current).await,
            FlowStep::Skills => self.on_skills(line).await,
            // Submit blocks until generation finishes, so input never
            // arrives in this step.
            FlowStep::Generating => Ok(current),
            FlowStep::Result => self.on_result(line).await,
        };

        match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                let mut snapshot = self.session.snapshot().await;
                if snapshot.error.is_none() {
                    snapshot.error = Some(err.to_string());
                }
                snapshot
            }
        }
    }

    async fn on_intro(&self, _line: &str) -> Result<FlowSnapshot, FlowError> {
        self.session.start().await
    }

    /// Fill the first empty field with `line`, then continue once all three
    /// are present.
    async fn on_user_info(
        &self,
        line: &str,
        current: &FlowSnapshot,
    ) -> Result<FlowSnapshot, FlowError> {
        if line.is_empty() {
            return Ok(current.clone());
        }
        let value = Some(line.to_string());
        let profile = &current.profile;
        let update = if profile.name.trim().is_empty() {
            ProfileUpdate {
                name: value,
                ..Default::default()
            }
        } else if profile.current_role.trim().is_empty() {
            ProfileUpdate {
                current_role: value,
                ..Default::default()
            }
        } else {
            ProfileUpdate {
                career_goal: value,
                ..Default::default()
            }
        };

        let snapshot = self.session.update_profile(update).await?;
        if snapshot.profile.has_required_fields() {
            self.session.next().await
        } else {
            Ok(snapshot)
        }
    }

    async fn on_skills(&self, line: &str) -> Result<FlowSnapshot, FlowError> {
        match line {
            "" => Ok(self.session.snapshot().await),
            "/back" => self.session.back().await,
            "/done" => self.submit().await,
            _ => {
                let catalog = numbered_skills();
                let mut skills = Vec::new();
                for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let skill = match token.parse::<usize>() {
                        Ok(number) => number
                            .checked_sub(1)
                            .and_then(|i| catalog.get(i).copied())
                            .ok_or(FlowError::SkillNumberOutOfRange {
                                number,
                                total: catalog.len(),
                            })?,
                        Err(_) => token,
                    };
                    skills.push(skill);
                }

                let mut snapshot = self.session.snapshot().await;
                for skill in skills {
                    snapshot = self.session.toggle_skill(skill).await?;
                }
                Ok(snapshot)
            }
        }
    }

    async fn submit(&self) -> Result<FlowSnapshot, FlowError> {
        let (stop_tx, stop_rx) = watch::channel(false);
        let ticker = self
            .show_loader
            .then(|| spawn_status_ticker(stop_rx, |msg| eprintln!("⏳ {msg}")));

        let result = self.session.submit().await.map(|(_, snapshot)| snapshot);

        let _ = stop_tx.send(true);
        if let Some(ticker) = ticker {
            let _ = ticker.await;
        }
        result
    }

    async fn on_result(&self, line: &str) -> Result<FlowSnapshot, FlowError> {
        if line.eq_ignore_ascii_case("reset") || line == "/reset" {
            return Ok(self.session.reset().await);
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 => self.session.toggle_step(n - 1).await,
            Ok(_) => Err(FlowError::StepOutOfRange {
                index: 0,
                total: self.session.snapshot().await.path.map_or(0, |p| p.steps.len()),
            }),
            Err(_) => Ok(self.session.snapshot().await),
        }
    }
}

fn line_stream<R>(reader: R) -> impl Stream<Item = std::io::Result<String>>
where
    R: AsyncBufRead + Unpin + Send,
{
    stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading input: {}", e);
                Some((Err(e), lines))
            }
        }
    })
}

/// Render the current screen as plain text.
pub fn render(snapshot: &FlowSnapshot) -> String {
    let mut out = Vec::new();

    match snapshot.step {
        FlowStep::Intro => {
            out.push("Your AI-Powered Career Co-Pilot".to_string());
            out.push(
                "Navigate your professional journey with a personalized upskilling plan, \
                 tailored to market trends and your unique goals."
                    .to_string(),
            );
            out.push(String::new());
            out.push(
                "Press Enter to create your free plan, 'dashboard' for team analytics, /quit to exit."
                    .to_string(),
            );
        }
        FlowStep::UserInfo => {
            out.push("Tell Us About Yourself".to_string());
            let p = &snapshot.profile;
            let prompt = if p.name.trim().is_empty() {
                "What's your name?"
            } else if p.current_role.trim().is_empty() {
                "Your current role (e.g., Graphic Designer)?"
            } else {
                "Your dream role (e.g., UX Lead)?"
            };
            if let Some(err) = &snapshot.error {
                out.push(format!("! {err}"));
            }
            out.push(prompt.to_string());
        }
        FlowStep::Skills => {
            out.push("What are you good at?".to_string());
            if let Some(err) = &snapshot.error {
                out.push(format!("! {err}"));
            }
            let mut n = 0;
            for category in SKILL_CATALOG {
                out.push(format!("{}:", category.name));
                for skill in category.skills {
                    n += 1;
                    let mark = if snapshot.profile.skills.contains(skill) { "x" } else { " " };
                    out.push(format!("  [{mark}] {n:>2}. {skill}"));
                }
            }
            let extra: Vec<&str> = snapshot
                .profile
                .skills
                .iter()
                .filter(|s| !crate::flow::skills::is_known_skill(s))
                .collect();
            if !extra.is_empty() {
                out.push(format!("Other: {}", extra.join(", ")));
            }
            out.push(
                "Toggle by number or name (comma separated). /done to generate, /back to edit your profile."
                    .to_string(),
            );
        }
        FlowStep::Generating => {
            out.push(snapshot.status_message.unwrap_or("Generating...").to_string());
        }
        FlowStep::Result => {
            if let Some(path) = &snapshot.path {
                out.push("Your Personalized Path".to_string());
                out.push(path.title.clone());
                if let Some(greeting) = &snapshot.greeting {
                    out.push(greeting.clone());
                }
                out.push(path.description.clone());
                out.push(format!("Progress: {}%", snapshot.progress));
                for (i, step) in path.steps.iter().enumerate() {
                    let mark = if snapshot.completed_steps.contains(&i) { "x" } else { " " };
                    let pro = if step.is_pro { " [Pro]" } else { "" };
                    out.push(format!(
                        "  [{mark}] {}. {} ({}, {}){pro}",
                        i + 1,
                        step.title,
                        step.kind,
                        step.duration
                    ));
                    out.push(format!("        {}", step.description));
                }
            } else {
                out.push("Something went wrong.".to_string());
            }
            if let Some(err) = &snapshot.error {
                out.push(format!("! {err}"));
            }
            out.push("Enter a step number to toggle it, 'reset' to start a new plan.".to_string());
        }
    }

    out.push(String::from("> "));
    out.join("\n")
}
