//! FlowSession: shares one questionnaire between surfaces and runs the
//! generation call for it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::{FlowError, GenerationError, LlmError};
use crate::path::generator::PathGenerator;

use super::machine::{Applied, FlowSnapshot, GenerationTicket, ProfileUpdate, Questionnaire};

/// A single user's questionnaire plus the generator it submits to.
///
/// The lock is never held across the generation call, so reads (and a
/// reset) stay responsive while a request is outstanding.
pub struct FlowSession {
    flow: RwLock<Questionnaire>,
    generator: PathGenerator,
}

impl FlowSession {
    pub fn new(generator: PathGenerator) -> Arc<Self> {
        Arc::new(Self {
            flow: RwLock::new(Questionnaire::new()),
            generator,
        })
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.flow.read().await.snapshot()
    }

    async fn apply<T>(
        &self,
        action: impl FnOnce(&mut Questionnaire) -> Result<T, FlowError>,
    ) -> Result<FlowSnapshot, FlowError> {
        let mut flow = self.flow.write().await;
        action(&mut *flow)?;
        Ok(flow.snapshot())
    }

    pub async fn start(&self) -> Result<FlowSnapshot, FlowError> {
        self.apply(Questionnaire::start).await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<FlowSnapshot, FlowError> {
        self.apply(|flow| flow.update_profile(update)).await
    }

    pub async fn next(&self) -> Result<FlowSnapshot, FlowError> {
        self.apply(Questionnaire::next).await
    }

    pub async fn back(&self) -> Result<FlowSnapshot, FlowError> {
        self.apply(Questionnaire::back).await
    }

    pub async fn toggle_skill(&self, skill: &str) -> Result<FlowSnapshot, FlowError> {
        self.apply(|flow| flow.toggle_skill(skill)).await
    }

    pub async fn toggle_step(&self, index: usize) -> Result<FlowSnapshot, FlowError> {
        self.apply(|flow| flow.toggle_step(index)).await
    }

    pub async fn reset(&self) -> FlowSnapshot {
        let mut flow = self.flow.write().await;
        flow.reset();
        flow.snapshot()
    }

    /// Enter `Generating` and hand out the ticket for the request.
    pub async fn begin_submit(&self) -> Result<GenerationTicket, FlowError> {
        self.flow.write().await.submit()
    }

    /// Run the generation for `ticket` and apply its outcome.
    pub async fn run_generation(&self, ticket: GenerationTicket) -> Applied {
        let outcome = self.generator.generate(&ticket.profile).await;
        let applied = self.flow.write().await.complete(&ticket, outcome);
        if applied == Applied::Stale {
            info!(request_id = ticket.request_id, "Generation finished after the flow moved on");
        }
        applied
    }

    /// Submit and wait for the generation to finish.
    ///
    /// The generation runs on its own task, so dropping the returned future
    /// (a disconnected HTTP client) still lets the flow leave `Generating`.
    pub async fn submit(self: &Arc<Self>) -> Result<(Applied, FlowSnapshot), FlowError> {
        let ticket = self.begin_submit().await?;
        let task = {
            let session = Arc::clone(self);
            let ticket = ticket.clone();
            tokio::spawn(async move { session.run_generation(ticket).await })
        };

        let applied = match task.await {
            Ok(applied) => applied,
            Err(e) => {
                error!(request_id = ticket.request_id, error = %e, "Generation task failed");
                let failure = GenerationError::Provider(LlmError::RequestFailed {
                    provider: self.generator.model_name().to_string(),
                    reason: e.to_string(),
                });
                self.flow.write().await.complete(&ticket, Err(failure))
            }
        };
        Ok((applied, self.snapshot().await))
    }
}
