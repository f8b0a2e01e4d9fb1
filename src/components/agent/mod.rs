//! LLM agent path for create requests.
//!
//! The agent is built once at startup and handed to the HTTP state; it has a
//! single tool registered that runs the direct extractor-and-calendar path.

mod tool;

pub use tool::{CalendarCreator, CalendarCreatorArgs};

use crate::components::scheduler::{DirectScheduler, ScheduleRequest, ScheduleResponse, Scheduler};
use crate::error::{agent_error, ServiceResult};
use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::openai;
use std::sync::Arc;
use tracing::info;

const PREAMBLE: &str = "You are a calendar assistant. When the user asks to schedule, set, create or add an event, \
call the calendar_creator tool exactly once, passing the user's request unchanged as input_text. \
If the request is not about creating a calendar event, answer briefly without calling the tool.";

/// Scheduler that lets an LLM agent decide whether to call the calendar tool
pub struct AgentScheduler {
    agent: Agent<openai::CompletionModel>,
    model: String,
}

impl AgentScheduler {
    /// Build the agent with the calendar tool registered
    pub fn new(api_key: &str, model: &str, direct: Arc<DirectScheduler>) -> Self {
        let client = openai::Client::new(api_key);

        let agent = client
            .agent(model)
            .preamble(PREAMBLE)
            .temperature(0.0)
            .tool(CalendarCreator::new(direct))
            .build();

        Self {
            agent,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Scheduler for AgentScheduler {
    async fn schedule(&self, request: &ScheduleRequest) -> ServiceResult<ScheduleResponse> {
        info!("Routing request through agent ({})", self.model);

        let output = self
            .agent
            .prompt(request.user_input.clone())
            .await
            .map_err(|e| agent_error(&format!("Agent request failed: {}", e)))?;

        Ok(ScheduleResponse::from_agent_output(&output))
    }
}
