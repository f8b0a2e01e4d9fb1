use crate::components::scheduler::{DirectScheduler, ScheduleRequest, ScheduleResponse, Scheduler};
use crate::error::{agent_error, Error};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Arguments the model passes to the calendar tool
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarCreatorArgs {
    /// The scheduling request in natural language
    pub input_text: String,
}

/// The one tool registered with the agent: create an event from text
#[derive(Clone)]
pub struct CalendarCreator {
    scheduler: Arc<DirectScheduler>,
}

impl CalendarCreator {
    pub fn new(scheduler: Arc<DirectScheduler>) -> Self {
        Self { scheduler }
    }
}

impl Tool for CalendarCreator {
    const NAME: &'static str = "calendar_creator";

    type Error = Error;
    type Args = CalendarCreatorArgs;
    type Output = ScheduleResponse;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Creates calendar events".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "input_text": {
                        "type": "string",
                        "description": "The scheduling request, including the event title and when it happens"
                    }
                },
                "required": ["input_text"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        info!("Agent invoked {} with {:?}", Self::NAME, args.input_text);

        let scheduler = Arc::clone(&self.scheduler);
        let request = ScheduleRequest::new(args.input_text);

        // Runs on its own task so the returned future stays Sync
        tokio::spawn(async move { scheduler.schedule(&request).await })
            .await
            .map_err(|e| agent_error(&format!("Calendar tool task failed: {}", e)))?
    }
}
