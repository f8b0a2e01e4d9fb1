use crate::components::google_calendar::CreatedEvent;
use serde::{Deserialize, Serialize};

/// Error message returned when no time could be resolved
pub const PARSE_FAILURE_MESSAGE: &str = "Couldn't parse date/time";

/// Raw scheduling text supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub user_input: String,
}

impl ScheduleRequest {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
        }
    }
}

/// Outcome of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleResponse {
    /// The event was created remotely
    Created(CreatedEvent),
    /// Nothing was created
    Failed { error: String },
    /// Free-text answer from the agent
    Message(String),
}

impl ScheduleResponse {
    /// The time phrase could not be resolved
    pub fn parse_failure() -> Self {
        ScheduleResponse::Failed {
            error: PARSE_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Interpret agent output, which is either a serialized tool result or text
    pub fn from_agent_output(output: &str) -> Self {
        match serde_json::from_str::<ScheduleResponse>(output.trim()) {
            Ok(response) => response,
            Err(_) => ScheduleResponse::Message(output.to_string()),
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ScheduleResponse::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_shapes() {
        let created = ScheduleResponse::Created(CreatedEvent {
            title: "Team Sync".to_string(),
            date: "2026-10-17T15:00:00Z".to_string(),
            id: "evt1".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({ "title": "Team Sync", "date": "2026-10-17T15:00:00Z", "id": "evt1" })
        );

        assert_eq!(
            serde_json::to_value(ScheduleResponse::parse_failure()).unwrap(),
            json!({ "error": "Couldn't parse date/time" })
        );

        assert_eq!(
            serde_json::to_value(ScheduleResponse::Message("Done".to_string())).unwrap(),
            json!("Done")
        );
    }

    #[test]
    fn test_from_agent_output() {
        let tool_output = r#"{"title":"Retro","date":"2026-10-17T10:00:00Z","id":"x1"}"#;
        assert!(ScheduleResponse::from_agent_output(tool_output).is_created());

        assert_eq!(
            ScheduleResponse::from_agent_output(r#"{"error":"Couldn't parse date/time"}"#),
            ScheduleResponse::parse_failure()
        );

        assert_eq!(
            ScheduleResponse::from_agent_output("I need a date to schedule that."),
            ScheduleResponse::Message("I need a date to schedule that.".to_string())
        );
    }
}
