use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::ParamValue;

/// One applied parameter mutation. Append-only; written exactly once per
/// successful update and never touched again.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub id: String,
    pub agent_id: String,
    pub parameter: String,
    pub old_value: ParamValue,
    pub new_value: ParamValue,
    pub reason: String,
    pub actor: String,
    pub changed_at: DateTime<Utc>,
}

impl ChangeRecord {
    pub fn new(
        agent_id: &str,
        parameter: &str,
        old_value: ParamValue,
        new_value: ParamValue,
        reason: &str,
        actor: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            parameter: parameter.to_string(),
            old_value,
            new_value,
            reason: reason.to_string(),
            actor: actor.to_string(),
            changed_at: Utc::now(),
        }
    }
}

/// One chat round trip through the conversational adapter. Logged on the
/// success and the fallback path alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: String,
    pub agent_id: String,
    pub actor: String,
    pub user_message: String,
    pub agent_response: String,
    pub action_taken: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatExchange {
    pub fn new(
        agent_id: &str,
        actor: &str,
        user_message: &str,
        agent_response: &str,
        action_taken: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            actor: actor.to_string(),
            user_message: user_message.to_string(),
            agent_response: agent_response.to_string(),
            action_taken,
            created_at: Utc::now(),
        }
    }
}

/// A point-in-time performance sample. Fire-and-forget; nothing in the
/// control plane reads these back except the metrics listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSample {
    pub id: String,
    pub agent_id: String,
    pub execution_time_ms: f64,
    pub accuracy: Option<f64>,
    pub call_count: i64,
    pub impact_score: u8,
    pub recorded_at: DateTime<Utc>,
}
