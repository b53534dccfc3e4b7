use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::AlgorithmAgent;
use crate::audit::ChatExchange;
use crate::database::ControlDatabase;

/// Narrow seam to the external language-model service, injected so the
/// adapter's control flow is testable without a live network dependency.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_message: &str) -> anyhow::Result<String>;
}

/// Returned verbatim whenever the model call fails or times out. Chat
/// callers never see an error.
pub const FALLBACK_MESSAGE: &str =
    "I couldn't reach my language model just now, so I can't answer that yet. \
     No parameters were changed; please try again in a moment.";

const SYSTEM_INSTRUCTION: &str =
    "You are the tuning assistant for one platform algorithm. Answer questions \
     about how the algorithm behaves and what its parameters do, using only the \
     configuration context below. You cannot change parameters yourself; when an \
     operator wants a change, spell out the exact parameter name and value they \
     should apply. If you recommend a concrete change, you may include it in an \
     optional action_taken field. Respond with JSON of the form \
     {\"message\": \"...\", \"action_taken\": null} and nothing else.";

/// What the chat surface returns. Mirrors the exchange that was logged.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    message: String,
    #[serde(default)]
    action_taken: Option<String>,
}

/// Bridges free-text requests to parameter-aware responses.
///
/// The adapter only narrates: it never mutates configuration. Every round
/// trip is recorded as a chat exchange, on the fallback path too.
pub struct ChatAdapter {
    model: Box<dyn LanguageModel>,
    db: Arc<ControlDatabase>,
}

impl ChatAdapter {
    pub fn new(model: Box<dyn LanguageModel>, db: Arc<ControlDatabase>) -> Self {
        Self { model, db }
    }

    pub async fn chat(&self, agent: &AlgorithmAgent, user_message: &str, actor: &str) -> ChatReply {
        let system_prompt = Self::build_context(agent);

        let (message, action_taken) = match self.model.generate(&system_prompt, user_message).await
        {
            Ok(raw) => parse_reply(&raw),
            Err(error) => {
                tracing::warn!("Chat generation failed for agent {}: {}", agent.id(), error);
                (FALLBACK_MESSAGE.to_string(), None)
            }
        };

        let exchange = ChatExchange::new(
            agent.id(),
            actor,
            user_message,
            &message,
            action_taken.clone(),
        );
        if let Err(error) = self.db.append_chat_exchange(&exchange) {
            tracing::warn!(
                "Failed to record chat exchange for agent {}: {}",
                agent.id(),
                error
            );
        }

        ChatReply {
            message,
            action_taken,
        }
    }

    /// Chat history for one agent, most recent first.
    pub fn history(&self, agent_id: &str, limit: usize) -> anyhow::Result<Vec<ChatExchange>> {
        self.db.chat_history(agent_id, limit)
    }

    fn build_context(agent: &AlgorithmAgent) -> String {
        let mut context = format!(
            "{}\n\n## Algorithm\n{} ({}): {}\n\n## How it currently works\n{}\n\n## Parameters\n",
            SYSTEM_INSTRUCTION,
            agent.name(),
            agent.id(),
            agent.spec().description,
            agent.explain(),
        );

        match agent.parameters() {
            Ok(params) => {
                for param in params {
                    context.push_str(&format!(
                        "- {} ({}): current {}, default {}. {} Impact: {}\n",
                        param.name,
                        param.kind.as_db_str(),
                        param.current_value,
                        param.default_value,
                        param.description,
                        param.impact_note,
                    ));
                }
            }
            Err(error) => {
                tracing::warn!(
                    "Could not list parameters for chat context of {}: {}",
                    agent.id(),
                    error
                );
            }
        }

        context
    }
}

/// The model is asked for a JSON envelope but smaller models routinely
/// reply with prose; treat anything unparseable as a plain message.
fn parse_reply(raw: &str) -> (String, Option<String>) {
    if let Ok(envelope) = serde_json::from_str::<ReplyEnvelope>(raw.trim()) {
        return (envelope.message, envelope.action_taken);
    }
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(envelope) = serde_json::from_str::<ReplyEnvelope>(&raw[start..=end]) {
                return (envelope.message, envelope.action_taken);
            }
        }
    }
    (raw.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentSpec, AlgorithmType};
    use crate::value::ParameterSpec;
    use std::path::PathBuf;
    use std::sync::Mutex;

    enum Script {
        Plain(String),
        Envelope(String),
        Fail,
    }

    struct ScriptedModel {
        script: Script,
        seen_system_prompt: Mutex<Option<String>>,
    }

    impl ScriptedModel {
        fn new(script: Script) -> Self {
            Self {
                script,
                seen_system_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(
            &self,
            system_prompt: &str,
            _user_message: &str,
        ) -> anyhow::Result<String> {
            *self.seen_system_prompt.lock().expect("lock") = Some(system_prompt.to_string());
            match &self.script {
                Script::Plain(text) => Ok(text.clone()),
                Script::Envelope(json) => Ok(json.clone()),
                Script::Fail => anyhow::bail!("connection refused"),
            }
        }
    }

    fn temp_db_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tiller_{}_{}.db", name, uuid::Uuid::new_v4()));
        path
    }

    fn sample_agent(db: Arc<ControlDatabase>) -> AlgorithmAgent {
        let spec = AgentSpec::new("A1", "Memories Feed", AlgorithmType::Ranking, 92)
            .description("Ranks memories for the home feed")
            .explain("The inclusion threshold is {threshold}.")
            .param(ParameterSpec::number(
                "threshold",
                0.7,
                0.3,
                0.95,
                "Score cutoff for inclusion",
                "Raising it narrows the feed",
            ));
        let agent = AlgorithmAgent::new(spec, db);
        agent.initialize().expect("initialize");
        agent
    }

    #[tokio::test]
    async fn successful_chat_is_answered_and_logged() {
        let path = temp_db_path("chat_ok");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        let agent = sample_agent(Arc::clone(&db));
        let adapter = ChatAdapter::new(
            Box::new(ScriptedModel::new(Script::Plain(
                "The threshold controls feed length.".to_string(),
            ))),
            Arc::clone(&db),
        );

        let reply = adapter.chat(&agent, "What does threshold do?", "admin1").await;
        assert_eq!(reply.message, "The threshold controls feed length.");
        assert_eq!(reply.action_taken, None);

        let history = adapter.history("A1", 10).expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_message, "What does threshold do?");
        assert_eq!(history[0].agent_response, reply.message);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn model_failure_returns_fallback_and_still_logs() {
        let path = temp_db_path("chat_fallback");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        let agent = sample_agent(Arc::clone(&db));
        let adapter = ChatAdapter::new(
            Box::new(ScriptedModel::new(Script::Fail)),
            Arc::clone(&db),
        );

        let reply = adapter.chat(&agent, "Anyone home?", "admin1").await;
        assert_eq!(reply.message, FALLBACK_MESSAGE);

        let history = adapter.history("A1", 10).expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].agent_response, FALLBACK_MESSAGE);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn json_envelope_carries_action_taken() {
        let path = temp_db_path("chat_envelope");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        let agent = sample_agent(Arc::clone(&db));
        let adapter = ChatAdapter::new(
            Box::new(ScriptedModel::new(Script::Envelope(
                r#"{"message": "Set threshold to 0.8.", "action_taken": "recommended threshold=0.8"}"#
                    .to_string(),
            ))),
            Arc::clone(&db),
        );

        let reply = adapter.chat(&agent, "Tighten the feed please", "admin1").await;
        assert_eq!(reply.message, "Set threshold to 0.8.");
        assert_eq!(
            reply.action_taken.as_deref(),
            Some("recommended threshold=0.8")
        );

        let history = adapter.history("A1", 10).expect("history");
        assert_eq!(
            history[0].action_taken.as_deref(),
            Some("recommended threshold=0.8")
        );

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn context_includes_explanation_and_parameter_table() {
        let path = temp_db_path("chat_context");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        let agent = sample_agent(Arc::clone(&db));
        let model = ScriptedModel::new(Script::Plain("ok".to_string()));
        let seen = Arc::new(model);
        // Box a thin forwarder so we keep a handle on the scripted model.
        struct Forward(Arc<ScriptedModel>);
        #[async_trait]
        impl LanguageModel for Forward {
            async fn generate(&self, system: &str, user: &str) -> anyhow::Result<String> {
                self.0.generate(system, user).await
            }
        }
        let adapter = ChatAdapter::new(Box::new(Forward(Arc::clone(&seen))), Arc::clone(&db));

        adapter.chat(&agent, "hello", "admin1").await;
        let prompt = seen
            .seen_system_prompt
            .lock()
            .expect("lock")
            .clone()
            .expect("prompt captured");
        assert!(prompt.contains("The inclusion threshold is 0.7."));
        assert!(prompt.contains("- threshold (number): current 0.7, default 0.7."));
        assert!(prompt.contains("Memories Feed (A1)"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn prose_with_embedded_json_parses_the_envelope() {
        let (message, action) =
            parse_reply("Here you go:\n{\"message\": \"Done.\", \"action_taken\": null}");
        assert_eq!(message, "Done.");
        assert_eq!(action, None);

        let (plain, action) = parse_reply("Just a plain sentence.");
        assert_eq!(plain, "Just a plain sentence.");
        assert_eq!(action, None);
    }
}
