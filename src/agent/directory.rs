use std::sync::Arc;

use serde::Serialize;

use crate::agent::{catalog, AgentSpec, AlgorithmAgent};
use crate::database::ControlDatabase;
use crate::error::ControlError;

/// Outcome of one agent's bootstrap, for the initialize-all report.
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub id: String,
    pub status: InitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStatus {
    Initialized,
    Error,
}

/// Process-wide map from agent identity to its single instance.
///
/// Built once at startup from the declarative catalog and immutable
/// afterwards; there is no runtime registration, so lookups need no
/// locking.
pub struct AgentDirectory {
    agents: Vec<Arc<AlgorithmAgent>>,
}

impl AgentDirectory {
    /// Construct a directory from explicit declarations. Rejects
    /// duplicate ids so the compiled-in table stays a bijection.
    pub fn build(db: Arc<ControlDatabase>, specs: Vec<AgentSpec>) -> anyhow::Result<Self> {
        let mut agents: Vec<Arc<AlgorithmAgent>> = Vec::with_capacity(specs.len());
        for spec in specs {
            if agents.iter().any(|a| a.id() == spec.id) {
                anyhow::bail!("duplicate agent id in declaration table: {}", spec.id);
            }
            agents.push(Arc::new(AlgorithmAgent::new(spec, Arc::clone(&db))));
        }
        Ok(Self { agents })
    }

    /// The standard directory over the full platform roster.
    pub fn bootstrap(db: Arc<ControlDatabase>) -> anyhow::Result<Self> {
        Self::build(db, catalog::specs())
    }

    pub fn resolve(&self, id: &str) -> Result<&Arc<AlgorithmAgent>, ControlError> {
        self.agents
            .iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| ControlError::AgentNotFound(id.to_string()))
    }

    /// Roster order, as declared.
    pub fn agents(&self) -> &[Arc<AlgorithmAgent>] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Initialize every registered agent, continuing past individual
    /// failures, and report each outcome. Safe to run on every deploy.
    pub fn initialize_all(&self) -> Vec<InitReport> {
        self.agents
            .iter()
            .map(|agent| match agent.initialize() {
                Ok(()) => InitReport {
                    id: agent.id().to_string(),
                    status: InitStatus::Initialized,
                    error: None,
                },
                Err(error) => {
                    tracing::error!("Failed to initialize agent {}: {}", agent.id(), error);
                    InitReport {
                        id: agent.id().to_string(),
                        status: InitStatus::Error,
                        error: Some(error.to_string()),
                    }
                }
            })
            .collect()
    }
}
