//! Tiller: a control plane for the platform's algorithm agents.
//!
//! Every tunable algorithm on the platform (feed ranking, friend
//! recommendations, fraud scoring, ...) is declared as an agent with a
//! typed, constrained parameter set. The control plane validates and
//! applies parameter changes, keeps an append-only changelog with actor
//! and reason, previews proposed changes without touching live state,
//! and answers operator questions through a language-model adapter.

pub mod agent;
pub mod audit;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod llm_client;
pub mod registry;
pub mod simulation;
pub mod value;

pub use agent::directory::{AgentDirectory, InitReport, InitStatus};
pub use agent::{AgentSpec, AlgorithmAgent, AlgorithmType};
pub use audit::{ChangeRecord, ChatExchange, MetricsSample};
pub use chat::{ChatAdapter, ChatReply, LanguageModel};
pub use config::ControlConfig;
pub use database::ControlDatabase;
pub use error::ControlError;
pub use llm_client::LlmClient;
pub use registry::ParameterRegistry;
pub use simulation::SimulationResult;
pub use value::{Constraint, ParamKind, ParamValue, Parameter, ParameterSpec};
