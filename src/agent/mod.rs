pub mod catalog;
pub mod directory;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::audit::{ChangeRecord, MetricsSample};
use crate::database::ControlDatabase;
use crate::error::ControlError;
use crate::registry::ParameterRegistry;
use crate::simulation::{self, SimulationResult};
use crate::value::{ParamValue, Parameter, ParameterSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmType {
    Scoring,
    Ranking,
    Recommendation,
    Optimization,
    Prediction,
}

impl AlgorithmType {
    pub fn as_db_str(self) -> &'static str {
        match self {
            AlgorithmType::Scoring => "scoring",
            AlgorithmType::Ranking => "ranking",
            AlgorithmType::Recommendation => "recommendation",
            AlgorithmType::Optimization => "optimization",
            AlgorithmType::Prediction => "prediction",
        }
    }

    pub fn from_db(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ranking" => AlgorithmType::Ranking,
            "recommendation" => AlgorithmType::Recommendation,
            "optimization" => AlgorithmType::Optimization,
            "prediction" => AlgorithmType::Prediction,
            _ => AlgorithmType::Scoring,
        }
    }
}

/// Declarative schema for one algorithm agent: identity, metadata, the
/// parameter list, and the explanation template. The whole agent roster
/// is data; one engine interprets every declaration.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub algorithm_type: AlgorithmType,
    pub source_location: String,
    /// Static declared weight (0-100) of how consequential this agent's
    /// tuning is. Not derived from live telemetry.
    pub impact_score: u8,
    /// Natural-language description of the algorithm with `{parameter}`
    /// placeholders interpolated from current values by `explain()`.
    pub explain_template: String,
    pub parameters: Vec<ParameterSpec>,
}

impl AgentSpec {
    pub fn new(id: &str, name: &str, algorithm_type: AlgorithmType, impact_score: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            algorithm_type,
            source_location: String::new(),
            impact_score,
            explain_template: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn source(mut self, source_location: &str) -> Self {
        self.source_location = source_location.to_string();
        self
    }

    pub fn explain(mut self, template: &str) -> Self {
        self.explain_template = template.to_string();
        self
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }
}

/// Wiring into the live algorithm an agent configures. Invoked after a
/// change has been persisted and audited.
pub type ApplyHook = Box<dyn Fn(&str, &ParamValue) + Send + Sync>;

/// The unit callers address: owns one parameter registry and drives every
/// mutation through the validate -> apply -> persist -> audit sequence.
pub struct AlgorithmAgent {
    spec: AgentSpec,
    registry: Mutex<ParameterRegistry>,
    db: Arc<ControlDatabase>,
    apply_hook: Option<ApplyHook>,
}

impl std::fmt::Debug for AlgorithmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmAgent")
            .field("spec", &self.spec)
            .field("apply_hook", &self.apply_hook.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl AlgorithmAgent {
    pub fn new(spec: AgentSpec, db: Arc<ControlDatabase>) -> Self {
        let registry = ParameterRegistry::from_specs(&spec.parameters);
        Self {
            spec,
            registry: Mutex::new(registry),
            db,
            apply_hook: None,
        }
    }

    pub fn with_apply_hook(mut self, hook: ApplyHook) -> Self {
        self.apply_hook = Some(hook);
        self
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    fn lock_registry(&self) -> Result<MutexGuard<'_, ParameterRegistry>, ControlError> {
        self.registry.lock().map_err(|e| {
            ControlError::persistence("registry lock", anyhow::anyhow!("lock poisoned: {}", e))
        })
    }

    /// Idempotent bootstrap. The first run persists the declared metadata
    /// and parameter set (current = default); later runs leave persisted
    /// rows untouched, read them back and overlay them by name, so a
    /// restarted process resumes its last-applied configuration. Newly
    /// declared parameters get a row on the next run; rows for parameters
    /// no longer declared are ignored.
    pub fn initialize(&self) -> Result<(), ControlError> {
        let mut registry = self.lock_registry()?;

        let existing = self
            .db
            .get_agent(&self.spec.id)
            .map_err(|e| ControlError::persistence("initialize", e))?;

        if existing.is_none() {
            self.db
                .register_agent(
                    &self.spec.id,
                    &self.spec.name,
                    &self.spec.description,
                    self.spec.algorithm_type,
                    &self.spec.source_location,
                    self.spec.impact_score,
                )
                .map_err(|e| ControlError::persistence("initialize", e))?;
            tracing::info!(
                "Registered agent {} with {} parameters",
                self.spec.id,
                registry.list().len()
            );
        }

        // Insert-or-ignore every declared parameter row: a no-op on rows
        // that already exist, and the path by which a parameter added to
        // the declaration after first deploy becomes persistable.
        for (position, param) in registry.list().iter().enumerate() {
            self.db
                .register_parameter(&self.spec.id, position, param)
                .map_err(|e| ControlError::persistence("initialize", e))?;
        }

        let persisted = self
            .db
            .load_parameter_values(&self.spec.id)
            .map_err(|e| ControlError::persistence("initialize", e))?;
        for (name, value) in persisted {
            registry.overwrite_current(&name, value);
        }

        Ok(())
    }

    /// Static agent-authored explanation with current parameter values
    /// interpolated. Pure function of current state.
    pub fn explain(&self) -> String {
        let mut text = self.spec.explain_template.clone();
        let Ok(registry) = self.lock_registry() else {
            return text;
        };
        for param in registry.list() {
            text = text.replace(
                &format!("{{{}}}", param.name),
                &param.current_value.to_string(),
            );
        }
        text
    }

    /// Live parameter list in declaration order.
    pub fn parameters(&self) -> Result<Vec<Parameter>, ControlError> {
        Ok(self.lock_registry()?.list().to_vec())
    }

    /// Current full configuration as a name -> value map.
    pub fn snapshot(&self) -> Result<BTreeMap<String, ParamValue>, ControlError> {
        Ok(self.lock_registry()?.snapshot())
    }

    /// The only mutating entry point for configuration.
    ///
    /// The registry lock is held for the whole validate -> apply ->
    /// persist -> audit sequence, so concurrent updates serialize and the
    /// changelog chains each old value to the previous new value. The
    /// parameter-row update and the changelog append commit in one
    /// transaction; if that fails the in-memory value is rolled back and
    /// nothing is considered applied.
    pub fn update_parameter(
        &self,
        name: &str,
        value: ParamValue,
        reason: &str,
        actor: &str,
    ) -> Result<ChangeRecord, ControlError> {
        let mut registry = self.lock_registry()?;

        registry.validate(name, &value)?;
        let old_value = match registry.get(name) {
            Some(param) => param.current_value.clone(),
            None => return Err(ControlError::ParameterNotFound(name.to_string())),
        };

        registry.apply(name, value.clone());
        let record = ChangeRecord::new(
            &self.spec.id,
            name,
            old_value.clone(),
            value.clone(),
            reason,
            actor,
        );

        if let Err(error) = self.db.commit_parameter_change(&record) {
            registry.apply(name, old_value);
            return Err(ControlError::persistence("update_parameter", error));
        }

        if let Some(hook) = &self.apply_hook {
            hook(name, &value);
        }
        tracing::info!(
            "Agent {} parameter '{}' set to {} by {} ({})",
            self.spec.id,
            name,
            value,
            actor,
            reason
        );

        Ok(record)
    }

    /// Pure preview of proposed changes. Values are not validated here;
    /// an out-of-range proposal can be previewed so a caller sees what
    /// the update path would reject. Never mutates and never suspends.
    pub fn simulate(
        &self,
        changes: &BTreeMap<String, ParamValue>,
    ) -> Result<SimulationResult, ControlError> {
        let registry = self.lock_registry()?;
        let names = registry.names();
        let before = registry.snapshot();
        drop(registry);
        Ok(simulation::run(&names, before, changes))
    }

    /// Append a point-in-time performance sample. Fire-and-forget: no
    /// other operation depends on it.
    pub fn record_metrics(
        &self,
        execution_time_ms: f64,
        accuracy: Option<f64>,
    ) -> Result<MetricsSample, ControlError> {
        self.db
            .append_metrics_sample(
                &self.spec.id,
                execution_time_ms,
                accuracy,
                self.spec.impact_score,
            )
            .map_err(|e| ControlError::persistence("record_metrics", e))
    }

    /// Change history for this agent, most recent first.
    pub fn changelog(&self, limit: usize) -> Result<Vec<ChangeRecord>, ControlError> {
        self.db
            .changelog(&self.spec.id, limit)
            .map_err(|e| ControlError::persistence("changelog", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_db_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tiller_{}_{}.db", name, uuid::Uuid::new_v4()));
        path
    }

    fn sample_spec() -> AgentSpec {
        AgentSpec::new("A1", "Memories Feed", AlgorithmType::Ranking, 92)
            .description("Ranks memories for the home feed")
            .source("services/feed/memories.rs")
            .explain(
                "Memories are ranked by engagement and recency. The inclusion \
                 threshold is {threshold} and the candidate strategy is {strategy}.",
            )
            .param(ParameterSpec::number(
                "threshold",
                0.7,
                0.3,
                0.95,
                "Score cutoff for inclusion",
                "Raising it narrows the feed",
            ))
            .param(ParameterSpec::choice(
                "strategy",
                "hybrid",
                &["hybrid", "collaborative", "content"],
                "Candidate generation strategy",
                "Changes which signals dominate",
            ))
    }

    fn initialized_agent(path: &PathBuf) -> AlgorithmAgent {
        let db = Arc::new(ControlDatabase::new(path).expect("db init"));
        let agent = AlgorithmAgent::new(sample_spec(), db);
        agent.initialize().expect("initialize");
        agent
    }

    #[test]
    fn rejects_out_of_range_value_and_keeps_current() {
        let path = temp_db_path("scenario_a");
        let agent = initialized_agent(&path);

        let err = agent
            .update_parameter("threshold", ParamValue::Number(0.99), "tighten", "admin1")
            .unwrap_err();
        assert!(matches!(err, ControlError::ConstraintViolation { .. }));

        let snapshot = agent.snapshot().expect("snapshot");
        assert_eq!(snapshot["threshold"], ParamValue::Number(0.7));
        assert!(agent.changelog(10).expect("changelog").is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn accepted_update_round_trips_and_audits() {
        let path = temp_db_path("scenario_b");
        let agent = initialized_agent(&path);

        let record = agent
            .update_parameter("threshold", ParamValue::Number(0.8), "tighten", "admin1")
            .expect("update");
        assert_eq!(record.old_value, ParamValue::Number(0.7));
        assert_eq!(record.new_value, ParamValue::Number(0.8));

        let snapshot = agent.snapshot().expect("snapshot");
        assert_eq!(snapshot["threshold"], ParamValue::Number(0.8));

        let log = agent.changelog(10).expect("changelog");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].actor, "admin1");
        assert_eq!(log[0].old_value, ParamValue::Number(0.7));
        assert_eq!(log[0].new_value, ParamValue::Number(0.8));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn simulation_previews_without_mutating() {
        let path = temp_db_path("scenario_c");
        let agent = initialized_agent(&path);
        agent
            .update_parameter("threshold", ParamValue::Number(0.8), "tighten", "admin1")
            .expect("update");

        let mut changes = BTreeMap::new();
        changes.insert("threshold".to_string(), ParamValue::Number(0.9));

        let first = agent.simulate(&changes).expect("simulate");
        assert_eq!(first.before["threshold"], ParamValue::Number(0.8));
        assert_eq!(first.after["threshold"], ParamValue::Number(0.9));
        assert!(first.change_descriptions[0].contains("12.5% increase"));

        // Repeated simulation of the same proposal is identical and the
        // live value never moves.
        let second = agent.simulate(&changes).expect("simulate again");
        assert_eq!(first.change_descriptions, second.change_descriptions);
        assert_eq!(first.preview, second.preview);
        assert_eq!(
            agent.snapshot().expect("snapshot")["threshold"],
            ParamValue::Number(0.8)
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn initialize_is_idempotent() {
        let path = temp_db_path("init_idempotent");
        let agent = initialized_agent(&path);
        agent
            .update_parameter("threshold", ParamValue::Number(0.5), "relax", "admin1")
            .expect("update");

        let before = agent.snapshot().expect("snapshot");
        for _ in 0..3 {
            agent.initialize().expect("re-initialize");
        }
        assert_eq!(agent.snapshot().expect("snapshot"), before);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn restart_resumes_last_applied_configuration() {
        let path = temp_db_path("restart_resume");
        {
            let agent = initialized_agent(&path);
            agent
                .update_parameter(
                    "strategy",
                    ParamValue::Choice("content".to_string()),
                    "experiment",
                    "admin2",
                )
                .expect("update");
        }

        let db = Arc::new(ControlDatabase::new(&path).expect("reopen db"));
        let restarted = AlgorithmAgent::new(sample_spec(), db);
        restarted.initialize().expect("initialize after restart");
        assert_eq!(
            restarted.snapshot().expect("snapshot")["strategy"],
            ParamValue::Choice("content".to_string())
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn schema_evolution_keeps_new_params_and_ignores_removed_rows() {
        let path = temp_db_path("schema_evolution");
        {
            let agent = initialized_agent(&path);
            agent
                .update_parameter("threshold", ParamValue::Number(0.9), "tighten", "admin1")
                .expect("update");
        }

        // Same id, evolved declaration: one parameter gone, one added.
        let evolved = AgentSpec::new("A1", "Memories Feed", AlgorithmType::Ranking, 92)
            .explain("Threshold {threshold}, decay {decay_rate}.")
            .param(ParameterSpec::number(
                "threshold",
                0.7,
                0.3,
                0.95,
                "Score cutoff for inclusion",
                "Raising it narrows the feed",
            ))
            .param(ParameterSpec::number(
                "decay_rate",
                0.1,
                0.0,
                1.0,
                "Recency decay per day",
                "Higher favours fresh content",
            ));

        let db = Arc::new(ControlDatabase::new(&path).expect("reopen db"));
        let agent = AlgorithmAgent::new(evolved, db);
        agent.initialize().expect("initialize evolved");

        let snapshot = agent.snapshot().expect("snapshot");
        assert_eq!(snapshot["threshold"], ParamValue::Number(0.9));
        assert_eq!(snapshot["decay_rate"], ParamValue::Number(0.1));
        assert!(!snapshot.contains_key("strategy"));

        // The parameter added after first deploy is persistable.
        agent
            .update_parameter("decay_rate", ParamValue::Number(0.3), "speed up", "admin1")
            .expect("update new parameter");
        assert_eq!(
            agent.snapshot().expect("snapshot")["decay_rate"],
            ParamValue::Number(0.3)
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn persistence_failure_rolls_back_memory() {
        let path = temp_db_path("rollback");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        // Deliberately not initialized: no parameter rows exist, so the
        // transactional commit must fail.
        let agent = AlgorithmAgent::new(sample_spec(), db);

        let err = agent
            .update_parameter("threshold", ParamValue::Number(0.8), "tighten", "admin1")
            .unwrap_err();
        assert!(matches!(err, ControlError::Persistence { .. }));
        assert_eq!(
            agent.snapshot().expect("snapshot")["threshold"],
            ParamValue::Number(0.7)
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn apply_hook_fires_after_successful_update() {
        let path = temp_db_path("apply_hook");
        let db = Arc::new(ControlDatabase::new(&path).expect("db init"));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let agent = AlgorithmAgent::new(sample_spec(), db).with_apply_hook(Box::new(
            move |name, _value| {
                assert_eq!(name, "threshold");
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));
        agent.initialize().expect("initialize");

        agent
            .update_parameter("threshold", ParamValue::Number(0.6), "relax", "admin1")
            .expect("update");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // A rejected update must not fire the hook.
        let _ = agent.update_parameter("threshold", ParamValue::Number(2.0), "bad", "admin1");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn concurrent_updates_serialize_and_chain_the_changelog() {
        let path = temp_db_path("scenario_d");
        let agent = Arc::new(initialized_agent(&path));

        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let agent = Arc::clone(&agent);
            handles.push(std::thread::spawn(move || {
                let value = 0.3 + f64::from(worker) * 0.05;
                agent
                    .update_parameter(
                        "threshold",
                        ParamValue::Number(value),
                        "stress",
                        &format!("worker{}", worker),
                    )
                    .expect("concurrent update");
            }));
        }
        for handle in handles {
            handle.join().expect("join worker");
        }

        let log = agent.changelog(50).expect("changelog");
        assert_eq!(log.len(), 8);

        // Oldest first: every record's old value equals the previous
        // record's new value, starting from the compiled default.
        let mut ascending = log.clone();
        ascending.reverse();
        assert_eq!(ascending[0].old_value, ParamValue::Number(0.7));
        for pair in ascending.windows(2) {
            assert_eq!(pair[1].old_value, pair[0].new_value);
        }

        // The in-memory value matches the final audit entry.
        assert_eq!(
            agent.snapshot().expect("snapshot")["threshold"],
            ascending.last().expect("last record").new_value
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn explain_interpolates_current_values() {
        let path = temp_db_path("explain");
        let agent = initialized_agent(&path);
        let text = agent.explain();
        assert!(text.contains("threshold is 0.7"));
        assert!(text.contains("strategy is hybrid"));

        agent
            .update_parameter("threshold", ParamValue::Number(0.85), "tighten", "admin1")
            .expect("update");
        assert!(agent.explain().contains("threshold is 0.85"));

        let _ = std::fs::remove_file(&path);
    }
}
