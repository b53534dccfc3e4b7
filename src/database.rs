use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

use crate::agent::AlgorithmType;
use crate::audit::{ChangeRecord, ChatExchange, MetricsSample};
use crate::value::{ParamKind, ParamValue, Parameter};

/// Persisted agent metadata, one row per agent id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub algorithm_type: AlgorithmType,
    pub source_location: String,
    pub impact_score: u8,
    pub call_count: i64,
    pub registered_at: DateTime<Utc>,
}

/// SQLite-backed store for agent state, parameter values, the append-only
/// changelog, chat exchanges and metrics samples.
pub struct ControlDatabase {
    conn: Mutex<Connection>,
}

impl ControlDatabase {
    /// Helper to lock the connection
    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Database lock poisoned: {}", e))
    }

    /// Create or open the database
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Create the database schema
    fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS algorithm_agents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                algorithm_type TEXT NOT NULL,
                source_location TEXT NOT NULL,
                impact_score INTEGER NOT NULL,
                call_count INTEGER NOT NULL DEFAULT 0,
                registered_at TEXT NOT NULL
            )"#,
            [],
        )?;

        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS algorithm_parameters (
                agent_id TEXT NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                current_value TEXT NOT NULL,
                default_value TEXT NOT NULL,
                constraint_json TEXT,
                description TEXT NOT NULL,
                impact_note TEXT NOT NULL,
                position INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (agent_id, name)
            )"#,
            [],
        )?;

        // Append-only audit trail, one row per applied change.
        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS parameter_changelog (
                id TEXT PRIMARY KEY,
                agent_id TEXT NOT NULL,
                parameter TEXT NOT NULL,
                kind TEXT NOT NULL,
                old_value TEXT NOT NULL,
                new_value TEXT NOT NULL,
                reason TEXT NOT NULL,
                actor TEXT NOT NULL,
                changed_at TEXT NOT NULL
            )"#,
            [],
        )?;

        // Append-only chat traceability log.
        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS chat_exchanges (
                id TEXT PRIMARY KEY,
                agent_id TEXT NOT NULL,
                actor TEXT NOT NULL,
                user_message TEXT NOT NULL,
                agent_response TEXT NOT NULL,
                action_taken TEXT,
                created_at TEXT NOT NULL
            )"#,
            [],
        )?;

        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS metrics_samples (
                id TEXT PRIMARY KEY,
                agent_id TEXT NOT NULL,
                execution_time_ms REAL NOT NULL,
                accuracy REAL,
                call_count INTEGER NOT NULL,
                impact_score INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            )"#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_changelog_agent_changed_at ON parameter_changelog(agent_id, changed_at DESC)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_chat_exchanges_agent_created_at ON chat_exchanges(agent_id, created_at DESC)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_metrics_samples_agent_recorded_at ON metrics_samples(agent_id, recorded_at DESC)",
            [],
        )?;

        Ok(())
    }

    /// Look up an agent's persisted metadata row.
    pub fn get_agent(&self, id: &str) -> Result<Option<AgentRow>> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT id, name, description, algorithm_type, source_location, impact_score, call_count, registered_at
             FROM algorithm_agents WHERE id = ?1",
            [id],
            Self::agent_row_from_sql,
        );

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List every registered agent's metadata row.
    pub fn agent_overview(&self) -> Result<Vec<AgentRow>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, algorithm_type, source_location, impact_score, call_count, registered_at
             FROM algorithm_agents ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], Self::agent_row_from_sql)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn agent_row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<AgentRow> {
        Ok(AgentRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            algorithm_type: AlgorithmType::from_db(&row.get::<_, String>(3)?),
            source_location: row.get(4)?,
            impact_score: row.get::<_, i64>(5)? as u8,
            call_count: row.get(6)?,
            registered_at: row.get::<_, String>(7)?.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    7,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
        })
    }

    /// Write an agent's metadata row if absent. `INSERT OR IGNORE` keeps
    /// concurrent first-time initialization safe: the loser of the race
    /// becomes a read-only no-op.
    pub fn register_agent(
        &self,
        id: &str,
        name: &str,
        description: &str,
        algorithm_type: AlgorithmType,
        source_location: &str,
        impact_score: u8,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO algorithm_agents
             (id, name, description, algorithm_type, source_location, impact_score, call_count, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                id,
                name,
                description,
                algorithm_type.as_db_str(),
                source_location,
                impact_score as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Write a parameter row if absent (current = default on first write).
    pub fn register_parameter(
        &self,
        agent_id: &str,
        position: usize,
        param: &Parameter,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        let constraint_json = param
            .constraint
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        conn.execute(
            "INSERT OR IGNORE INTO algorithm_parameters
             (agent_id, name, kind, current_value, default_value, constraint_json, description, impact_note, position, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                agent_id,
                param.name,
                param.kind.as_db_str(),
                param.current_value.encode(),
                param.default_value.encode(),
                constraint_json,
                param.description,
                param.impact_note,
                position as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Read back the persisted (name, value) pairs for one agent so a
    /// restarted process resumes its last-applied configuration.
    pub fn load_parameter_values(&self, agent_id: &str) -> Result<Vec<(String, ParamValue)>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, kind, current_value FROM algorithm_parameters
             WHERE agent_id = ?1 ORDER BY position ASC",
        )?;

        let raw = stmt
            .query_map([agent_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut values = Vec::with_capacity(raw.len());
        for (name, kind, encoded) in raw {
            let value = ParamValue::decode(ParamKind::from_db(&kind), &encoded)?;
            values.push((name, value));
        }
        Ok(values)
    }

    /// Apply a validated parameter change and its audit entry in one
    /// transaction. Either both land or neither does; the caller rolls
    /// its in-memory value back when this returns an error.
    pub fn commit_parameter_change(&self, record: &ChangeRecord) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE algorithm_parameters SET current_value = ?1, updated_at = ?2
             WHERE agent_id = ?3 AND name = ?4",
            params![
                record.new_value.encode(),
                record.changed_at.to_rfc3339(),
                record.agent_id,
                record.parameter
            ],
        )?;
        if updated != 1 {
            anyhow::bail!(
                "no persisted row for parameter '{}' of agent {}",
                record.parameter,
                record.agent_id
            );
        }

        tx.execute(
            "INSERT INTO parameter_changelog
             (id, agent_id, parameter, kind, old_value, new_value, reason, actor, changed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.agent_id,
                record.parameter,
                record.new_value.kind().as_db_str(),
                record.old_value.encode(),
                record.new_value.encode(),
                record.reason,
                record.actor,
                record.changed_at.to_rfc3339()
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Change history for one agent, most recent first.
    pub fn changelog(&self, agent_id: &str, limit: usize) -> Result<Vec<ChangeRecord>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, agent_id, parameter, kind, old_value, new_value, reason, actor, changed_at
             FROM parameter_changelog
             WHERE agent_id = ?1
             ORDER BY changed_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let raw = stmt
            .query_map(params![agent_id, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for (id, agent_id, parameter, kind, old_value, new_value, reason, actor, changed_at) in raw
        {
            let kind = ParamKind::from_db(&kind);
            records.push(ChangeRecord {
                id,
                agent_id,
                parameter,
                old_value: ParamValue::decode(kind, &old_value)?,
                new_value: ParamValue::decode(kind, &new_value)?,
                reason,
                actor,
                changed_at: changed_at
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid changed_at timestamp: {}", e))?,
            });
        }
        Ok(records)
    }

    /// Append one chat exchange to the traceability log.
    pub fn append_chat_exchange(&self, exchange: &ChatExchange) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO chat_exchanges
             (id, agent_id, actor, user_message, agent_response, action_taken, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                exchange.id,
                exchange.agent_id,
                exchange.actor,
                exchange.user_message,
                exchange.agent_response,
                exchange.action_taken,
                exchange.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Chat history for one agent, most recent first.
    pub fn chat_history(&self, agent_id: &str, limit: usize) -> Result<Vec<ChatExchange>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, agent_id, actor, user_message, agent_response, action_taken, created_at
             FROM chat_exchanges
             WHERE agent_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let exchanges = stmt
            .query_map(params![agent_id, limit as i64], |row| {
                Ok(ChatExchange {
                    id: row.get(0)?,
                    agent_id: row.get(1)?,
                    actor: row.get(2)?,
                    user_message: row.get(3)?,
                    agent_response: row.get(4)?,
                    action_taken: row.get(5)?,
                    created_at: row.get::<_, String>(6)?.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            6,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exchanges)
    }

    /// Append one metrics sample and bump the agent's running call
    /// counter; the sample snapshots the counter after the bump.
    pub fn append_metrics_sample(
        &self,
        agent_id: &str,
        execution_time_ms: f64,
        accuracy: Option<f64>,
        impact_score: u8,
    ) -> Result<MetricsSample> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let bumped = tx.execute(
            "UPDATE algorithm_agents SET call_count = call_count + 1 WHERE id = ?1",
            [agent_id],
        )?;
        if bumped != 1 {
            anyhow::bail!("no persisted agent row for {}", agent_id);
        }
        let call_count: i64 = tx.query_row(
            "SELECT call_count FROM algorithm_agents WHERE id = ?1",
            [agent_id],
            |row| row.get(0),
        )?;

        let sample = MetricsSample {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            execution_time_ms,
            accuracy,
            call_count,
            impact_score,
            recorded_at: Utc::now(),
        };

        tx.execute(
            "INSERT INTO metrics_samples
             (id, agent_id, execution_time_ms, accuracy, call_count, impact_score, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                sample.id,
                sample.agent_id,
                sample.execution_time_ms,
                sample.accuracy,
                sample.call_count,
                sample.impact_score as i64,
                sample.recorded_at.to_rfc3339()
            ],
        )?;

        tx.commit()?;
        Ok(sample)
    }

    /// Metrics samples for one agent, most recent first.
    pub fn metrics(&self, agent_id: &str, limit: usize) -> Result<Vec<MetricsSample>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, agent_id, execution_time_ms, accuracy, call_count, impact_score, recorded_at
             FROM metrics_samples
             WHERE agent_id = ?1
             ORDER BY recorded_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let samples = stmt
            .query_map(params![agent_id, limit as i64], |row| {
                Ok(MetricsSample {
                    id: row.get(0)?,
                    agent_id: row.get(1)?,
                    execution_time_ms: row.get(2)?,
                    accuracy: row.get(3)?,
                    call_count: row.get(4)?,
                    impact_score: row.get::<_, i64>(5)? as u8,
                    recorded_at: row.get::<_, String>(6)?.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            6,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(samples)
    }
}
