use serde::{Deserialize, Serialize};

/// One typed configuration value. Values are carried as a tagged union so
/// constraint checking is exhaustive instead of ad hoc runtime branching.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
    Text(String),
    Choice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Number,
    Flag,
    Text,
    Choice,
}

impl ParamKind {
    pub fn as_db_str(self) -> &'static str {
        match self {
            ParamKind::Number => "number",
            ParamKind::Flag => "flag",
            ParamKind::Text => "text",
            ParamKind::Choice => "choice",
        }
    }

    pub fn from_db(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "number" => ParamKind::Number,
            "flag" => ParamKind::Flag,
            "choice" => ParamKind::Choice,
            _ => ParamKind::Text,
        }
    }
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Number(_) => ParamKind::Number,
            ParamValue::Flag(_) => ParamKind::Flag,
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Choice(_) => ParamKind::Choice,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Storage form of the value. Paired with the kind column so the
    /// original variant survives the round trip.
    pub fn encode(&self) -> String {
        match self {
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Flag(b) => b.to_string(),
            ParamValue::Text(s) | ParamValue::Choice(s) => s.clone(),
        }
    }

    pub fn decode(kind: ParamKind, raw: &str) -> anyhow::Result<Self> {
        match kind {
            ParamKind::Number => {
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| anyhow::anyhow!("invalid stored number '{}': {}", raw, e))?;
                Ok(ParamValue::Number(parsed))
            }
            ParamKind::Flag => match raw.trim() {
                "true" | "1" => Ok(ParamValue::Flag(true)),
                "false" | "0" => Ok(ParamValue::Flag(false)),
                other => anyhow::bail!("invalid stored flag '{}'", other),
            },
            ParamKind::Text => Ok(ParamValue::Text(raw.to_string())),
            ParamKind::Choice => Ok(ParamValue::Choice(raw.to_string())),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Flag(b) => write!(f, "{}", b),
            ParamValue::Text(s) | ParamValue::Choice(s) => write!(f, "{}", s),
        }
    }
}

/// Validity rule attached to a parameter. Checked at the update boundary
/// only; a stored value always satisfies its constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    OneOf { allowed: Vec<String> },
}

impl Constraint {
    /// Returns the violated bound or allowed set as the rejection reason.
    pub fn check(&self, value: &ParamValue) -> Result<(), String> {
        match (self, value) {
            (Constraint::Range { min, max }, ParamValue::Number(n)) => {
                if let Some(min) = min {
                    if n < min {
                        return Err(format!("{} is below the minimum {}", n, min));
                    }
                }
                if let Some(max) = max {
                    if n > max {
                        return Err(format!("{} is above the maximum {}", n, max));
                    }
                }
                Ok(())
            }
            (Constraint::OneOf { allowed }, ParamValue::Choice(c)) => {
                if allowed.iter().any(|a| a == c) {
                    Ok(())
                } else {
                    Err(format!(
                        "'{}' is not one of the allowed values [{}]",
                        c,
                        allowed.join(", ")
                    ))
                }
            }
            // A kind mismatch is reported before the constraint is consulted,
            // so these arms only trip on a malformed declaration.
            (Constraint::Range { .. }, other) => Err(format!(
                "expected a number value, got {}",
                other.kind().as_db_str()
            )),
            (Constraint::OneOf { .. }, other) => Err(format!(
                "expected a choice value, got {}",
                other.kind().as_db_str()
            )),
        }
    }
}

/// Immutable declaration a live parameter is created from at bootstrap.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub default: ParamValue,
    pub constraint: Option<Constraint>,
    pub description: String,
    pub impact_note: String,
}

impl ParameterSpec {
    pub fn number(
        name: &str,
        default: f64,
        min: f64,
        max: f64,
        description: &str,
        impact_note: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            default: ParamValue::Number(default),
            constraint: Some(Constraint::Range {
                min: Some(min),
                max: Some(max),
            }),
            description: description.to_string(),
            impact_note: impact_note.to_string(),
        }
    }

    pub fn flag(name: &str, default: bool, description: &str, impact_note: &str) -> Self {
        Self {
            name: name.to_string(),
            default: ParamValue::Flag(default),
            constraint: None,
            description: description.to_string(),
            impact_note: impact_note.to_string(),
        }
    }

    pub fn text(name: &str, default: &str, description: &str, impact_note: &str) -> Self {
        Self {
            name: name.to_string(),
            default: ParamValue::Text(default.to_string()),
            constraint: None,
            description: description.to_string(),
            impact_note: impact_note.to_string(),
        }
    }

    pub fn choice(
        name: &str,
        default: &str,
        allowed: &[&str],
        description: &str,
        impact_note: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            default: ParamValue::Choice(default.to_string()),
            constraint: Some(Constraint::OneOf {
                allowed: allowed.iter().map(|a| a.to_string()).collect(),
            }),
            description: description.to_string(),
            impact_note: impact_note.to_string(),
        }
    }

    pub fn kind(&self) -> ParamKind {
        self.default.kind()
    }
}

/// One live, constrained, named configuration value owned by an agent.
///
/// Created once at agent bootstrap from its declaration and never deleted;
/// `current_value` only moves through the validated update path.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub current_value: ParamValue,
    pub default_value: ParamValue,
    pub constraint: Option<Constraint>,
    pub description: String,
    pub impact_note: String,
}

impl Parameter {
    pub fn from_spec(spec: &ParameterSpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind(),
            current_value: spec.default.clone(),
            default_value: spec.default.clone(),
            constraint: spec.constraint.clone(),
            description: spec.description.clone(),
            impact_note: spec.impact_note.clone(),
        }
    }

    /// Kind check first, then the declared constraint. Returns the
    /// specific reason a value would be rejected.
    pub fn check_value(&self, value: &ParamValue) -> Result<(), String> {
        if value.kind() != self.kind {
            return Err(format!(
                "expected a {} value, got {}",
                self.kind.as_db_str(),
                value.kind().as_db_str()
            ));
        }
        match &self.constraint {
            Some(constraint) => constraint.check(value),
            None => Ok(()),
        }
    }
}
