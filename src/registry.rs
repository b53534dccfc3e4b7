use std::collections::BTreeMap;

use crate::error::ControlError;
use crate::value::{ParamValue, Parameter, ParameterSpec};

/// One agent's live parameter set, kept in declaration order.
///
/// The registry is a pure value container: it validates and mutates
/// in-memory state only. Persistence and auditing belong to the owning
/// agent, which drives every mutation through its update path.
#[derive(Debug)]
pub struct ParameterRegistry {
    params: Vec<Parameter>,
}

impl ParameterRegistry {
    pub fn from_specs(specs: &[ParameterSpec]) -> Self {
        Self {
            params: specs.iter().map(Parameter::from_spec).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Declaration order, stable across calls.
    pub fn list(&self) -> &[Parameter] {
        &self.params
    }

    pub fn snapshot(&self) -> BTreeMap<String, ParamValue> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.current_value.clone()))
            .collect()
    }

    /// Names in declaration order, for stable diff output.
    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }

    pub fn validate(&self, name: &str, value: &ParamValue) -> Result<(), ControlError> {
        let param = self
            .get(name)
            .ok_or_else(|| ControlError::ParameterNotFound(name.to_string()))?;
        param
            .check_value(value)
            .map_err(|reason| ControlError::ConstraintViolation {
                parameter: name.to_string(),
                reason,
            })
    }

    /// Mutates `current_value` in place. The caller must have validated;
    /// an unknown name here is a programming error and is ignored with a
    /// warning rather than a panic.
    pub fn apply(&mut self, name: &str, value: ParamValue) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.current_value = value,
            None => tracing::warn!("apply() on undeclared parameter '{}'", name),
        }
    }

    /// Overlay a persisted value during initialize(). Unknown names are
    /// ignored so parameters removed from the declaration don't break a
    /// restart; declared parameters absent from storage keep their
    /// compiled defaults.
    pub fn overwrite_current(&mut self, name: &str, value: ParamValue) {
        if let Some(param) = self.params.iter_mut().find(|p| p.name == name) {
            param.current_value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> ParameterRegistry {
        ParameterRegistry::from_specs(&[
            ParameterSpec::number(
                "threshold",
                0.7,
                0.3,
                0.95,
                "Score cutoff for inclusion",
                "Raising it narrows the result set",
            ),
            ParameterSpec::choice(
                "strategy",
                "hybrid",
                &["hybrid", "collaborative", "content"],
                "Candidate generation strategy",
                "Changes which signals dominate",
            ),
            ParameterSpec::flag(
                "boost_new_users",
                true,
                "Give new accounts extra reach",
                "Affects cold-start exposure",
            ),
        ])
    }

    #[test]
    fn list_preserves_declaration_order() {
        let registry = sample_registry();
        let names = registry.names();
        assert_eq!(names, vec!["threshold", "strategy", "boost_new_users"]);
    }

    #[test]
    fn validate_rejects_out_of_range_numbers() {
        let registry = sample_registry();
        let err = registry
            .validate("threshold", &ParamValue::Number(0.99))
            .unwrap_err();
        match err {
            ControlError::ConstraintViolation { parameter, reason } => {
                assert_eq!(parameter, "threshold");
                assert!(reason.contains("0.95"));
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_unknown_choice() {
        let registry = sample_registry();
        let err = registry
            .validate("strategy", &ParamValue::Choice("random".to_string()))
            .unwrap_err();
        assert!(matches!(err, ControlError::ConstraintViolation { .. }));
    }

    #[test]
    fn validate_rejects_unknown_name() {
        let registry = sample_registry();
        let err = registry
            .validate("nonexistent", &ParamValue::Number(1.0))
            .unwrap_err();
        assert!(matches!(err, ControlError::ParameterNotFound(_)));
    }

    #[test]
    fn apply_mutates_current_only() {
        let mut registry = sample_registry();
        registry.apply("threshold", ParamValue::Number(0.8));
        let param = registry.get("threshold").expect("param");
        assert_eq!(param.current_value, ParamValue::Number(0.8));
        assert_eq!(param.default_value, ParamValue::Number(0.7));
    }

    #[test]
    fn overwrite_current_ignores_unknown_names() {
        let mut registry = sample_registry();
        registry.overwrite_current("removed_param", ParamValue::Number(3.0));
        assert!(registry.get("removed_param").is_none());
        registry.overwrite_current("threshold", ParamValue::Number(0.5));
        assert_eq!(
            registry.get("threshold").expect("param").current_value,
            ParamValue::Number(0.5)
        );
    }
}
