/// Errors surfaced by the parameter control surface.
///
/// Validation failures (`AgentNotFound`, `ParameterNotFound`,
/// `ConstraintViolation`) are caller-input problems and carry enough
/// detail for self-service correction. `Persistence` wraps a storage
/// failure; the operation that raised it has not been partially applied,
/// so the caller may retry it wholesale.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("unknown algorithm agent: {0}")]
    AgentNotFound(String),

    #[error("unknown parameter: {0}")]
    ParameterNotFound(String),

    #[error("invalid value for '{parameter}': {reason}")]
    ConstraintViolation { parameter: String, reason: String },

    #[error("storage failure during {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ControlError {
    pub fn persistence(operation: &'static str, source: anyhow::Error) -> Self {
        ControlError::Persistence { operation, source }
    }

    /// Whether the error is a caller-input problem rather than an
    /// infrastructure one. Input problems should not be retried verbatim.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ControlError::AgentNotFound(_)
                | ControlError::ParameterNotFound(_)
                | ControlError::ConstraintViolation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_names_the_parameter() {
        let error = ControlError::ConstraintViolation {
            parameter: "threshold".to_string(),
            reason: "0.99 is above the maximum 0.95".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid value for 'threshold': 0.99 is above the maximum 0.95"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn persistence_is_not_a_validation_error() {
        let error = ControlError::persistence("update", anyhow::anyhow!("disk full"));
        assert!(!error.is_validation());
        assert!(error.to_string().contains("disk full"));
    }
}
