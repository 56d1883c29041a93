use garde::{Report, Validate};

use crate::domain::{DomainError, DomainResult};

/// Run garde validation, reporting failures as [`DomainError::ValidationError`].
pub fn validate_struct<T>(value: &T) -> DomainResult<()>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationError(describe(&report)))
}

/// `field: message` pairs joined into one line.
fn describe(report: &Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            let path = path.to_string();
            if path.is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Lookup {
        #[garde(length(min = 1))]
        subject_id: String,
        #[garde(length(min = 1))]
        resource_type: String,
    }

    #[test]
    fn test_valid_input() {
        let lookup = Lookup {
            subject_id: "u-1".to_string(),
            resource_type: "claims".to_string(),
        };
        assert!(validate_struct(&lookup).is_ok());
    }

    #[test]
    fn test_reports_every_failing_field() {
        let lookup = Lookup {
            subject_id: String::new(),
            resource_type: String::new(),
        };
        match validate_struct(&lookup) {
            Err(DomainError::ValidationError(msg)) => {
                assert!(msg.contains("subject_id"));
                assert!(msg.contains("resource_type"));
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }
}
