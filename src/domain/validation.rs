use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of a form field, as it appears in the serialized values object.
pub type FieldName = String;

/// A single failed check reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Field path the issue refers to. Nested paths use `.` separators; the
    /// first segment is the form field.
    pub path: String,
    /// Human readable message shown next to the field.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The top-level form field this issue belongs to.
    pub fn field(&self) -> &str {
        self.path.split('.').next().unwrap_or_default()
    }
}

/// Result of running a schema over a full value set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    /// Reduce the issue list to one message per field, keeping the first
    /// message reported for each field.
    pub fn first_error_per_field(&self) -> BTreeMap<FieldName, String> {
        let mut out = BTreeMap::new();
        for issue in &self.errors {
            out.entry(issue.field().to_string())
                .or_insert_with(|| issue.message.clone());
        }
        out
    }

    /// First message reported for `field`, if any.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|issue| issue.field() == field)
            .map(|issue| issue.message.as_str())
    }
}

/// Pluggable validator capability used by the form engine.
pub trait Schema<T>: Send + Sync {
    fn validate(&self, values: &T) -> ValidationOutcome;
}

impl<T, F> Schema<T> for F
where
    F: Fn(&T) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, values: &T) -> ValidationOutcome {
        self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_per_field_keeps_first_message() {
        let outcome = ValidationOutcome::from_issues(vec![
            ValidationIssue::new("email", "Email is required"),
            ValidationIssue::new("email", "Email is invalid"),
            ValidationIssue::new("name", "Name is required"),
        ]);

        let errors = outcome.first_error_per_field();
        assert!(!outcome.success);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["name"], "Name is required");
    }

    #[test]
    fn nested_paths_map_to_top_level_field() {
        let issue = ValidationIssue::new("address.zip", "Invalid zip");
        assert_eq!(issue.field(), "address");

        let outcome = ValidationOutcome::from_issues(vec![issue]);
        assert_eq!(outcome.error_for("address"), Some("Invalid zip"));
        assert_eq!(outcome.error_for("zip"), None);
    }

    #[test]
    fn empty_issue_list_is_success() {
        assert!(ValidationOutcome::from_issues(vec![]).success);
        assert_eq!(ValidationOutcome::ok(), ValidationOutcome::from_issues(vec![]));
    }
}
