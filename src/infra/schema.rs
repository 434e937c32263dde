//! Declarative per-field validation rules implementing [`Schema`].
//!
//! Rules are checked per field in declaration order, so the first failing
//! rule of a field produces that field's first issue.

use crate::domain::{FieldName, Schema, ValidationIssue, ValidationOutcome};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
enum Check {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Range { min: f64, max: f64 },
    Pattern(Regex),
    Custom(Predicate),
}

/// One check plus the message reported when it fails.
#[derive(Clone)]
pub struct Rule {
    check: Check,
    message: String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

impl Rule {
    /// Fails on null, blank strings and empty arrays.
    pub fn required() -> Self {
        Self::new(Check::Required, "This field is required")
    }

    /// Fails on non-empty strings that are not an email address. Empty values
    /// pass; pair with [`Rule::required`] to reject them.
    pub fn email() -> Self {
        Self::new(Check::Email, "Enter a valid email address")
    }

    pub fn min_length(min: usize) -> Self {
        Self::new(
            Check::MinLength(min),
            format!("Must be at least {min} characters"),
        )
    }

    pub fn max_length(max: usize) -> Self {
        Self::new(
            Check::MaxLength(max),
            format!("Must be at most {max} characters"),
        )
    }

    /// Numeric bounds, inclusive.
    pub fn range(min: f64, max: f64) -> Self {
        Self::new(
            Check::Range { min, max },
            format!("Must be between {min} and {max}"),
        )
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self::new(Check::Pattern(regex), "Invalid format"))
    }

    pub fn custom<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(Check::Custom(Arc::new(predicate)), message)
    }

    /// Replace the default failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn new(check: Check, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }

    fn passes(&self, value: &Value) -> bool {
        match &self.check {
            Check::Required => match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            },
            Check::Email => match value {
                Value::String(s) if !s.is_empty() => EMAIL_RE.is_match(s),
                _ => true,
            },
            Check::MinLength(min) => length_of(value).is_none_or(|len| len >= *min),
            Check::MaxLength(max) => length_of(value).is_none_or(|len| len <= *max),
            Check::Range { min, max } => value
                .as_f64()
                .is_none_or(|n| n >= *min && n <= *max),
            Check::Pattern(regex) => match value {
                Value::String(s) if !s.is_empty() => regex.is_match(s),
                _ => true,
            },
            Check::Custom(predicate) => predicate(value),
        }
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Schema built from per-field rule lists.
pub struct RuleSchema<T> {
    fields: Vec<(FieldName, Vec<Rule>)>,
    _values: PhantomData<fn(&T)>,
}

impl<T> Default for RuleSchema<T> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            _values: PhantomData,
        }
    }
}

impl<T> RuleSchema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules for `field`. Calling this twice for the same field adds
    /// the new rules after the existing ones.
    pub fn field(mut self, field: &str, rules: impl IntoIterator<Item = Rule>) -> Self {
        let rules: Vec<Rule> = rules.into_iter().collect();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((field.to_string(), rules)),
        }
        self
    }
}

impl<T: Serialize> Schema<T> for RuleSchema<T> {
    fn validate(&self, values: &T) -> ValidationOutcome {
        let object = match serde_json::to_value(values) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                return ValidationOutcome::from_issues(vec![ValidationIssue::new(
                    "",
                    "Values must be an object",
                )]);
            }
            Err(err) => {
                return ValidationOutcome::from_issues(vec![ValidationIssue::new(
                    "",
                    err.to_string(),
                )]);
            }
        };

        let mut issues = Vec::new();
        for (field, rules) in &self.fields {
            // Keys left out by `skip_serializing_if` are checked as null.
            let value = object.get(field).unwrap_or(&Value::Null);
            for rule in rules {
                if !rule.passes(value) {
                    issues.push(ValidationIssue::new(field.clone(), rule.message.clone()));
                }
            }
        }
        ValidationOutcome::from_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Contact {
        email: String,
        bio: String,
        tags: Vec<String>,
        age: Option<u32>,
    }

    fn contact(email: &str) -> Contact {
        Contact {
            email: email.into(),
            bio: "Cardiologist".into(),
            tags: vec!["health".into()],
            age: Some(40),
        }
    }

    fn schema() -> RuleSchema<Contact> {
        RuleSchema::new()
            .field("email", [Rule::required(), Rule::email()])
            .field("bio", [Rule::max_length(20)])
            .field("tags", [Rule::required().message("Pick a topic")])
            .field("age", [Rule::range(18.0, 120.0)])
    }

    #[test]
    fn valid_values_pass() {
        let outcome = schema().validate(&contact("x@y.com"));
        assert!(outcome.success, "{:?}", outcome.errors);
    }

    #[test]
    fn rules_report_in_declaration_order() {
        let outcome = schema().validate(&contact(""));
        assert_eq!(outcome.error_for("email"), Some("This field is required"));
        assert_eq!(outcome.errors.len(), 1);

        let outcome = schema().validate(&contact("not-an-email"));
        assert_eq!(outcome.error_for("email"), Some("Enter a valid email address"));
    }

    #[test]
    fn custom_messages_and_lengths() {
        let mut values = contact("x@y.com");
        values.tags.clear();
        values.bio = "a".repeat(21);
        values.age = Some(12);

        let outcome = schema().validate(&values);
        let errors = outcome.first_error_per_field();
        assert_eq!(errors["tags"], "Pick a topic");
        assert_eq!(errors["bio"], "Must be at most 20 characters");
        assert_eq!(errors["age"], "Must be between 18 and 120");
    }

    #[test]
    fn null_is_required_failure_but_ignored_by_range() {
        let mut values = contact("x@y.com");
        values.age = None;
        assert!(schema().validate(&values).success);

        let strict = RuleSchema::new().field("age", [Rule::required()]);
        assert!(!strict.validate(&values).success);
    }

    #[test]
    fn pattern_and_custom_rules() {
        let schema: RuleSchema<serde_json::Value> = RuleSchema::new()
            .field("ticker", [Rule::pattern("^[A-Z]{1,5}$").unwrap()])
            .field(
                "shares",
                [Rule::custom(
                    |v| v.as_u64().is_some_and(|n| n % 10 == 0),
                    "Shares trade in lots of 10",
                )],
            );

        assert!(schema.validate(&json!({ "ticker": "MDT", "shares": 20 })).success);

        let outcome = schema.validate(&json!({ "ticker": "mdt", "shares": 7 }));
        assert_eq!(outcome.error_for("ticker"), Some("Invalid format"));
        assert_eq!(outcome.error_for("shares"), Some("Shares trade in lots of 10"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(Rule::pattern("(unclosed").is_err());
    }

    #[derive(Serialize)]
    struct Referral {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    }

    #[test]
    fn omitted_keys_are_checked_as_null() {
        let schema = RuleSchema::new()
            .field("code", [Rule::required().message("Enter a referral code")])
            .field("note", [Rule::max_length(10)]);

        let outcome = schema.validate(&Referral { code: None });
        assert!(!outcome.success);
        assert_eq!(outcome.error_for("code"), Some("Enter a referral code"));
        // Optional-style rules still pass on null.
        assert_eq!(outcome.error_for("note"), None);

        let outcome = schema.validate(&Referral {
            code: Some("MED-42".into()),
        });
        assert!(outcome.success, "{:?}", outcome.errors);
    }
}
