use crate::domain::FieldName;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Mutable state of a form, owned by a single [`super::Form`] handle family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState<T> {
    pub values: T,
    /// First validation message per field. Keys are always field names of `T`.
    pub errors: BTreeMap<FieldName, String>,
    pub touched: BTreeMap<FieldName, bool>,
    pub dirty: BTreeMap<FieldName, bool>,
    pub is_submitting: bool,
    pub submit_count: u32,
}

impl<T> FormState<T> {
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: BTreeMap::new(),
            touched: BTreeMap::new(),
            dirty: BTreeMap::new(),
            is_submitting: false,
            submit_count: 0,
        }
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.get(field).copied().unwrap_or(false)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.get(field).copied().unwrap_or(false)
    }

    /// True once any field has been modified since construction or the last reset.
    pub fn is_form_dirty(&self) -> bool {
        self.dirty.values().any(|dirty| *dirty)
    }

    pub(super) fn clear_tracking(&mut self) {
        self.errors.clear();
        self.touched.clear();
        self.dirty.clear();
        self.submit_count = 0;
    }

    pub(super) fn clear_field(&mut self, field: &str) {
        self.errors.remove(field);
        self.touched.remove(field);
        self.dirty.remove(field);
    }
}

/// Everything a screen needs to render one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldState {
    pub name: FieldName,
    pub value: Value,
    pub error: Option<String>,
    pub touched: bool,
    pub dirty: bool,
}

impl FieldState {
    /// Error to display: only shown once the user has left the field.
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }
}

/// What `handle_submit` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the submit handler was not called.
    Invalid,
    /// Validation passed and the submit handler (if any) completed.
    Submitted,
}
