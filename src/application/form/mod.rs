//! Form engine: a single owned state container for a structured input form.
//!
//! Values are any serde struct whose serialized form is an object; its keys
//! are the field names. Validation is delegated to a pluggable [`Schema`] and
//! its failures are recorded as per-field messages, never returned as errors.
//!
//! A `Form` is a cheap handle: clones share the same state, so a screen can
//! hand one to an input callback and keep another for rendering.

mod options;
mod state;
mod values;


pub use options::{FormOptions, SubmitHandler};
pub use state::{FieldState, FormState, SubmitOutcome};

use crate::domain::{FieldName, FormError, Schema, ValidationOutcome};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub struct Form<T> {
    state: Arc<Mutex<FormState<T>>>,
    initial: Arc<T>,
    schema: Option<Arc<dyn Schema<T>>>,
    options: FormOptions<T>,
}

impl<T> Clone for Form<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            initial: Arc::clone(&self.initial),
            schema: self.schema.clone(),
            options: self.options.clone(),
        }
    }
}

/// Clears `is_submitting` when dropped, including when the submit future is
/// cancelled or the handler fails.
struct SubmittingGuard<'a, T> {
    state: &'a Mutex<FormState<T>>,
}

impl<'a, T> SubmittingGuard<'a, T> {
    fn arm(state: &'a Mutex<FormState<T>>) -> Self {
        state.lock().is_submitting = true;
        Self { state }
    }
}

impl<T> Drop for SubmittingGuard<'_, T> {
    fn drop(&mut self) {
        self.state.lock().is_submitting = false;
    }
}

impl<T> Form<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Build a form around `initial_values`, which are also the target of
    /// every later [`Form::reset`].
    ///
    /// The schema is called with the form's lock held and must not call back
    /// into the same form.
    pub fn new(
        initial_values: T,
        schema: Option<Arc<dyn Schema<T>>>,
        options: FormOptions<T>,
    ) -> Result<Self, FormError> {
        values::to_object(&initial_values)?;
        Ok(Self {
            state: Arc::new(Mutex::new(FormState::new(initial_values.clone()))),
            initial: Arc::new(initial_values),
            schema,
            options,
        })
    }

    pub fn options(&self) -> &FormOptions<T> {
        &self.options
    }

    pub fn values(&self) -> T {
        self.state.lock().values.clone()
    }

    /// The values captured at construction.
    pub fn initial_values(&self) -> &T {
        &self.initial
    }

    pub fn snapshot(&self) -> FormState<T> {
        self.state.lock().clone()
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.state.lock().errors.get(field).cloned()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.state.lock().is_touched(field)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.state.lock().is_dirty(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().is_submitting
    }

    pub fn submit_count(&self) -> u32 {
        self.state.lock().submit_count
    }

    /// Whether a full schema pass over the current values succeeds.
    ///
    /// Recomputed from the values on every call; recorded errors play no part.
    pub fn is_valid(&self) -> bool {
        let state = self.state.lock();
        self.run_schema(&state.values).success
    }

    /// Value, error and tracking flags of one field.
    pub fn field(&self, field: &str) -> Result<FieldState, FormError> {
        let state = self.state.lock();
        let mut object = values::to_object(&state.values)?;
        let value = object
            .remove(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        Ok(FieldState {
            name: field.to_string(),
            value,
            error: state.errors.get(field).cloned(),
            touched: state.is_touched(field),
            dirty: state.is_dirty(field),
        })
    }

    /// Overwrite one field and mark it dirty.
    ///
    /// With `validate_on_change`, the field is revalidated once the new value
    /// has been committed, so the schema always sees the post-update values.
    pub fn set_value<V: Serialize>(&self, field: &str, value: V) -> Result<(), FormError> {
        let value = values::to_json(value, field)?;
        {
            let mut state = self.state.lock();
            let mut partial = serde_json::Map::new();
            partial.insert(field.to_string(), value);
            state.values = values::merge(&state.values, partial)?;
            state.dirty.insert(field.to_string(), true);
        }
        log::debug!(target: "form", "set value: {field}");

        if self.options.validate_on_change {
            self.after_update(&[field.to_string()]);
        }
        Ok(())
    }

    /// Bulk overwrite from a partial object. Every provided key is marked
    /// dirty; no validation runs.
    pub fn set_values<V: Serialize>(&self, partial: V) -> Result<(), FormError> {
        let partial = values::into_partial(values::to_json(partial, "")?)?;
        let keys: Vec<FieldName> = partial.keys().cloned().collect();

        let mut state = self.state.lock();
        state.values = values::merge(&state.values, partial)?;
        for key in keys {
            state.dirty.insert(key, true);
        }
        Ok(())
    }

    /// Record blur state. Becoming touched triggers a field validation when
    /// `validate_on_blur` is set.
    pub fn set_touched(&self, field: &str, touched: bool) -> Result<(), FormError> {
        {
            let mut state = self.state.lock();
            Self::ensure_field(&state.values, field)?;
            state.touched.insert(field.to_string(), touched);
        }

        if touched && self.options.validate_on_blur {
            self.validate_field(field)?;
        }
        Ok(())
    }

    /// Run the full schema and record the first message per field. Clears all
    /// errors when the values are valid.
    pub fn validate(&self) -> bool {
        let mut state = self.state.lock();
        self.validate_locked(&mut state)
    }

    /// Run the schema but commit only `field`'s error, returning it.
    pub fn validate_field(&self, field: &str) -> Result<Option<String>, FormError> {
        let mut state = self.state.lock();
        Self::ensure_field(&state.values, field)?;

        let outcome = self.run_schema(&state.values);
        let error = outcome.error_for(field).map(str::to_string);
        match &error {
            Some(message) => {
                state.errors.insert(field.to_string(), message.clone());
            }
            None => {
                state.errors.remove(field);
            }
        }
        Ok(error)
    }

    /// Touch every field, validate, count the attempt and, when valid, await
    /// the submit handler with the current values.
    ///
    /// `submit_count` increases even when validation fails. Handler errors are
    /// returned as [`FormError::Submit`]; `is_submitting` is cleared either way.
    pub async fn handle_submit(&self) -> Result<SubmitOutcome, FormError> {
        let values = {
            let mut state = self.state.lock();
            for name in values::field_names(&state.values)? {
                state.touched.insert(name, true);
            }
            let valid = self.validate_locked(&mut state);
            state.submit_count += 1;
            if !valid {
                log::debug!(
                    target: "form",
                    "submit #{} rejected: {} invalid field(s)",
                    state.submit_count,
                    state.errors.len()
                );
                return Ok(SubmitOutcome::Invalid);
            }
            state.values.clone()
        };

        let Some(handler) = self.options.on_submit.clone() else {
            return Ok(SubmitOutcome::Submitted);
        };

        let _guard = SubmittingGuard::arm(&self.state);
        handler(values).await.map_err(FormError::Submit)?;
        Ok(SubmitOutcome::Submitted)
    }

    /// Restore the construction values and clear errors, touched, dirty and
    /// the submit count.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.values = (*self.initial).clone();
        state.clear_tracking();
        log::debug!(target: "form", "reset");
    }

    /// Like [`Form::reset`], with `overrides` merged over the construction values.
    pub fn reset_with<V: Serialize>(&self, overrides: V) -> Result<(), FormError> {
        let overrides = values::into_partial(values::to_json(overrides, "")?)?;
        let values = values::merge(&*self.initial, overrides)?;

        let mut state = self.state.lock();
        state.values = values;
        state.clear_tracking();
        Ok(())
    }

    /// Restore one field to its construction value and forget its error,
    /// touched and dirty entries.
    pub fn reset_field(&self, field: &str) -> Result<(), FormError> {
        let mut initial = values::to_object(&*self.initial)?;
        let value = initial
            .remove(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;

        let mut state = self.state.lock();
        let mut partial = serde_json::Map::new();
        partial.insert(field.to_string(), value);
        state.values = values::merge(&state.values, partial)?;
        state.clear_field(field);
        Ok(())
    }

    /// Post-update effect: revalidate the changed fields against committed state.
    fn after_update(&self, fields: &[FieldName]) {
        for field in fields {
            if let Err(err) = self.validate_field(field) {
                log::warn!(target: "form", "revalidation of {field} failed: {err}");
            }
        }
    }

    fn validate_locked(&self, state: &mut FormState<T>) -> bool {
        let outcome = self.run_schema(&state.values);
        if outcome.success {
            state.errors.clear();
            return true;
        }

        let known = values::field_names(&state.values).unwrap_or_default();
        state.errors = outcome
            .first_error_per_field()
            .into_iter()
            .filter(|(field, _)| known.contains(field))
            .collect();
        false
    }

    fn run_schema(&self, values: &T) -> ValidationOutcome {
        match &self.schema {
            Some(schema) => schema.validate(values),
            None => ValidationOutcome::ok(),
        }
    }

    fn ensure_field(values: &T, field: &str) -> Result<(), FormError> {
        if values::to_object(values)?.contains_key(field) {
            Ok(())
        } else {
            Err(FormError::UnknownField(field.to_string()))
        }
    }
}
