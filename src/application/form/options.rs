use crate::infra::app_config::AppConfig;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Async handler invoked with the full value set on a valid submit.
pub type SubmitHandler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Behaviour switches for a form.
pub struct FormOptions<T> {
    /// Revalidate a field every time its value changes.
    pub validate_on_change: bool,
    /// Revalidate a field when it becomes touched.
    pub validate_on_blur: bool,
    pub on_submit: Option<SubmitHandler<T>>,
}

impl<T> Default for FormOptions<T> {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            validate_on_blur: true,
            on_submit: None,
        }
    }
}

impl<T> Clone for FormOptions<T> {
    fn clone(&self) -> Self {
        Self {
            validate_on_change: self.validate_on_change,
            validate_on_blur: self.validate_on_blur,
            on_submit: self.on_submit.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FormOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOptions")
            .field("validate_on_change", &self.validate_on_change)
            .field("validate_on_blur", &self.validate_on_blur)
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

impl<T: Send + 'static> FormOptions<T> {
    /// Validation defaults taken from the app configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            validate_on_change: config.validate_on_change,
            validate_on_blur: config.validate_on_blur,
            on_submit: None,
        }
    }

    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }

    pub fn validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    pub fn on_submit<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: SubmitHandler<T> =
            Arc::new(move |values: T| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(handler(values))
            });
        self.on_submit = Some(handler);
        self
    }
}
