use std::sync::Arc;

use crate::scoring::Scorer;

/// Shared, read-only state injected into every handler.
#[derive(Clone)]
pub struct HandlerState {
    pub scorer: Arc<dyn Scorer>,

    /// The only model name requests may ask for.
    pub model_name: Arc<str>,
}

impl HandlerState {
    pub fn new(scorer: Arc<dyn Scorer>, model_name: impl Into<Arc<str>>) -> Self {
        Self {
            scorer,
            model_name: model_name.into(),
        }
    }

    pub fn serves_model(&self, requested: &str) -> bool {
        *self.model_name == *requested
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("model_name", &self.model_name)
            .field("model_loaded", &self.scorer.is_model_loaded())
            .finish()
    }
}
