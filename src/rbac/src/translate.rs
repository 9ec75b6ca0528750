//! Error message translation

use crate::action::Action;
use crate::error::FORBIDDEN_STATUS;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Interpolation parameters passed to a translation function
pub type TranslateParams = HashMap<String, Value>;

/// Translation key of the denial message
pub const NO_PERMISSION_KEY: &str = "errors.noPermission";

type TranslateFn = dyn Fn(&str, &TranslateParams) -> String + Send + Sync;

/// Renders translation keys to text. Defaults to returning the key itself.
#[derive(Clone)]
pub struct Translator {
    inner: Option<Arc<TranslateFn>>,
}

impl Translator {
    /// Identity translator
    pub fn identity() -> Self {
        Self { inner: None }
    }

    pub fn new<F>(translate: F) -> Self
    where
        F: Fn(&str, &TranslateParams) -> String + Send + Sync + 'static,
    {
        Self {
            inner: Some(Arc::new(translate)),
        }
    }

    pub fn translate(&self, key: &str, params: &TranslateParams) -> String {
        match &self.inner {
            Some(translate) => translate(key, params),
            None => key.to_string(),
        }
    }

    /// Message for a denied `action` on `resource`
    pub fn no_permission(&self, action: Option<Action>, resource: &str) -> String {
        let empty = TranslateParams::new();
        let operation = self.translate(
            &format!("operations.{}", Action::name_or_unknown(action)),
            &empty,
        );
        let model = self.translate(&format!("models.{}", resource), &empty);

        let params = TranslateParams::from([
            ("operation".to_string(), json!(operation)),
            ("model".to_string(), json!(model)),
            ("status".to_string(), json!(FORBIDDEN_STATUS)),
        ]);
        self.translate(NO_PERMISSION_KEY, &params)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("custom", &self.inner.is_some())
            .finish()
    }
}
