//! Evaluation orchestrator
//!
//! Runs every intercepted operation through the same pipeline and either
//! forwards it to the data store or rejects it:
//!
//! ```text
//! operation → classify → RestrictionGate ──exempt──────────────→ continuation
//!                              │
//!                              └→ top-level grant → nested walk → continuation
//!                                      ↓ denied        ↓ denied
//!                                  AuthorizationError (top-level resource/action)
//! ```

pub mod decision;

pub use decision::Decision;

use crate::action::{classify, Action};
use crate::alias::SynonymTable;
use crate::audit::{audit, Mismatch, MismatchHandler};
use crate::config::RbacOptions;
use crate::error::{AuthorizationError, Result};
use crate::gate::RestrictionGate;
use crate::nested::NestedWalker;
use crate::permissions::{is_granted, PermissionTable};
use crate::translate::{TranslateParams, Translator};

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds an [`RbacEngine`] and runs the mismatch audit
pub struct RbacEngineBuilder {
    options: RbacOptions,
    translator: Translator,
    mismatch_handler: Option<MismatchHandler>,
}

impl RbacEngineBuilder {
    /// Translation function for denial messages
    pub fn translate<F>(mut self, translate: F) -> Self
    where
        F: Fn(&str, &TranslateParams) -> String + Send + Sync + 'static,
    {
        self.translator = Translator::new(translate);
        self
    }

    /// Called once during `build` with `(missing, redundant)` when some
    /// restricted resource has no permission entry
    pub fn mismatch_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[String], &[String]) + Send + Sync + 'static,
    {
        self.mismatch_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> RbacEngine {
        let RbacOptions {
            permissions,
            restricted_models,
            allowed_actions,
            synonyms,
            debug,
        } = self.options;

        let mismatch = audit(&restricted_models, permissions.as_ref());
        if let Some(mismatch) = &mismatch {
            if !mismatch.redundant.is_empty() {
                debug!("Permissions declared for unrestricted models: {:?}", mismatch.redundant);
            }
            if mismatch.should_report() {
                warn!(
                    "Restricted models without permissions: {:?} (unrestricted with permissions: {:?})",
                    mismatch.missing, mismatch.redundant
                );
                if let Some(handler) = &self.mismatch_handler {
                    handler(&mismatch.missing, &mismatch.redundant);
                }
            }
        }

        info!(
            "RbacEngine initialized with restricted={}, allowed={}, synonyms={}",
            restricted_models.as_list().map_or(0, <[String]>::len),
            allowed_actions.len(),
            synonyms.len()
        );

        RbacEngine {
            permissions,
            synonyms,
            gate: RestrictionGate::new(restricted_models, allowed_actions),
            translator: self.translator,
            mismatch,
            debug,
        }
    }
}

/// Permission evaluator for data store operations.
///
/// Holds immutable configuration only; share it behind an `Arc` and call it
/// from any number of tasks.
#[derive(Debug)]
pub struct RbacEngine {
    permissions: Option<PermissionTable>,
    synonyms: SynonymTable,
    gate: RestrictionGate,
    translator: Translator,
    mismatch: Option<Mismatch>,
    debug: bool,
}

impl RbacEngine {
    pub fn builder(options: RbacOptions) -> RbacEngineBuilder {
        RbacEngineBuilder {
            options,
            translator: Translator::identity(),
            mismatch_handler: None,
        }
    }

    /// Build with the identity translator and no mismatch handler
    pub fn new(options: RbacOptions) -> Self {
        Self::builder(options).build()
    }

    /// Decide whether `operation` on `resource` may run.
    ///
    /// # Pipeline
    ///
    /// 1. Classify the operation. Unknown operations carry no action and fail
    ///    every grant check.
    /// 2. Exempt calls (unrestricted resource, allow-listed pair) proceed.
    /// 3. The top-level action must be granted on `resource`.
    /// 4. Every nested operation in `args` must be granted on its resource.
    ///
    /// Denials from steps 3 and 4 are indistinguishable.
    pub fn decide(&self, operation: &str, resource: &str, args: Option<&Value>) -> Result<Decision> {
        let action = classify(operation);

        if self.debug {
            info!(
                "RBAC check: operation={}, model={}, args={}",
                operation,
                resource,
                args.unwrap_or(&serde_json::Value::Null)
            );
        }

        if self.gate.is_exempt(resource, action) {
            debug!("{} on '{}' exempt from checks", operation, resource);
            return Ok(Decision::Exempt);
        }

        if !is_granted(self.permissions.as_ref(), action, Some(resource)) {
            debug!("{} on '{}' denied", Action::name_or_unknown(action), resource);
            return Err(self.deny(action, resource).into());
        }

        let walker = NestedWalker::new(self.permissions.as_ref(), Some(&self.synonyms));
        if !walker.authorized(resource, args) {
            debug!(
                "{} on '{}' denied by nested operation",
                Action::name_or_unknown(action),
                resource
            );
            return Err(self.deny(action, resource).into());
        }

        Ok(Decision::Granted)
    }

    /// Authorize the operation, then run `proceed` with the unchanged arguments
    /// and return its output.
    pub async fn evaluate<F, Fut, T>(
        &self,
        operation: &str,
        resource: &str,
        args: Value,
        proceed: F,
    ) -> Result<T>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = T>,
    {
        self.decide(operation, resource, Some(&args))?;
        Ok(proceed(args).await)
    }

    /// Synchronous counterpart of [`RbacEngine::evaluate`]
    pub fn evaluate_blocking<F, T>(
        &self,
        operation: &str,
        resource: &str,
        args: Value,
        proceed: F,
    ) -> Result<T>
    where
        F: FnOnce(Value) -> T,
    {
        self.decide(operation, resource, Some(&args))?;
        Ok(proceed(args))
    }

    /// Outcome of the audit run at build time, `None` if it was skipped
    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_ref()
    }

    pub fn permissions(&self) -> Option<&PermissionTable> {
        self.permissions.as_ref()
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn gate(&self) -> &RestrictionGate {
        &self.gate
    }

    fn deny(&self, action: Option<Action>, resource: &str) -> AuthorizationError {
        let message = self.translator.no_permission(action, resource);
        AuthorizationError::new(action, resource, message)
    }
}
