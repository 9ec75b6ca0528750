//! # QueryGate RBAC
//!
//! Resource-action permission evaluator for data store operations.
//!
//! Every intercepted operation (`findMany`, `create`, `upsert`, ...) is mapped
//! to a CRUD action and checked against a static permission table before it
//! reaches the store. Operations nested inside the arguments, such as a
//! `create` on a related resource inside an `update`, are discovered by walking
//! the argument tree and must be granted too.
//!
//! ## Features
//!
//! - **Restricted models**: only listed resources are enforced
//! - **Allow-list**: `resource:action` pairs that bypass the permission table
//! - **Synonyms**: relation fields resolve to canonical resource names
//! - **Mismatch audit**: reports restricted resources without permissions at build time
//! - **Fail closed**: unknown operations on restricted resources are denied
//!
//! ## Example
//!
//! ```rust
//! use querygate_rbac::{Action, PermissionTable, RbacEngine, RbacOptions, SynonymTable};
//! use serde_json::json;
//!
//! # async fn example() -> querygate_rbac::Result<()> {
//! let options = RbacOptions::new()
//!     .with_permissions(
//!         PermissionTable::new()
//!             .grant("user", Action::Create)
//!             .grant("note", Action::Create),
//!     )
//!     .with_restricted_models(["user", "note"])
//!     .with_synonyms(SynonymTable::from_iter([("note", vec!["notes"])]));
//!
//! let engine = RbacEngine::new(options);
//!
//! let args = json!({ "data": { "email": "a@example.com", "notes": { "create": { "title": "hi" } } } });
//! let created = engine
//!     .evaluate("create", "user", args, |args| async move { args })
//!     .await?;
//! assert_eq!(created["data"]["email"], "a@example.com");
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod alias;
pub mod audit;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod nested;
pub mod permissions;
pub mod translate;

// Re-export commonly used types
pub use action::{classify, Action};
pub use alias::{resolve_alias, SynonymTable};
pub use audit::{audit, Mismatch};
pub use client::{GuardedClient, QueryExecutor};
pub use config::RbacOptions;
pub use engine::{Decision, RbacEngine, RbacEngineBuilder};
pub use error::{AuthorizationError, DenialPayload, RbacError, Result};
pub use gate::{AllowList, RestrictedModels, RestrictionGate};
pub use nested::all_nested_authorized;
pub use permissions::{is_granted, PermissionTable};
pub use translate::{TranslateParams, Translator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
