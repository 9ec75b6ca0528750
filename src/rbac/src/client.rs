//! Guarded data store client
//!
//! Attaches the evaluator in front of every operation of a wrapped executor.

use crate::config::RbacOptions;
use crate::engine::RbacEngine;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Data store that runs operations on behalf of the guarded client
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `operation` on `model` with `args`
    async fn execute(&self, model: &str, operation: &str, args: Value) -> Result<Value>;
}

/// Executor wrapper that authorizes every call before forwarding it
pub struct GuardedClient<E> {
    engine: Arc<RbacEngine>,
    executor: E,
}

impl<E: QueryExecutor> GuardedClient<E> {
    /// Build an engine from `options` and wrap `executor` with it
    pub fn new(options: RbacOptions, executor: E) -> Self {
        Self::with_engine(Arc::new(RbacEngine::new(options)), executor)
    }

    pub fn with_engine(engine: Arc<RbacEngine>, executor: E) -> Self {
        Self { engine, executor }
    }

    pub fn engine(&self) -> &Arc<RbacEngine> {
        &self.engine
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Model-scoped handle, `client.model("user").create(args)`
    pub fn model<'a>(&'a self, model: &'a str) -> ModelClient<'a, E> {
        ModelClient { client: self, model }
    }
}

#[async_trait]
impl<E: QueryExecutor> QueryExecutor for GuardedClient<E> {
    async fn execute(&self, model: &str, operation: &str, args: Value) -> Result<Value> {
        self.engine
            .evaluate(operation, model, args, |args| {
                self.executor.execute(model, operation, args)
            })
            .await?
    }
}

/// Operations on a single model of a [`GuardedClient`]
pub struct ModelClient<'a, E> {
    client: &'a GuardedClient<E>,
    model: &'a str,
}

impl<'a, E: QueryExecutor> ModelClient<'a, E> {
    pub async fn run(&self, operation: &str, args: Value) -> Result<Value> {
        self.client.execute(self.model, operation, args).await
    }

    pub async fn create(&self, args: Value) -> Result<Value> {
        self.run("create", args).await
    }

    pub async fn find_many(&self, args: Value) -> Result<Value> {
        self.run("findMany", args).await
    }

    pub async fn find_unique(&self, args: Value) -> Result<Value> {
        self.run("findUnique", args).await
    }

    pub async fn update(&self, args: Value) -> Result<Value> {
        self.run("update", args).await
    }

    pub async fn upsert(&self, args: Value) -> Result<Value> {
        self.run("upsert", args).await
    }

    pub async fn delete(&self, args: Value) -> Result<Value> {
        self.run("delete", args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::error::RbacError;
    use crate::permissions::PermissionTable;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl QueryExecutor for Echo {
        async fn execute(&self, model: &str, operation: &str, args: Value) -> Result<Value> {
            if operation == "fail" {
                return Err(RbacError::Query("boom".to_string()));
            }
            Ok(json!({ "model": model, "operation": operation, "args": args }))
        }
    }

    fn client() -> GuardedClient<Echo> {
        GuardedClient::new(
            RbacOptions::new()
                .with_permissions(PermissionTable::new().grant("user", Action::Read))
                .with_restricted_models(["user"]),
            Echo,
        )
    }

    #[tokio::test]
    async fn test_forwards_granted_operation() {
        let client = client();
        let result = client.model("user").find_many(json!({ "take": 1 })).await.unwrap();
        assert_eq!(
            result,
            json!({ "model": "user", "operation": "findMany", "args": { "take": 1 } })
        );
    }

    #[tokio::test]
    async fn test_denied_operation_never_reaches_executor() {
        let client = client();
        let err = client.model("user").delete(json!({ "where": { "id": 1 } })).await.unwrap_err();
        assert!(matches!(err, RbacError::Denied(_)));
    }

    #[tokio::test]
    async fn test_executor_errors_propagate() {
        let client = client();
        let err = client.execute("note", "fail", json!({})).await.unwrap_err();
        assert!(matches!(err, RbacError::Query(msg) if msg == "boom"));
    }
}
