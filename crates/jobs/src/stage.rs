//! Pipeline stages and the executor seam.
//!
//! A job is a sequence of named stages. What a stage actually *does* is
//! behind the [`StageExecutor`] trait so the HTTP layer and the runner stay
//! independent of it; the default [`SimulatedExecutor`] just sleeps and
//! narrates, which is enough for development and for exercising the whole
//! lifecycle in tests.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use nethub_core::types::{EntityId, JobId};
use nethub_core::CoreError;

// ---------------------------------------------------------------------------
// Stage names
// ---------------------------------------------------------------------------

pub const STAGE_CONNECT: &str = "connect";
pub const STAGE_APPLY: &str = "apply";
pub const STAGE_VERIFY: &str = "verify";
pub const STAGE_PULL: &str = "pull";
pub const STAGE_PARSE: &str = "parse";
pub const STAGE_VALIDATE: &str = "validate";

/// Stage sequence for deploying a config to a device.
pub const DEPLOY_STAGES: &[&str] = &[STAGE_CONNECT, STAGE_APPLY, STAGE_VERIFY];

/// Stage sequence for syncing an automation repository.
pub const SYNC_STAGES: &[&str] = &[STAGE_PULL, STAGE_PARSE, STAGE_VALIDATE];

/// Check a caller-supplied stage sequence: it must be non-empty and every
/// stage name must be non-blank.
pub fn validate_stages(stages: &[String]) -> Result<(), CoreError> {
    if stages.is_empty() {
        return Err(CoreError::Validation(
            "Job must have at least one stage".to_string(),
        ));
    }
    if stages.iter().any(|s| s.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Stage names must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Convert a static stage table into the owned form the runner takes.
pub fn stage_sequence(stages: &[&str]) -> Vec<String> {
    stages.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Execution seam
// ---------------------------------------------------------------------------

/// Everything a stage gets to see about the job it runs under.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub job_id: JobId,
    /// The registry entity the job operates on.
    pub entity_id: EntityId,
    /// Free-form parameters captured at submission (deploy target, repo
    /// url, ...). `Null` when the caller supplied none.
    pub params: Value,
}

impl StageContext {
    /// Fetch a string parameter, if present.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// A stage failure. The message is what lands verbatim in the job's
/// `error_message`.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StageError(pub String);

/// Executes one named stage of a job.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// Run `stage` and return its log line.
    async fn execute(&self, stage: &str, ctx: &StageContext) -> Result<String, StageError>;
}

/// Default executor: sleeps for a fixed delay per stage and produces a
/// narration line. Never fails.
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StageExecutor for SimulatedExecutor {
    async fn execute(&self, stage: &str, ctx: &StageContext) -> Result<String, StageError> {
        tokio::time::sleep(self.delay).await;
        Ok(narration(stage, ctx))
    }
}

fn narration(stage: &str, ctx: &StageContext) -> String {
    match stage {
        STAGE_CONNECT => {
            let target = ctx.param_str("target_device").unwrap_or(&ctx.entity_id);
            format!("Connecting to {target}")
        }
        STAGE_APPLY => match ctx.param_str("config_name") {
            Some(name) => format!("Applying configuration: {name}"),
            None => "Applying configuration".to_string(),
        },
        STAGE_VERIFY => {
            let target = ctx.param_str("target_device").unwrap_or(&ctx.entity_id);
            format!("Verifying configuration on {target}")
        }
        STAGE_PULL => {
            let url = ctx.param_str("url").unwrap_or("origin");
            let branch = ctx.param_str("branch").unwrap_or("main");
            format!("Pulling from {url} ({branch})")
        }
        STAGE_PARSE => "Parsing configuration files".to_string(),
        STAGE_VALIDATE => "Validating configurations".to_string(),
        other => format!("Running stage {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn ctx(params: Value) -> StageContext {
        StageContext {
            job_id: "job-1".to_string(),
            entity_id: "entity-1".to_string(),
            params,
        }
    }

    #[test]
    fn rejects_empty_stage_sequence() {
        let err = validate_stages(&[]).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn rejects_blank_stage_names() {
        let stages = vec!["connect".to_string(), "  ".to_string()];
        let err = validate_stages(&stages).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn accepts_known_stage_tables() {
        assert!(validate_stages(&stage_sequence(DEPLOY_STAGES)).is_ok());
        assert!(validate_stages(&stage_sequence(SYNC_STAGES)).is_ok());
    }

    #[tokio::test]
    async fn simulated_executor_narrates_deploy_stages() {
        let executor = SimulatedExecutor::new(Duration::ZERO);
        let ctx = ctx(json!({"target_device": "core-rtr-1", "config_name": "edge-acl"}));

        let line = executor.execute(STAGE_CONNECT, &ctx).await.unwrap();
        assert_eq!(line, "Connecting to core-rtr-1");
        let line = executor.execute(STAGE_APPLY, &ctx).await.unwrap();
        assert_eq!(line, "Applying configuration: edge-acl");
        let line = executor.execute(STAGE_VERIFY, &ctx).await.unwrap();
        assert_eq!(line, "Verifying configuration on core-rtr-1");
    }

    #[tokio::test]
    async fn simulated_executor_falls_back_without_params() {
        let executor = SimulatedExecutor::new(Duration::ZERO);
        let ctx = ctx(Value::Null);

        let line = executor.execute(STAGE_CONNECT, &ctx).await.unwrap();
        assert_eq!(line, "Connecting to entity-1");
        let line = executor.execute("reboot", &ctx).await.unwrap();
        assert_eq!(line, "Running stage reboot");
    }
}
