//! Drives a submitted job through its stage sequence.

use std::sync::Arc;

use crate::job::JobStatus;
use crate::stage::{StageContext, StageExecutor};
use crate::tracker::JobTracker;

/// Execute `stages` in order for the job named by `ctx`, recording progress
/// in the tracker. Meant to be `tokio::spawn`ed right after submission.
///
/// Stages run sequentially and each successful stage contributes one log
/// line. The first failure appends a failure line, skips every remaining
/// stage, and marks the job failed with the stage's error message verbatim.
/// Returns the job's terminal status.
pub async fn run_job(
    tracker: Arc<JobTracker>,
    executor: Arc<dyn StageExecutor>,
    stages: Vec<String>,
    ctx: StageContext,
) -> JobStatus {
    let job_id = ctx.job_id.clone();

    if let Err(error) = tracker.start(&job_id).await {
        tracing::error!(job_id = %job_id, %error, "Job could not start");
        return JobStatus::Failed;
    }
    tracing::info!(
        job_id = %job_id,
        entity_id = %ctx.entity_id,
        stage_count = stages.len(),
        "Job running"
    );

    for stage in &stages {
        match executor.execute(stage, &ctx).await {
            Ok(line) => {
                if let Err(error) = tracker.append_log(&job_id, line).await {
                    tracing::error!(job_id = %job_id, stage = %stage, %error, "Failed to record stage log");
                }
            }
            Err(stage_error) => {
                let message = stage_error.to_string();
                let failure_line = format!("Stage {stage} failed: {message}");
                if let Err(error) = tracker.append_log(&job_id, failure_line).await {
                    tracing::error!(job_id = %job_id, stage = %stage, %error, "Failed to record failure log");
                }
                match tracker.fail(&job_id, &message).await {
                    Ok(_) => {
                        tracing::warn!(job_id = %job_id, stage = %stage, error = %message, "Job failed")
                    }
                    Err(error) => {
                        tracing::error!(job_id = %job_id, %error, "Failed to mark job failed")
                    }
                }
                return JobStatus::Failed;
            }
        }
    }

    match tracker.complete(&job_id).await {
        Ok(_) => {
            tracing::info!(job_id = %job_id, "Job completed");
            JobStatus::Success
        }
        Err(error) => {
            tracing::error!(job_id = %job_id, %error, "Failed to mark job complete");
            JobStatus::Failed
        }
    }
}
