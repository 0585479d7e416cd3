//! Job records and their status machine.

use serde::{Deserialize, Serialize};

use nethub_core::types::{new_id, EntityId, JobId, Timestamp};

/// Lifecycle status of a background job.
///
/// The chain is strictly monotonic: `Pending -> Running -> Success | Failed`.
/// Terminal statuses never change and stages are never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted but not yet picked up by the runner.
    Pending,
    /// Stages are executing.
    Running,
    /// Every stage completed.
    Success,
    /// A stage failed; remaining stages were skipped.
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether this status ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }

    /// Whether `self -> next` is a legal move in the status machine.
    pub fn can_transition(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Success)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked background job.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// UUID assigned at submission.
    pub id: JobId,
    /// The registry entity this job operates on.
    pub entity_id: EntityId,
    pub status: JobStatus,
    /// Append-only progress log, in insertion order.
    pub log: Vec<String>,
    /// Set exactly when `status` is `failed`.
    pub error_message: Option<String>,
    /// Stamped at submission.
    pub started_at: Timestamp,
    /// Stamped when the job reaches a terminal status.
    pub completed_at: Option<Timestamp>,
}

impl Job {
    pub fn new(entity_id: impl Into<EntityId>) -> Self {
        Self {
            id: new_id(),
            entity_id: entity_id.into(),
            status: JobStatus::Pending,
            log: Vec::new(),
            error_message: None,
            started_at: chrono::Utc::now(),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_strictly_monotonic() {
        use JobStatus::*;
        let legal = [(Pending, Running), (Running, Success), (Running, Failed)];
        for from in [Pending, Running, Success, Failed] {
            for to in [Pending, Running, Success, Failed] {
                let expected = legal.contains(&(from, to));
                assert_eq!(from.can_transition(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Success.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(JobStatus::Success).unwrap(),
            serde_json::json!("success")
        );
    }

    #[test]
    fn new_job_is_pending_with_empty_log() {
        let job = Job::new("entity-1");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.log.is_empty());
        assert!(job.error_message.is_none());
        assert!(job.completed_at.is_none());
    }
}
