//! Shared registry of submitted jobs.

use std::sync::Arc;

use chrono::SecondsFormat;
use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};

use nethub_core::types::JobId;
use nethub_core::CoreError;

use crate::job::{Job, JobStatus};

/// Tracks every submitted job in memory, in submission order.
///
/// Created once at startup and shared behind an `Arc`. Each job carries its
/// own lock, so log appends and status changes for one job serialize
/// without blocking the rest of the tracker. Status changes are validated
/// against the job status machine; an illegal move is an
/// [`CoreError::InvalidState`] and leaves the job untouched.
pub struct JobTracker {
    jobs: RwLock<IndexMap<JobId, Arc<Mutex<Job>>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(IndexMap::new()),
        }
    }

    /// Create a job in `pending` status and return a copy of it.
    ///
    /// `started_at` is stamped here, at submission.
    pub async fn submit(&self, entity_id: impl Into<String>) -> Job {
        let job = Job::new(entity_id);
        self.jobs
            .write()
            .await
            .insert(job.id.clone(), Arc::new(Mutex::new(job.clone())));
        job
    }

    /// Move a pending job to `running`.
    pub async fn start(&self, id: &str) -> Result<(), CoreError> {
        let record = self.record(id).await?;
        let mut job = record.lock().await;
        check_transition(&job, JobStatus::Running)?;
        job.status = JobStatus::Running;
        Ok(())
    }

    /// Append a timestamped line to a job's log.
    ///
    /// Rejected with [`CoreError::InvalidState`] once the job is terminal;
    /// a finished job's log is frozen.
    pub async fn append_log(&self, id: &str, line: impl Into<String>) -> Result<(), CoreError> {
        let record = self.record(id).await?;
        let mut job = record.lock().await;
        if job.status.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "Job {} is {}; its log is frozen",
                job.id, job.status
            )));
        }
        let stamp = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        job.log.push(format!("[{stamp}] {}", line.into()));
        Ok(())
    }

    /// Move a running job to `success` and stamp `completed_at`.
    pub async fn complete(&self, id: &str) -> Result<Job, CoreError> {
        let record = self.record(id).await?;
        let mut job = record.lock().await;
        check_transition(&job, JobStatus::Success)?;
        job.status = JobStatus::Success;
        job.completed_at = Some(chrono::Utc::now());
        Ok(job.clone())
    }

    /// Move a running job to `failed`, recording `error` verbatim.
    pub async fn fail(&self, id: &str, error: impl Into<String>) -> Result<Job, CoreError> {
        let record = self.record(id).await?;
        let mut job = record.lock().await;
        check_transition(&job, JobStatus::Failed)?;
        job.status = JobStatus::Failed;
        job.error_message = Some(error.into());
        job.completed_at = Some(chrono::Utc::now());
        Ok(job.clone())
    }

    /// Fetch a point-in-time copy of a job.
    pub async fn get(&self, id: &str) -> Option<Job> {
        let jobs = self.jobs.read().await;
        let record = jobs.get(id)?;
        let job = record.lock().await;
        Some(job.clone())
    }

    /// All jobs in submission order.
    pub async fn list(&self) -> Vec<Job> {
        let jobs = self.jobs.read().await;
        let mut out = Vec::with_capacity(jobs.len());
        for record in jobs.values() {
            out.push(record.lock().await.clone());
        }
        out
    }

    /// Number of jobs ever submitted; jobs are never evicted.
    pub async fn count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn record(&self, id: &str) -> Result<Arc<Mutex<Job>>, CoreError> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Job",
                id: id.to_string(),
            })
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn check_transition(job: &Job, next: JobStatus) -> Result<(), CoreError> {
    if job.status.can_transition(next) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "Job {} cannot move from {} to {}",
            job.id, job.status, next
        )))
    }
}
