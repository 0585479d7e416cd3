//! Background job lifecycle: submission, stage execution, and tracking.
//!
//! Jobs are fire-and-forget: a handler submits one via [`JobTracker`],
//! spawns [`runner::run_job`] onto the runtime, and returns the pending
//! job to the caller, who polls it to completion.

pub mod job;
pub mod runner;
pub mod stage;
pub mod tracker;

pub use job::{Job, JobStatus};
pub use runner::run_job;
pub use stage::{
    stage_sequence, validate_stages, SimulatedExecutor, StageContext, StageError, StageExecutor,
    DEPLOY_STAGES, SYNC_STAGES,
};
pub use tracker::JobTracker;
