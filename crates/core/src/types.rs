/// Entity identifiers are UUID v4 strings assigned at creation.
pub type EntityId = String;

/// Job identifiers are UUID v4 strings assigned at submission.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh identifier for an entity or job.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
