//! Postgres-backed store adapter (schema and interface stubs).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::error::EngineError;
use crate::core::model::{
    Assignment, ConfirmationRequest, Installer, InstallerId, Job, JobId, ManualTask,
};
use crate::core::store::{Store, StoreTx};

/// Postgres store adapter placeholder.
pub struct PostgresStore;

impl PostgresStore {
    /// Create a new adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Migration statements for the engine's tables. The guarded-transaction
    /// semantics of [`Store::apply`] map to a single `SERIALIZABLE`
    /// transaction checking the guards as `SELECT ... FOR UPDATE` reads.
    #[must_use]
    pub const fn migrations() -> &'static [&'static str] {
        &[
            r"
CREATE TABLE IF NOT EXISTS cd_jobs (
    id UUID PRIMARY KEY,
    date DATE NOT NULL,
    slot JSONB NOT NULL,
    crew_size INT NOT NULL,
    status TEXT NOT NULL,
    declared_hours DOUBLE PRECISION NOT NULL,
    overbooking_resolved BOOLEAN NOT NULL DEFAULT TRUE
);
CREATE TABLE IF NOT EXISTS cd_installers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    priority INT NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    certificate_expires DATE
);
CREATE TABLE IF NOT EXISTS cd_assignments (
    job_id UUID NOT NULL REFERENCES cd_jobs (id),
    installer_id UUID NOT NULL REFERENCES cd_installers (id),
    status TEXT NOT NULL,
    declared_hours DOUBLE PRECISION NOT NULL,
    reconciled_hours DOUBLE PRECISION,
    PRIMARY KEY (job_id, installer_id)
);
CREATE TABLE IF NOT EXISTS cd_confirmation_requests (
    job_id UUID NOT NULL REFERENCES cd_jobs (id),
    installer_id UUID NOT NULL REFERENCES cd_installers (id),
    channel TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at_ms NUMERIC NOT NULL,
    responded_at_ms NUMERIC,
    PRIMARY KEY (job_id, installer_id, channel)
);
CREATE TABLE IF NOT EXISTS cd_manual_tasks (
    id UUID PRIMARY KEY,
    job_id UUID NOT NULL REFERENCES cd_jobs (id),
    kind TEXT NOT NULL,
    note TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at_ms NUMERIC NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cd_assignments_status ON cd_assignments (status);
CREATE INDEX IF NOT EXISTS idx_cd_requests_status ON cd_confirmation_requests (status);
CREATE INDEX IF NOT EXISTS idx_cd_manual_tasks_job ON cd_manual_tasks (job_id, status);
",
        ]
    }

    fn not_wired<T>() -> Result<T, EngineError> {
        Err(EngineError::Backend(
            "postgres store not wired to database client".into(),
        ))
    }
}

impl Default for PostgresStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn job(&self, _id: JobId) -> Result<Option<Job>, EngineError> {
        Self::not_wired()
    }

    async fn installer(&self, _id: InstallerId) -> Result<Option<Installer>, EngineError> {
        Self::not_wired()
    }

    async fn installers(&self) -> Result<Vec<Installer>, EngineError> {
        Self::not_wired()
    }

    async fn assignments_for_job(&self, _job_id: JobId) -> Result<Vec<Assignment>, EngineError> {
        Self::not_wired()
    }

    async fn accepted_assignments_between(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<(Assignment, Job)>, EngineError> {
        Self::not_wired()
    }

    async fn requests_for_job(
        &self,
        _job_id: JobId,
    ) -> Result<Vec<ConfirmationRequest>, EngineError> {
        Self::not_wired()
    }

    async fn pending_requests_older_than(
        &self,
        _cutoff_ms: u128,
    ) -> Result<Vec<ConfirmationRequest>, EngineError> {
        Self::not_wired()
    }

    async fn manual_tasks_for_job(
        &self,
        _job_id: JobId,
    ) -> Result<Vec<ManualTask>, EngineError> {
        Self::not_wired()
    }

    async fn apply(&self, _tx: StoreTx) -> Result<(), EngineError> {
        Self::not_wired()
    }
}
