//! Store abstraction: snapshot reads plus guarded atomic transactions.
//!
//! The engine never mutates rows directly. Every state change is expressed as
//! a [`StoreTx`]: a set of guards checked atomically with a set of ops. The
//! backend must apply the whole transaction as one unit, making the first
//! committed transaction the winner of any race (optimistic concurrency).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::error::EngineError;
use crate::core::model::{
    Assignment, AssignmentStatus, Channel, ConfirmationRequest, Installer, InstallerId, Job,
    JobId, JobStatus, ManualTask, ManualTaskKind, RequestStatus, SlotType,
};

/// Precondition checked atomically with the ops of a [`StoreTx`].
///
/// A failing guard rejects the whole transaction: a missing row surfaces as
/// `NotFound`, a row in an unexpected state as `Conflict`.
#[derive(Debug, Clone, PartialEq)]
pub enum TxGuard {
    /// The job must exist and hold the given status.
    JobStatusIs {
        /// Job under guard.
        job_id: JobId,
        /// Required status.
        status: JobStatus,
    },
    /// The request for the triple must exist and hold the given status.
    RequestStatusIs {
        /// Job of the request.
        job_id: JobId,
        /// Installer of the request.
        installer_id: InstallerId,
        /// Channel of the request.
        channel: Channel,
        /// Required status.
        status: RequestStatus,
    },
    /// No pending request may exist for the triple.
    NoPendingRequest {
        /// Job of the request.
        job_id: JobId,
        /// Installer of the request.
        installer_id: InstallerId,
        /// Channel of the request.
        channel: Channel,
    },
    /// The job's accepted-assignment count must be below the limit. Used to
    /// re-check open seats at commit time so a replacement dispatch cannot
    /// race a concurrent accept into overstaffing.
    AcceptedCountBelow {
        /// Job under guard.
        job_id: JobId,
        /// Exclusive upper bound, normally the job's crew size.
        limit: u32,
    },
}

/// One mutation within a [`StoreTx`]. Ops are only applied if every guard of
/// the transaction holds.
#[derive(Debug, Clone, PartialEq)]
pub enum TxOp {
    /// Set a job's lifecycle status.
    SetJobStatus {
        /// Job to update.
        job_id: JobId,
        /// New status.
        status: JobStatus,
    },
    /// Move a job to a new date/slot/crew (reschedule).
    SetJobSchedule {
        /// Job to update.
        job_id: JobId,
        /// New start date.
        date: NaiveDate,
        /// New slot.
        slot: SlotType,
        /// New crew size.
        crew_size: u32,
    },
    /// Set the job's overbooking-resolved flag.
    SetOverbookingResolved {
        /// Job to update.
        job_id: JobId,
        /// New flag value.
        resolved: bool,
    },
    /// Insert a confirmation request, replacing a terminal row for the same
    /// triple if one exists.
    InsertRequest(ConfirmationRequest),
    /// Transition the request for a triple to a new status.
    SetRequestStatus {
        /// Job of the request.
        job_id: JobId,
        /// Installer of the request.
        installer_id: InstallerId,
        /// Channel of the request.
        channel: Channel,
        /// New status.
        status: RequestStatus,
        /// Response timestamp to record, if any.
        responded_at_ms: Option<u128>,
    },
    /// Cancel all pending requests for a (job, installer) pair.
    CancelPendingForPair {
        /// Job of the requests.
        job_id: JobId,
        /// Installer of the requests.
        installer_id: InstallerId,
        /// Response timestamp to record on each cancelled row.
        responded_at_ms: u128,
    },
    /// Cancel all pending requests for a job.
    CancelPendingForJob {
        /// Job of the requests.
        job_id: JobId,
        /// Response timestamp to record on each cancelled row.
        responded_at_ms: u128,
    },
    /// Cancel every request of a job regardless of status. Used on
    /// reschedule, where answers to the superseded schedule no longer bind
    /// anyone.
    CancelRequestsForJob {
        /// Job of the requests.
        job_id: JobId,
        /// Response timestamp to record on rows that had none yet.
        responded_at_ms: u128,
    },
    /// Create or replace the assignment row for its (job, installer) pair.
    UpsertAssignment(Assignment),
    /// Set the status of every assignment of a job currently in
    /// `from_status` to `to_status`. Used to remove accepted assignments on
    /// cancellation or reschedule.
    RetagAssignments {
        /// Job of the assignments.
        job_id: JobId,
        /// Status selecting the rows to update.
        from_status: AssignmentStatus,
        /// Status to write.
        to_status: AssignmentStatus,
    },
    /// Record reconciled hours on the assignment of a pair.
    SetReconciledHours {
        /// Job of the assignment.
        job_id: JobId,
        /// Installer of the assignment.
        installer_id: InstallerId,
        /// Actual/debitable hours.
        hours: f64,
    },
    /// Open a manual task unless a pending one of the same kind already
    /// exists for the job (idempotent).
    OpenManualTask(ManualTask),
    /// Complete all pending manual tasks of a kind for a job.
    CompleteManualTasks {
        /// Job of the tasks.
        job_id: JobId,
        /// Kind of tasks to complete.
        kind: ManualTaskKind,
    },
}

/// A guarded atomic transaction: all guards are checked and all ops applied
/// as one unit, or nothing happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreTx {
    /// Preconditions checked atomically with the ops.
    pub guards: Vec<TxGuard>,
    /// Mutations applied if every guard holds.
    pub ops: Vec<TxOp>,
}

impl StoreTx {
    /// Empty transaction builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard.
    #[must_use]
    pub fn guard(mut self, guard: TxGuard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Add an op.
    #[must_use]
    pub fn op(mut self, op: TxOp) -> Self {
        self.ops.push(op);
        self
    }
}

/// Abstraction for the durable record store.
///
/// Reads are snapshot-consistent queries; exact-time race windows are
/// acceptable because correctness is enforced by [`Store::apply`] guards at
/// commit time, not at query time.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a job by id.
    async fn job(&self, id: JobId) -> Result<Option<Job>, EngineError>;

    /// Fetch an installer by id.
    async fn installer(&self, id: InstallerId) -> Result<Option<Installer>, EngineError>;

    /// All installers, active or not.
    async fn installers(&self) -> Result<Vec<Installer>, EngineError>;

    /// All assignments of a job.
    async fn assignments_for_job(&self, job_id: JobId) -> Result<Vec<Assignment>, EngineError>;

    /// Accepted assignments whose job occupies at least one date in the
    /// inclusive range, paired with their jobs.
    async fn accepted_assignments_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(Assignment, Job)>, EngineError>;

    /// All confirmation requests of a job (latest row per triple).
    async fn requests_for_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<ConfirmationRequest>, EngineError>;

    /// Pending requests created strictly before the cutoff, across all jobs.
    async fn pending_requests_older_than(
        &self,
        cutoff_ms: u128,
    ) -> Result<Vec<ConfirmationRequest>, EngineError>;

    /// All manual tasks of a job.
    async fn manual_tasks_for_job(&self, job_id: JobId)
        -> Result<Vec<ManualTask>, EngineError>;

    /// Apply a guarded transaction atomically.
    async fn apply(&self, tx: StoreTx) -> Result<(), EngineError>;
}
