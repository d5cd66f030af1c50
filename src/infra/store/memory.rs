//! In-memory store with guarded atomic transactions.
//!
//! Every [`Store::apply`] runs under a single mutex over the whole state, so
//! a transaction's guards and ops are one linearizable unit. This is the
//! reference semantics a durable backend must reproduce.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::core::error::EngineError;
use crate::core::model::{
    Assignment, AssignmentStatus, Channel, ConfirmationRequest, Installer, InstallerId, Job,
    JobId, ManualTask, ManualTaskStatus, RequestStatus,
};
use crate::core::store::{Store, StoreTx, TxGuard, TxOp};

#[derive(Default)]
struct StoreState {
    jobs: HashMap<JobId, Job>,
    installers: HashMap<InstallerId, Installer>,
    assignments: HashMap<(JobId, InstallerId), Assignment>,
    requests: HashMap<(JobId, InstallerId, Channel), ConfirmationRequest>,
    manual_tasks: Vec<ManualTask>,
}

impl StoreState {
    fn check_guard(&self, guard: &TxGuard) -> Result<(), EngineError> {
        match guard {
            TxGuard::JobStatusIs { job_id, status } => {
                let job = self
                    .jobs
                    .get(job_id)
                    .ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
                if job.status == *status {
                    Ok(())
                } else {
                    Err(EngineError::Conflict(format!(
                        "job {job_id} is {:?}, expected {status:?}",
                        job.status
                    )))
                }
            }
            TxGuard::RequestStatusIs {
                job_id,
                installer_id,
                channel,
                status,
            } => {
                let request = self
                    .requests
                    .get(&(*job_id, *installer_id, *channel))
                    .ok_or_else(|| {
                        EngineError::NotFound(format!(
                            "confirmation request ({job_id}, {installer_id}, {channel:?})"
                        ))
                    })?;
                if request.status == *status {
                    Ok(())
                } else {
                    Err(EngineError::Conflict(format!(
                        "request is {:?}, expected {status:?}",
                        request.status
                    )))
                }
            }
            TxGuard::NoPendingRequest {
                job_id,
                installer_id,
                channel,
            } => {
                let pending = self
                    .requests
                    .get(&(*job_id, *installer_id, *channel))
                    .is_some_and(|r| r.status == RequestStatus::Pending);
                if pending {
                    Err(EngineError::Conflict(format!(
                        "pending request already exists for installer {installer_id}"
                    )))
                } else {
                    Ok(())
                }
            }
            TxGuard::AcceptedCountBelow { job_id, limit } => {
                let accepted = self
                    .assignments
                    .values()
                    .filter(|a| a.job_id == *job_id && a.status == AssignmentStatus::Accepted)
                    .count();
                if accepted < *limit as usize {
                    Ok(())
                } else {
                    Err(EngineError::Conflict(format!(
                        "job {job_id} is already fully staffed"
                    )))
                }
            }
        }
    }

    fn apply_op(&mut self, op: TxOp) {
        match op {
            TxOp::SetJobStatus { job_id, status } => {
                if let Some(job) = self.jobs.get_mut(&job_id) {
                    job.status = status;
                }
            }
            TxOp::SetJobSchedule {
                job_id,
                date,
                slot,
                crew_size,
            } => {
                if let Some(job) = self.jobs.get_mut(&job_id) {
                    job.date = date;
                    job.slot = slot;
                    job.crew_size = crew_size;
                }
            }
            TxOp::SetOverbookingResolved { job_id, resolved } => {
                if let Some(job) = self.jobs.get_mut(&job_id) {
                    job.overbooking_resolved = resolved;
                }
            }
            TxOp::InsertRequest(request) => {
                let key = (request.job_id, request.installer_id, request.channel);
                self.requests.insert(key, request);
            }
            TxOp::SetRequestStatus {
                job_id,
                installer_id,
                channel,
                status,
                responded_at_ms,
            } => {
                if let Some(request) = self.requests.get_mut(&(job_id, installer_id, channel)) {
                    request.status = status;
                    request.responded_at_ms = responded_at_ms;
                }
            }
            TxOp::CancelPendingForPair {
                job_id,
                installer_id,
                responded_at_ms,
            } => {
                for request in self.requests.values_mut() {
                    if request.job_id == job_id
                        && request.installer_id == installer_id
                        && request.status == RequestStatus::Pending
                    {
                        request.status = RequestStatus::Cancelled;
                        request.responded_at_ms = Some(responded_at_ms);
                    }
                }
            }
            TxOp::CancelPendingForJob {
                job_id,
                responded_at_ms,
            } => {
                for request in self.requests.values_mut() {
                    if request.job_id == job_id && request.status == RequestStatus::Pending {
                        request.status = RequestStatus::Cancelled;
                        request.responded_at_ms = Some(responded_at_ms);
                    }
                }
            }
            TxOp::CancelRequestsForJob {
                job_id,
                responded_at_ms,
            } => {
                for request in self.requests.values_mut() {
                    if request.job_id == job_id && request.status != RequestStatus::Cancelled {
                        request.status = RequestStatus::Cancelled;
                        if request.responded_at_ms.is_none() {
                            request.responded_at_ms = Some(responded_at_ms);
                        }
                    }
                }
            }
            TxOp::UpsertAssignment(assignment) => {
                let key = (assignment.job_id, assignment.installer_id);
                self.assignments.insert(key, assignment);
            }
            TxOp::RetagAssignments {
                job_id,
                from_status,
                to_status,
            } => {
                for assignment in self.assignments.values_mut() {
                    if assignment.job_id == job_id && assignment.status == from_status {
                        assignment.status = to_status;
                    }
                }
            }
            TxOp::SetReconciledHours {
                job_id,
                installer_id,
                hours,
            } => {
                if let Some(assignment) = self.assignments.get_mut(&(job_id, installer_id)) {
                    assignment.reconciled_hours = Some(hours);
                }
            }
            TxOp::OpenManualTask(task) => {
                let already_open = self.manual_tasks.iter().any(|t| {
                    t.job_id == task.job_id
                        && t.kind == task.kind
                        && t.status == ManualTaskStatus::Pending
                });
                if !already_open {
                    self.manual_tasks.push(task);
                }
            }
            TxOp::CompleteManualTasks { job_id, kind } => {
                for task in &mut self.manual_tasks {
                    if task.job_id == job_id
                        && task.kind == kind
                        && task.status == ManualTaskStatus::Pending
                    {
                        task.status = ManualTaskStatus::Completed;
                    }
                }
            }
        }
    }
}

/// In-memory store for development and testing.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Seed a job (setup helper; lifecycle mutations go through `apply`).
    pub fn insert_job(&self, job: Job) {
        self.state.lock().jobs.insert(job.id, job);
    }

    /// Seed an installer (administrators own these records).
    pub fn insert_installer(&self, installer: Installer) {
        self.state.lock().installers.insert(installer.id, installer);
    }

    /// Seed an assignment (setup helper for pre-existing commitments).
    pub fn insert_assignment(&self, assignment: Assignment) {
        self.state
            .lock()
            .assignments
            .insert((assignment.job_id, assignment.installer_id), assignment);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn job(&self, id: JobId) -> Result<Option<Job>, EngineError> {
        Ok(self.state.lock().jobs.get(&id).cloned())
    }

    async fn installer(&self, id: InstallerId) -> Result<Option<Installer>, EngineError> {
        Ok(self.state.lock().installers.get(&id).cloned())
    }

    async fn installers(&self) -> Result<Vec<Installer>, EngineError> {
        Ok(self.state.lock().installers.values().cloned().collect())
    }

    async fn assignments_for_job(&self, job_id: JobId) -> Result<Vec<Assignment>, EngineError> {
        Ok(self
            .state
            .lock()
            .assignments
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn accepted_assignments_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(Assignment, Job)>, EngineError> {
        let state = self.state.lock();
        let mut out = Vec::new();
        for assignment in state.assignments.values() {
            if assignment.status != AssignmentStatus::Accepted {
                continue;
            }
            let Some(job) = state.jobs.get(&assignment.job_id) else {
                continue;
            };
            let overlaps = job
                .occupied_dates()
                .iter()
                .any(|date| *date >= from && *date <= to);
            if overlaps {
                out.push((assignment.clone(), job.clone()));
            }
        }
        Ok(out)
    }

    async fn requests_for_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<ConfirmationRequest>, EngineError> {
        Ok(self
            .state
            .lock()
            .requests
            .values()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn pending_requests_older_than(
        &self,
        cutoff_ms: u128,
    ) -> Result<Vec<ConfirmationRequest>, EngineError> {
        Ok(self
            .state
            .lock()
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending && r.created_at_ms < cutoff_ms)
            .cloned()
            .collect())
    }

    async fn manual_tasks_for_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<ManualTask>, EngineError> {
        Ok(self
            .state
            .lock()
            .manual_tasks
            .iter()
            .filter(|t| t.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn apply(&self, tx: StoreTx) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        for guard in &tx.guards {
            state.check_guard(guard)?;
        }
        for op in tx.ops {
            state.apply_op(op);
        }
        Ok(())
    }
}
