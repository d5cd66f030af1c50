//! The assignment engine: confirmation dispatch, the accept/decline/cancel
//! state machine, administrative transitions, and hour reconciliation.
//!
//! Every entry point is safe to execute concurrently with any other. The
//! engine owns no event loop; it is invoked by independent triggers (an
//! in-app action, a chat-bot callback, a scheduled reconciliation run) and
//! each call completes or fails against durable store state before returning.
//! All mutations flow through guarded [`StoreTx`] transactions, so the first
//! transaction to commit wins any race and the loser observes a clean
//! `Conflict`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditSink};
use crate::core::availability;
use crate::core::error::EngineError;
use crate::core::model::{
    Assignment, AssignmentStatus, Channel, ConfirmationRequest, Installer, InstallerId, Job,
    JobId, JobStatus, ManualTask, ManualTaskKind, ManualTaskStatus, RequestStatus, SlotType,
};
use crate::core::notify::Notifier;
use crate::core::selector::select_candidates;
use crate::core::store::{Store, StoreTx, TxGuard, TxOp};
use crate::util::clock::now_ms;

/// Operating policy for the engine, mapped from configuration.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Channels a confirmation request is created on per dispatch.
    pub channels: Vec<Channel>,
    /// Allowed divergence between declared and reconciled hours before a job
    /// is flagged for manual review.
    pub overbooking_tolerance_hours: f64,
}

/// An installer's answer to a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// Take the seat.
    Accept,
    /// Turn the seat down.
    Decline,
}

/// Result of a dispatch round.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Requests created, one entry per (installer, channel).
    pub dispatched: Vec<(InstallerId, Channel)>,
    /// Channels that failed outbound delivery. Non-fatal: the requests stay
    /// pending and answerable in-app.
    pub delivery_failures: Vec<(InstallerId, Channel)>,
    /// Seats for which no eligible candidate remained. A non-zero shortfall
    /// opens an `InsufficientCandidates` manual task.
    pub shortfall: usize,
}

/// Result of resolving an installer response.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The request was accepted and the assignment committed.
    Accepted {
        /// Whether the job's crew is now fully staffed.
        fully_staffed: bool,
        /// Dispatch round run for any remaining open seats.
        followup: DispatchOutcome,
    },
    /// The pair was already accepted; duplicate deliveries are no-ops.
    AlreadyAccepted,
    /// The request was declined; the cascade ran one re-dispatch round.
    Declined {
        /// Replacement dispatch for the vacated seat.
        followup: DispatchOutcome,
    },
}

/// Result of post-completion hour reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Reconciled hours are within tolerance of the declared hours.
    WithinTolerance,
    /// Divergence exceeded tolerance; the job is flagged and a manual task
    /// is open until an administrator records resolution.
    Flagged {
        /// Absolute divergence in hours.
        divergence_hours: f64,
    },
    /// The job was already reconciled and resolved; nothing to do.
    AlreadyResolved,
}

/// The installer assignment and confirmation engine.
///
/// Holds the store and notifier seams plus an optional audit sink. Cheap to
/// clone behind `Arc`s; hold one per process and call it from any trigger.
pub struct AssignmentEngine {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    policy: EnginePolicy,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl std::fmt::Debug for AssignmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AssignmentEngine {
    /// Create a new engine from its collaborators.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, policy: EnginePolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Installers free per date for the given inclusive range and slot.
    pub async fn availability(
        &self,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
        slot: SlotType,
    ) -> Result<availability::AvailabilityByDate, EngineError> {
        availability::available_installers(self.store.as_ref(), from, to, slot).await
    }

    /// Run one dispatch round for a job: for each open seat, pick the next
    /// unexhausted candidate, create a pending request per configured
    /// channel, and hand off to the notification collaborators.
    ///
    /// Idempotent: never creates a second pending request for a (job,
    /// installer) while one is outstanding, and counts in-flight pendings
    /// against open seats so re-entry is a no-op. Delivery failures are
    /// surfaced in the outcome as non-fatal warnings.
    pub async fn dispatch(&self, job_id: JobId) -> Result<DispatchOutcome, EngineError> {
        let job = self.require_job(job_id).await?;
        if job.status != JobStatus::Scheduled {
            return Err(EngineError::Conflict(format!(
                "job {job_id} is not scheduled"
            )));
        }

        let assignments = self.store.assignments_for_job(job_id).await?;
        let requests = self.store.requests_for_job(job_id).await?;

        let accepted = count_accepted(&assignments);
        let in_flight: HashSet<InstallerId> = requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .map(|r| r.installer_id)
            .collect();
        let open = (job.crew_size as usize)
            .saturating_sub(accepted)
            .saturating_sub(in_flight.len());
        if open == 0 {
            tracing::debug!("job {} has no open seats, dispatch is a no-op", job_id);
            return Ok(DispatchOutcome::default());
        }

        // Priority and capability are read fresh every round; never cached
        // across a dispatch cycle.
        let available = availability::available_for_job(self.store.as_ref(), &job).await?;
        let excluded = exhausted_installers(&requests, &assignments);
        let selection = select_candidates(&available, &excluded, open);

        let mut outcome = DispatchOutcome {
            shortfall: selection.shortfall,
            ..DispatchOutcome::default()
        };

        for candidate in selection.candidates {
            match self.dispatch_to(&job, &candidate, &mut outcome).await {
                Ok(()) => {}
                // This candidate lost a race against a concurrent
                // transition; the remaining candidates of the round are
                // still independently guarded.
                Err(EngineError::Conflict(reason)) => {
                    tracing::debug!(
                        "skipping dispatch to {} for job {}: {}",
                        candidate.id,
                        job_id,
                        reason
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        if outcome.shortfall > 0 {
            self.open_manual_task(
                &job,
                ManualTaskKind::InsufficientCandidates,
                format!(
                    "{} seat(s) on {} have no eligible installer left",
                    outcome.shortfall, job.date
                ),
            )
            .await?;
        }

        Ok(outcome)
    }

    /// Resolve an installer's answer received over some channel.
    ///
    /// The caller must have authenticated the responder as the claimed
    /// installer; the engine rejects responses to requests that are not
    /// pending or that belong to someone else (`NotFound`/`Conflict`), never
    /// silently accepting them.
    pub async fn respond(
        &self,
        job_id: JobId,
        installer_id: InstallerId,
        channel: Channel,
        action: ResponseAction,
    ) -> Result<Resolution, EngineError> {
        let job = self.require_job(job_id).await?;
        let assignments = self.store.assignments_for_job(job_id).await?;

        if action == ResponseAction::Accept && is_accepted(&assignments, installer_id) {
            // Duplicate webhook delivery or double-click; success, no effect.
            tracing::info!(
                "installer {} re-accepted job {}, no-op",
                installer_id,
                job_id
            );
            self.record_audit(job_id, Some(installer_id), "reaccept", None);
            return Ok(Resolution::AlreadyAccepted);
        }

        let requests = self.store.requests_for_job(job_id).await?;
        let request = requests
            .iter()
            .find(|r| r.installer_id == installer_id && r.channel == channel)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "no confirmation request for installer {installer_id} on job {job_id}"
                ))
            })?;
        if request.status != RequestStatus::Pending {
            return Err(EngineError::Conflict(
                "confirmation request is no longer pending".into(),
            ));
        }

        match action {
            ResponseAction::Accept => self.apply_accept(&job, installer_id, channel).await,
            ResponseAction::Decline => self.apply_decline(&job, installer_id, channel).await,
        }
    }

    /// Administratively cancel a job: withdraw every pending request, remove
    /// accepted assignments, and mark the job cancelled. No decline
    /// notifications are sent. Idempotent for an already-cancelled job; a
    /// concurrent accept and this cancel race cleanly, first commit wins.
    pub async fn cancel_job(&self, job_id: JobId) -> Result<(), EngineError> {
        let job = self.require_job(job_id).await?;
        if job.status == JobStatus::Cancelled {
            return Ok(());
        }

        let now = now_ms();
        let tx = StoreTx::new()
            .guard(TxGuard::JobStatusIs {
                job_id,
                status: JobStatus::Scheduled,
            })
            .op(TxOp::CancelPendingForJob {
                job_id,
                responded_at_ms: now,
            })
            .op(TxOp::RetagAssignments {
                job_id,
                from_status: AssignmentStatus::Accepted,
                to_status: AssignmentStatus::Removed,
            })
            .op(TxOp::SetJobStatus {
                job_id,
                status: JobStatus::Cancelled,
            });
        self.store.apply(tx).await?;

        tracing::info!("job {} cancelled, outstanding requests withdrawn", job_id);
        self.record_audit(job_id, None, "cancel", None);
        Ok(())
    }

    /// Move a job to a new date/slot/crew. Every request for the superseded
    /// schedule is withdrawn (answers to the old date bind nobody) and
    /// accepted assignments are removed, then a fresh dispatch round runs
    /// for the new schedule.
    pub async fn reschedule_job(
        &self,
        job_id: JobId,
        date: chrono::NaiveDate,
        slot: SlotType,
        crew_size: u32,
    ) -> Result<DispatchOutcome, EngineError> {
        self.require_job(job_id).await?;

        let tx = StoreTx::new()
            .guard(TxGuard::JobStatusIs {
                job_id,
                status: JobStatus::Scheduled,
            })
            .op(TxOp::CancelRequestsForJob {
                job_id,
                responded_at_ms: now_ms(),
            })
            .op(TxOp::RetagAssignments {
                job_id,
                from_status: AssignmentStatus::Accepted,
                to_status: AssignmentStatus::Removed,
            })
            .op(TxOp::SetJobSchedule {
                job_id,
                date,
                slot,
                crew_size,
            });
        self.store.apply(tx).await?;

        tracing::info!("job {} rescheduled to {}", job_id, date);
        self.record_audit(job_id, None, "reschedule", Some(date.to_string()));
        self.dispatch(job_id).await
    }

    /// Mark a job completed. Any still-pending requests are withdrawn; the
    /// job becomes eligible for hour reconciliation. Idempotent.
    pub async fn complete_job(&self, job_id: JobId) -> Result<(), EngineError> {
        let job = self.require_job(job_id).await?;
        if job.status == JobStatus::Completed {
            return Ok(());
        }

        let tx = StoreTx::new()
            .guard(TxGuard::JobStatusIs {
                job_id,
                status: JobStatus::Scheduled,
            })
            .op(TxOp::CancelPendingForJob {
                job_id,
                responded_at_ms: now_ms(),
            })
            .op(TxOp::SetJobStatus {
                job_id,
                status: JobStatus::Completed,
            });
        self.store.apply(tx).await?;

        tracing::info!("job {} completed", job_id);
        self.record_audit(job_id, None, "complete", None);
        Ok(())
    }

    /// Reconcile declared against actual hours after completion.
    ///
    /// Records the actual/debitable hours on each accepted assignment and
    /// compares the total against the job's declared hours. Divergence
    /// beyond the configured tolerance clears `overbooking_resolved` and
    /// opens (or leaves open) a manual task. Re-running on an
    /// already-resolved job is a no-op.
    pub async fn reconcile(
        &self,
        job_id: JobId,
        actual_hours: &HashMap<InstallerId, f64>,
    ) -> Result<ReconcileOutcome, EngineError> {
        let job = self.require_job(job_id).await?;
        if job.status != JobStatus::Completed {
            return Err(EngineError::Conflict(format!(
                "job {job_id} is not completed, cannot reconcile"
            )));
        }

        let assignments = self.store.assignments_for_job(job_id).await?;
        let accepted: Vec<&Assignment> = assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Accepted)
            .collect();

        let already_reconciled =
            !accepted.is_empty() && accepted.iter().all(|a| a.reconciled_hours.is_some());
        if already_reconciled {
            if job.overbooking_resolved {
                return Ok(ReconcileOutcome::AlreadyResolved);
            }
            // Flagged and awaiting the administrator; leave the task open.
            let total: f64 = accepted.iter().filter_map(|a| a.reconciled_hours).sum();
            return Ok(ReconcileOutcome::Flagged {
                divergence_hours: (total - job.declared_hours).abs(),
            });
        }

        let mut tx = StoreTx::new().guard(TxGuard::JobStatusIs {
            job_id,
            status: JobStatus::Completed,
        });
        let mut total_actual = 0.0;
        for assignment in &accepted {
            let hours = actual_hours
                .get(&assignment.installer_id)
                .copied()
                .ok_or_else(|| {
                    EngineError::NotFound(format!(
                        "no actual hours recorded for installer {}",
                        assignment.installer_id
                    ))
                })?;
            total_actual += hours;
            tx = tx.op(TxOp::SetReconciledHours {
                job_id,
                installer_id: assignment.installer_id,
                hours,
            });
        }

        let divergence = (total_actual - job.declared_hours).abs();
        if divergence > self.policy.overbooking_tolerance_hours {
            tx = tx
                .op(TxOp::SetOverbookingResolved {
                    job_id,
                    resolved: false,
                })
                .op(TxOp::OpenManualTask(ManualTask {
                    id: uuid::Uuid::new_v4(),
                    job_id,
                    kind: ManualTaskKind::OverbookedHours,
                    note: format!(
                        "declared {:.1}h, reconciled {total_actual:.1}h",
                        job.declared_hours
                    ),
                    status: ManualTaskStatus::Pending,
                    created_at_ms: now_ms(),
                }));
            self.store.apply(tx).await?;

            tracing::warn!(
                "job {} overbooked by {:.1}h, flagged for manual review",
                job_id,
                divergence
            );
            self.record_audit(
                job_id,
                None,
                "reconcile",
                Some(format!("divergence {divergence:.1}h")),
            );
            return Ok(ReconcileOutcome::Flagged {
                divergence_hours: divergence,
            });
        }

        self.store.apply(tx).await?;
        tracing::info!("job {} reconciled within tolerance", job_id);
        self.record_audit(job_id, None, "reconcile", None);
        Ok(ReconcileOutcome::WithinTolerance)
    }

    /// Record an administrator's resolution of an overbooked job: restores
    /// the resolved flag and completes the open manual task. Idempotent.
    pub async fn resolve_overbooking(&self, job_id: JobId) -> Result<(), EngineError> {
        let job = self.require_job(job_id).await?;
        if job.overbooking_resolved {
            return Ok(());
        }

        let tx = StoreTx::new()
            .op(TxOp::SetOverbookingResolved {
                job_id,
                resolved: true,
            })
            .op(TxOp::CompleteManualTasks {
                job_id,
                kind: ManualTaskKind::OverbookedHours,
            });
        self.store.apply(tx).await?;

        self.record_audit(job_id, None, "resolve", None);
        Ok(())
    }

    /// Mark pending requests created before the cutoff as expired (the
    /// installer never answered and is not asked again for this job), then
    /// run a replacement dispatch round for each affected job so the seat
    /// cascades to the next-ranked candidate. Returns the number of
    /// requests expired.
    pub async fn expire_pending(&self, cutoff_ms: u128) -> Result<usize, EngineError> {
        let stale = self.store.pending_requests_older_than(cutoff_ms).await?;
        let mut expired = 0usize;
        let mut jobs: Vec<JobId> = Vec::new();

        for request in stale {
            let tx = StoreTx::new()
                .guard(TxGuard::RequestStatusIs {
                    job_id: request.job_id,
                    installer_id: request.installer_id,
                    channel: request.channel,
                    status: RequestStatus::Pending,
                })
                .op(TxOp::SetRequestStatus {
                    job_id: request.job_id,
                    installer_id: request.installer_id,
                    channel: request.channel,
                    status: RequestStatus::Expired,
                    responded_at_ms: Some(now_ms()),
                });
            match self.store.apply(tx).await {
                Ok(()) => {
                    expired += 1;
                    if !jobs.contains(&request.job_id) {
                        jobs.push(request.job_id);
                    }
                }
                // Answered or withdrawn between the snapshot and now.
                Err(EngineError::Conflict(_) | EngineError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        for job_id in jobs {
            if let Some(job) = self.store.job(job_id).await? {
                if job.status == JobStatus::Scheduled {
                    self.dispatch(job_id).await?;
                }
            }
        }

        if expired > 0 {
            tracing::warn!("expired {} stale confirmation requests", expired);
        }
        Ok(expired)
    }

    async fn apply_accept(
        &self,
        job: &Job,
        installer_id: InstallerId,
        channel: Channel,
    ) -> Result<Resolution, EngineError> {
        let job_id = job.id;
        let now = now_ms();

        // Accept transition, sibling cancellation, and assignment upsert are
        // one atomic unit; the pending guard makes a racing cancel (or a
        // second accept for the last seat) lose cleanly.
        let tx = StoreTx::new()
            .guard(TxGuard::RequestStatusIs {
                job_id,
                installer_id,
                channel,
                status: RequestStatus::Pending,
            })
            .guard(TxGuard::JobStatusIs {
                job_id,
                status: JobStatus::Scheduled,
            })
            .guard(TxGuard::AcceptedCountBelow {
                job_id,
                limit: job.crew_size,
            })
            .op(TxOp::SetRequestStatus {
                job_id,
                installer_id,
                channel,
                status: RequestStatus::Accepted,
                responded_at_ms: Some(now),
            })
            .op(TxOp::CancelPendingForPair {
                job_id,
                installer_id,
                responded_at_ms: now,
            })
            .op(TxOp::UpsertAssignment(Assignment {
                job_id,
                installer_id,
                status: AssignmentStatus::Accepted,
                declared_hours: job.declared_hours_per_person(),
                reconciled_hours: None,
            }));
        self.store.apply(tx).await?;

        tracing::info!("installer {} accepted job {}", installer_id, job_id);
        self.record_audit(job_id, Some(installer_id), "accept", None);

        let assignments = self.store.assignments_for_job(job_id).await?;
        let fully_staffed = count_accepted(&assignments) >= job.crew_size as usize;
        // The accept is already durable; if the job was cancelled or
        // rescheduled in the meantime there is nothing left to dispatch.
        let followup = match self.store.job(job_id).await? {
            Some(j) if !fully_staffed && j.status == JobStatus::Scheduled => {
                self.dispatch(job_id).await?
            }
            _ => DispatchOutcome::default(),
        };

        Ok(Resolution::Accepted {
            fully_staffed,
            followup,
        })
    }

    async fn apply_decline(
        &self,
        job: &Job,
        installer_id: InstallerId,
        channel: Channel,
    ) -> Result<Resolution, EngineError> {
        let job_id = job.id;
        let now = now_ms();

        // Siblings are cancelled too: a declined installer must not be able
        // to accept later through a stale request on another channel.
        let tx = StoreTx::new()
            .guard(TxGuard::RequestStatusIs {
                job_id,
                installer_id,
                channel,
                status: RequestStatus::Pending,
            })
            .op(TxOp::SetRequestStatus {
                job_id,
                installer_id,
                channel,
                status: RequestStatus::Declined,
                responded_at_ms: Some(now),
            })
            .op(TxOp::CancelPendingForPair {
                job_id,
                installer_id,
                responded_at_ms: now,
            });
        self.store.apply(tx).await?;

        tracing::info!("installer {} declined job {}", installer_id, job_id);
        self.record_audit(job_id, Some(installer_id), "decline", None);

        // One replacement round per decline keeps the cascade a bounded
        // loop: declined installers are excluded from re-selection, so the
        // candidate list strictly shrinks.
        let followup = match self.store.job(job_id).await? {
            Some(j) if j.status == JobStatus::Scheduled => self.dispatch(job_id).await?,
            _ => DispatchOutcome::default(),
        };

        Ok(Resolution::Declined { followup })
    }

    async fn dispatch_to(
        &self,
        job: &Job,
        candidate: &Installer,
        outcome: &mut DispatchOutcome,
    ) -> Result<(), EngineError> {
        let now = now_ms();
        let mut tx = StoreTx::new()
            .guard(TxGuard::JobStatusIs {
                job_id: job.id,
                status: JobStatus::Scheduled,
            })
            .guard(TxGuard::AcceptedCountBelow {
                job_id: job.id,
                limit: job.crew_size,
            });
        for channel in &self.policy.channels {
            tx = tx
                .guard(TxGuard::NoPendingRequest {
                    job_id: job.id,
                    installer_id: candidate.id,
                    channel: *channel,
                })
                .op(TxOp::InsertRequest(ConfirmationRequest {
                    job_id: job.id,
                    installer_id: candidate.id,
                    channel: *channel,
                    status: RequestStatus::Pending,
                    created_at_ms: now,
                    responded_at_ms: None,
                }));
        }
        self.store.apply(tx).await?;

        tracing::info!(
            "dispatched confirmation request for job {} to installer {} ({})",
            job.id,
            candidate.id,
            candidate.name
        );
        self.record_audit(job.id, Some(candidate.id), "dispatch", None);

        for channel in &self.policy.channels {
            outcome.dispatched.push((candidate.id, *channel));
            let delivered = self.notifier.send(*channel, candidate, job).await;
            if !delivered {
                tracing::warn!(
                    "delivery to installer {} over {:?} failed; request stays answerable",
                    candidate.id,
                    channel
                );
                self.record_audit(
                    job.id,
                    Some(candidate.id),
                    "notify_failed",
                    Some(format!("{channel:?}")),
                );
                outcome.delivery_failures.push((candidate.id, *channel));
            }
        }
        Ok(())
    }

    async fn open_manual_task(
        &self,
        job: &Job,
        kind: ManualTaskKind,
        note: String,
    ) -> Result<(), EngineError> {
        let tx = StoreTx::new().op(TxOp::OpenManualTask(ManualTask {
            id: uuid::Uuid::new_v4(),
            job_id: job.id,
            kind,
            note,
            status: ManualTaskStatus::Pending,
            created_at_ms: now_ms(),
        }));
        self.store.apply(tx).await?;

        tracing::warn!("manual task opened for job {}: {:?}", job.id, kind);
        self.record_audit(job.id, None, "manual_task", Some(format!("{kind:?}")));
        Ok(())
    }

    async fn require_job(&self, job_id: JobId) -> Result<Job, EngineError> {
        self.store
            .job(job_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))
    }

    fn record_audit(
        &self,
        job_id: JobId,
        installer_id: Option<InstallerId>,
        action: &str,
        detail: Option<String>,
    ) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(job_id, installer_id, action, detail));
        }
    }
}

fn count_accepted(assignments: &[Assignment]) -> usize {
    assignments
        .iter()
        .filter(|a| a.status == AssignmentStatus::Accepted)
        .count()
}

fn is_accepted(assignments: &[Assignment], installer_id: InstallerId) -> bool {
    assignments
        .iter()
        .any(|a| a.installer_id == installer_id && a.status == AssignmentStatus::Accepted)
}

/// Installers no longer askable for this job: anyone with an outstanding,
/// answered, or expired request, or holding an accepted/declined assignment.
/// Cancelled requests (reschedule) do not exhaust an installer.
fn exhausted_installers(
    requests: &[ConfirmationRequest],
    assignments: &[Assignment],
) -> HashSet<InstallerId> {
    let mut out: HashSet<InstallerId> = requests
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                RequestStatus::Pending
                    | RequestStatus::Accepted
                    | RequestStatus::Declined
                    | RequestStatus::Expired
            )
        })
        .map(|r| r.installer_id)
        .collect();
    out.extend(
        assignments
            .iter()
            .filter(|a| {
                matches!(
                    a.status,
                    AssignmentStatus::Accepted | AssignmentStatus::Declined
                )
            })
            .map(|a| a.installer_id),
    );
    out
}
