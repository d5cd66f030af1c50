//! Core domain model and the assignment/confirmation state machine.

pub mod audit;
pub mod availability;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod selector;
pub mod slot;
pub mod store;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, PostgresAuditSink};
pub use availability::{available_for_job, available_installers, AvailabilityByDate};
pub use engine::{
    AssignmentEngine, DispatchOutcome, EnginePolicy, ReconcileOutcome, Resolution, ResponseAction,
};
pub use error::{AppResult, EngineError};
pub use model::{
    Assignment, AssignmentStatus, Channel, ConfirmationRequest, Installer, InstallerId, Job,
    JobId, JobStatus, ManualTask, ManualTaskId, ManualTaskKind, ManualTaskStatus, RequestStatus,
    SlotType,
};
pub use notify::Notifier;
pub use selector::{select_candidates, Selection};
pub use slot::{calculate_slot, SlotClass, SlotPlan};
pub use store::{Store, StoreTx, TxGuard, TxOp};
