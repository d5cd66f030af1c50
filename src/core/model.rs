//! Domain records shared by every engine component.
//!
//! Jobs, installers, assignments, confirmation requests, and manual tasks are
//! plain serde-derived records. Status fields are only ever written through
//! the engine's guarded store transactions; installers are a read-mostly
//! resource owned by administrators.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique job identifier.
pub type JobId = Uuid;
/// Unique installer identifier.
pub type InstallerId = Uuid;
/// Unique manual-task identifier.
pub type ManualTaskId = Uuid;

/// Lifecycle status of a job. Jobs are never deleted, only transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Booked and awaiting (or holding) installer assignments.
    Scheduled,
    /// Administratively cancelled; outstanding requests were withdrawn.
    Cancelled,
    /// Work finished; assignments await hour reconciliation.
    Completed,
}

/// Scheduling unit a job occupies on its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotType {
    /// Morning half of a single day.
    HalfDayMorning,
    /// Afternoon half of a single day.
    HalfDayAfternoon,
    /// One or more consecutive full days.
    FullDay {
        /// Number of consecutive days occupied, at least 1.
        days: u32,
    },
}

impl SlotType {
    /// Dates occupied by a job with this slot starting at `start`.
    #[must_use]
    pub fn occupied_dates(&self, start: NaiveDate) -> Vec<NaiveDate> {
        let days = match self {
            Self::HalfDayMorning | Self::HalfDayAfternoon => 1,
            Self::FullDay { days } => (*days).max(1),
        };
        (0..u64::from(days))
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .collect()
    }

    /// Whether two slots on the same date contend for the same installer.
    ///
    /// A full day conflicts with anything that date; a half day conflicts
    /// only with the same half or a full day.
    #[must_use]
    pub const fn conflicts_with(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::FullDay { .. }, _)
                | (_, Self::FullDay { .. })
                | (Self::HalfDayMorning, Self::HalfDayMorning)
                | (Self::HalfDayAfternoon, Self::HalfDayAfternoon)
        )
    }
}

/// A scheduled unit of work requiring one or more installers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier.
    pub id: JobId,
    /// First (or only) scheduled date.
    pub date: NaiveDate,
    /// Slot the job occupies starting at `date`.
    pub slot: SlotType,
    /// Number of installers required.
    pub crew_size: u32,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Total labor hours quoted for the job.
    pub declared_hours: f64,
    /// Cleared by the overbooking guard when reconciled hours diverge beyond
    /// tolerance; restored when an administrator records resolution.
    pub overbooking_resolved: bool,
}

impl Job {
    /// Dates this job occupies.
    #[must_use]
    pub fn occupied_dates(&self) -> Vec<NaiveDate> {
        self.slot.occupied_dates(self.date)
    }

    /// Last date this job occupies.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.occupied_dates().last().copied().unwrap_or(self.date)
    }

    /// Declared hours attributed to a single crew member.
    #[must_use]
    pub fn declared_hours_per_person(&self) -> f64 {
        self.declared_hours / f64::from(self.crew_size.max(1))
    }
}

/// A worker eligible for assignment. Priority and capability fields are
/// mutated by administrators only; the engine reads them fresh per decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    /// Unique identifier.
    pub id: InstallerId,
    /// Display name, used as the deterministic ranking tie-break.
    pub name: String,
    /// Priority rank; lower is preferred.
    pub priority: u32,
    /// Inactive installers are never selected.
    pub active: bool,
    /// Expiry of the required certification. `None` means the capability is
    /// not time-limited.
    pub certificate_expires: Option<NaiveDate>,
}

impl Installer {
    /// Whether this installer may be assigned work on `date`: active, with a
    /// certification still valid on that date.
    #[must_use]
    pub fn eligible_on(&self, date: NaiveDate) -> bool {
        self.active && self.certificate_expires.map_or(true, |expires| expires >= date)
    }
}

/// Status of a committed installer-to-job link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Installer confirmed and holds the seat.
    Accepted,
    /// Installer turned the seat down.
    Declined,
    /// Assignment withdrawn by reschedule or cancellation.
    Removed,
}

/// The committed link between a job and an installer.
///
/// Created only by a successful confirmation-resolver transition. At most one
/// `Accepted` assignment may exist per (job, installer) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job this assignment belongs to.
    pub job_id: JobId,
    /// Installer holding (or having held) the seat.
    pub installer_id: InstallerId,
    /// Current status.
    pub status: AssignmentStatus,
    /// Hours quoted for this installer's share of the job.
    pub declared_hours: f64,
    /// Actual/debitable hours recorded after completion, if reconciled.
    pub reconciled_hours: Option<f64>,
}

/// Channel a confirmation request is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// In-app notification; always answerable even if outbound delivery fails.
    InApp,
    /// Outbound email with a response link.
    Email,
    /// External chat bot (e.g. a Discord webhook).
    Chat,
}

/// Status of a confirmation request. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting the installer's answer.
    Pending,
    /// Installer accepted through this channel.
    Accepted,
    /// Installer declined through this channel.
    Declined,
    /// Withdrawn: sibling answered on another channel, or the job was
    /// cancelled or rescheduled.
    Cancelled,
    /// Unanswered past the expiry cutoff. Exhausts the installer for this
    /// job like a decline, so the seat cascades to the next candidate.
    Expired,
}

impl RequestStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One outstanding ask to one installer over one channel.
///
/// For a given (job, installer, channel) triple at most one `Pending` request
/// exists at a time; a new request may only be created once the prior one for
/// the triple is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    /// Job the installer is asked to confirm.
    pub job_id: JobId,
    /// Installer being asked.
    pub installer_id: InstallerId,
    /// Channel the ask was sent over.
    pub channel: Channel,
    /// Current status.
    pub status: RequestStatus,
    /// Creation timestamp in milliseconds since epoch.
    pub created_at_ms: u128,
    /// Response timestamp, set on any terminal transition.
    pub responded_at_ms: Option<u128>,
}

/// Category of a manual follow-up task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualTaskKind {
    /// A seat could not be staffed: the candidate list was exhausted.
    InsufficientCandidates,
    /// Reconciled hours diverged from declared hours beyond tolerance.
    OverbookedHours,
}

/// Status of a manual follow-up task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualTaskStatus {
    /// Awaiting human resolution.
    Pending,
    /// Resolved by an administrator or by the engine when the tracked
    /// condition cleared.
    Completed,
}

/// A follow-up record for conditions the engine cannot resolve automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualTask {
    /// Unique identifier.
    pub id: ManualTaskId,
    /// Job the task relates to.
    pub job_id: JobId,
    /// What needs resolving.
    pub kind: ManualTaskKind,
    /// Human-readable context for the administrator.
    pub note: String,
    /// Current status.
    pub status: ManualTaskStatus,
    /// Creation timestamp in milliseconds since epoch.
    pub created_at_ms: u128,
}
