//! Availability resolution over committed assignments and installer state.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::error::EngineError;
use crate::core::model::{Installer, Job, SlotType};
use crate::core::store::Store;

/// Installers free per date, ordered by date.
pub type AvailabilityByDate = BTreeMap<NaiveDate, Vec<Installer>>;

/// For each date in the inclusive range, the installers not already committed
/// to a conflicting accepted assignment for the given slot, excluding
/// inactive installers and installers whose certification has expired as of
/// that date.
///
/// This is a snapshot query: it reads current assignment state once and does
/// not lock anything. Final correctness is enforced by commit-time guards on
/// the assignment-uniqueness invariant, not here.
pub async fn available_installers(
    store: &dyn Store,
    from: NaiveDate,
    to: NaiveDate,
    slot: SlotType,
) -> Result<AvailabilityByDate, EngineError> {
    if from > to {
        return Err(EngineError::Conflict(format!(
            "invalid date range: {from} > {to}"
        )));
    }

    let installers = store.installers().await?;
    let committed = store.accepted_assignments_between(from, to).await?;

    let mut by_date = AvailabilityByDate::new();
    let mut date = from;
    loop {
        let free = installers
            .iter()
            .filter(|installer| installer.eligible_on(date))
            .filter(|installer| !is_committed_on(&committed, installer, date, slot))
            .cloned()
            .collect();
        by_date.insert(date, free);

        if date >= to {
            break;
        }
        date = date.succ_opt().ok_or_else(|| {
            EngineError::Backend(format!("date overflow past {date}"))
        })?;
    }

    Ok(by_date)
}

/// Installers free on every date a job occupies, eligible through its last
/// day. `NotFound` if the job is absent.
pub async fn available_for_job(
    store: &dyn Store,
    job: &Job,
) -> Result<Vec<Installer>, EngineError> {
    let from = job.date;
    let to = job.end_date();
    let by_date = available_installers(store, from, to, job.slot).await?;

    let mut dates = by_date.values();
    let Some(first) = dates.next() else {
        return Ok(Vec::new());
    };

    // Free across the whole span, not just the first day.
    let free = first
        .iter()
        .filter(|installer| {
            dates
                .clone()
                .all(|day| day.iter().any(|other| other.id == installer.id))
        })
        .cloned()
        .collect();
    Ok(free)
}

fn is_committed_on(
    committed: &[(crate::core::model::Assignment, Job)],
    installer: &Installer,
    date: NaiveDate,
    slot: SlotType,
) -> bool {
    committed.iter().any(|(assignment, job)| {
        assignment.installer_id == installer.id
            && job.occupied_dates().contains(&date)
            && job.slot.conflicts_with(&slot)
    })
}
