//! Priority-based candidate selection.

use std::collections::HashSet;

use crate::core::model::{Installer, InstallerId};

/// Ordered candidates for the open seats of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Candidates in dispatch order, at most one per open seat.
    pub candidates: Vec<Installer>,
    /// Seats that could not be matched to any remaining eligible installer.
    /// A non-zero shortfall is consumed by the dispatcher to open a manual
    /// task instead of silently under-assigning.
    pub shortfall: usize,
}

/// Rank available installers and pick the next candidate for each open seat.
///
/// Deterministic given identical inputs: ascending priority rank, ties broken
/// by name and then id, so retries and tests are reproducible. Installers in
/// `excluded` (already asked, declined, or holding the seat) are skipped.
#[must_use]
pub fn select_candidates(
    available: &[Installer],
    excluded: &HashSet<InstallerId>,
    seats: usize,
) -> Selection {
    let mut eligible: Vec<Installer> = available
        .iter()
        .filter(|installer| !excluded.contains(&installer.id))
        .cloned()
        .collect();
    eligible.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let shortfall = seats.saturating_sub(eligible.len());
    eligible.truncate(seats);
    Selection {
        candidates: eligible,
        shortfall,
    }
}
