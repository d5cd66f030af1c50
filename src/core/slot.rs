//! Slot calculation: labor hours and crew size to a scheduling slot.

use serde::{Deserialize, Serialize};

/// Hours per person at or below which a job fits in a half day.
const HALF_DAY_MAX_HOURS: f64 = 3.0;
/// Hours per person that fit in one full working day.
const FULL_DAY_HOURS: f64 = 8.0;

/// Broad slot classification produced by the calculator. Whether a half day
/// lands in the morning or afternoon is a booking decision, not a function of
/// hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotClass {
    /// At most three hours per person.
    HalfDay,
    /// More than three hours per person; may span consecutive days.
    FullDay,
}

/// Result of classifying a job's labor hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlan {
    /// Half-day or full-day classification.
    pub class: SlotClass,
    /// Number of consecutive days required.
    pub days: u32,
    /// Labor hours attributed to each crew member.
    pub hours_per_person: f64,
    /// Human-readable description for quotes and admin views.
    pub label: String,
}

/// Classify a job's total labor hours into a scheduling slot.
///
/// Pure: identical inputs always yield identical output. A non-positive crew
/// size is clamped to 1 rather than dividing by zero. Boundaries are
/// inclusive on the lower classification: exactly 3.0 hours per person is a
/// half day, exactly 8.0 a single full day.
#[must_use]
pub fn calculate_slot(total_hours: f64, crew_size: u32) -> SlotPlan {
    let crew = crew_size.max(1);
    let hours_per_person = total_hours / f64::from(crew);

    if hours_per_person <= HALF_DAY_MAX_HOURS {
        return SlotPlan {
            class: SlotClass::HalfDay,
            days: 1,
            hours_per_person,
            label: "half-day (1 day)".into(),
        };
    }

    if hours_per_person <= FULL_DAY_HOURS {
        return SlotPlan {
            class: SlotClass::FullDay,
            days: 1,
            hours_per_person,
            label: "full-day (1 day)".into(),
        };
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = (hours_per_person / FULL_DAY_HOURS).ceil() as u32;
    SlotPlan {
        class: SlotClass::FullDay,
        days,
        hours_per_person,
        label: format!("full-day ({days} consecutive days)"),
    }
}
