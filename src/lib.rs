//! # Crew Dispatch
//!
//! An installer assignment and confirmation engine for scheduled installation jobs.
//!
//! Given a job that requires N installers on a date/slot, the engine determines
//! which installers are eligible, sends each a confirmation request over one or
//! more channels, and resolves the outcome (accept/decline/cancel) into a
//! committed assignment. Declines cascade to the next eligible installer;
//! situations the engine cannot resolve on its own (no candidates left,
//! overbooked hours after completion) are flagged as manual tasks for an
//! administrator.
//!
//! ## Core Problem Solved
//!
//! Crew assignment has different semantics than ordinary CRUD plumbing:
//!
//! - **Ordering**: installers are ranked by an admin-owned priority, and the
//!   ranking must be consulted fresh on every dispatch cycle
//! - **Idempotence**: installers answer over several channels (in-app button,
//!   chat-bot callback, email link) and duplicate deliveries must be no-ops
//! - **Cascading**: a decline must re-select and re-dispatch deterministically,
//!   and must terminate even under repeated rapid declines
//! - **Races**: an acceptance can race an administrative cancellation; the
//!   first transaction to commit wins and the loser is rejected cleanly
//!
//! ## Key Features
//!
//! - **Slot Calculator**: pure classification of labor hours into
//!   half-day/full-day/multi-day slots
//! - **Availability Resolver**: per-date eligibility over committed
//!   assignments, active flags, and certification validity
//! - **Priority Selector**: deterministic ranked candidate selection
//! - **Confirmation Dispatcher**: idempotent multi-channel request creation
//!   with fire-and-forget notification delivery
//! - **Confirmation Resolver**: the accept/decline/cancel state machine,
//!   applied as guarded atomic store transactions
//! - **Overbooking Guard**: post-completion reconciliation of declared vs.
//!   actual hours
//!
//! ## Example
//!
//! ```rust,ignore
//! use crew_dispatch::core::{AssignmentEngine, ResponseAction};
//! use crew_dispatch::config::EngineConfig;
//! use crew_dispatch::builders::build_engine;
//!
//! let engine = build_engine(&EngineConfig::default())?;
//!
//! // Ask the top-ranked available installers to confirm.
//! let outcome = engine.dispatch(job_id).await?;
//!
//! // An installer answered through some channel.
//! let resolution = engine
//!     .respond(job_id, installer_id, channel, ResponseAction::Accept)
//!     .await?;
//! ```
//!
//! For complete examples, see `tests/assignment_flow_test.rs`.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core domain model and the assignment/confirmation state machine.
pub mod core;
/// Configuration models for the engine and its backends.
pub mod config;
/// Builders to construct an engine from configuration.
pub mod builders;
/// Infrastructure adapters for stores and notification channels.
pub mod infra;
/// Shared utilities.
pub mod util;
