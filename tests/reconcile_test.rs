//! Integration tests for job completion, hour reconciliation, and the
//! overbooking guard, plus expiry of unanswered confirmation requests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crew_dispatch::builders::build_engine_with;
use crew_dispatch::config::EngineConfig;
use crew_dispatch::core::{
    AssignmentEngine, Channel, EngineError, Installer, Job, JobStatus, ManualTaskKind,
    ManualTaskStatus, ReconcileOutcome, RequestStatus, ResponseAction, SlotType, Store,
};
use crew_dispatch::infra::notify::RecordingNotifier;
use crew_dispatch::infra::store::InMemoryStore;
use crew_dispatch::util::now_ms;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn installer(name: &str, priority: u32) -> Installer {
    Installer {
        id: Uuid::new_v4(),
        name: name.into(),
        priority,
        active: true,
        certificate_expires: None,
    }
}

fn engine() -> (AssignmentEngine, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let cfg = EngineConfig {
        channels: vec![Channel::InApp],
        overbooking_tolerance_hours: 1.0,
        ..EngineConfig::default()
    };
    let engine = build_engine_with(&cfg, store.clone(), notifier).unwrap();
    (engine, store)
}

/// Book a crew-of-two job with both installers accepted, ready to complete.
async fn staffed_job(
    engine: &AssignmentEngine,
    store: &InMemoryStore,
    declared_hours: f64,
) -> (Job, Installer, Installer) {
    let a = installer("A", 1);
    let b = installer("B", 2);
    store.insert_installer(a.clone());
    store.insert_installer(b.clone());

    let job = Job {
        id: Uuid::new_v4(),
        date: date(2026, 4, 1),
        slot: SlotType::FullDay { days: 1 },
        crew_size: 2,
        status: JobStatus::Scheduled,
        declared_hours,
        overbooking_resolved: true,
    };
    store.insert_job(job.clone());

    engine.dispatch(job.id).await.unwrap();
    for i in [&a, &b] {
        engine
            .respond(job.id, i.id, Channel::InApp, ResponseAction::Accept)
            .await
            .unwrap();
    }
    (job, a, b)
}

#[tokio::test]
async fn test_reconcile_within_tolerance() {
    let (engine, store) = engine();
    let (job, a, b) = staffed_job(&engine, &store, 16.0).await;

    engine.complete_job(job.id).await.unwrap();

    let actual = HashMap::from([(a.id, 8.0), (b.id, 8.5)]);
    let outcome = engine.reconcile(job.id, &actual).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::WithinTolerance);

    let assignments = store.assignments_for_job(job.id).await.unwrap();
    for assignment in &assignments {
        assert!(assignment.reconciled_hours.is_some());
    }
    assert!(store.job(job.id).await.unwrap().unwrap().overbooking_resolved);
    assert!(store.manual_tasks_for_job(job.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reconcile_flags_overbooked_hours() {
    let (engine, store) = engine();
    let (job, a, b) = staffed_job(&engine, &store, 16.0).await;
    engine.complete_job(job.id).await.unwrap();

    // 20 actual against 16 declared, tolerance 1.0.
    let actual = HashMap::from([(a.id, 10.0), (b.id, 10.0)]);
    let outcome = engine.reconcile(job.id, &actual).await.unwrap();
    let ReconcileOutcome::Flagged { divergence_hours } = outcome else {
        panic!("expected flagged outcome");
    };
    assert!((divergence_hours - 4.0).abs() < f64::EPSILON);

    let flagged = store.job(job.id).await.unwrap().unwrap();
    assert!(!flagged.overbooking_resolved);

    let tasks = store.manual_tasks_for_job(job.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, ManualTaskKind::OverbookedHours);
    assert_eq!(tasks[0].status, ManualTaskStatus::Pending);

    // Re-running reports the same flag without opening a second task.
    let again = engine.reconcile(job.id, &actual).await.unwrap();
    assert!(matches!(again, ReconcileOutcome::Flagged { .. }));
    assert_eq!(store.manual_tasks_for_job(job.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolve_overbooking_closes_the_flag() {
    let (engine, store) = engine();
    let (job, a, b) = staffed_job(&engine, &store, 16.0).await;
    engine.complete_job(job.id).await.unwrap();

    let actual = HashMap::from([(a.id, 12.0), (b.id, 12.0)]);
    engine.reconcile(job.id, &actual).await.unwrap();

    engine.resolve_overbooking(job.id).await.unwrap();

    let resolved = store.job(job.id).await.unwrap().unwrap();
    assert!(resolved.overbooking_resolved);
    let tasks = store.manual_tasks_for_job(job.id).await.unwrap();
    assert_eq!(tasks[0].status, ManualTaskStatus::Completed);

    // Reconciling a resolved job again is a no-op.
    let outcome = engine.reconcile(job.id, &actual).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::AlreadyResolved);

    // So is resolving twice.
    engine.resolve_overbooking(job.id).await.unwrap();
}

#[tokio::test]
async fn test_reconcile_requires_completion() {
    let (engine, store) = engine();
    let (job, a, b) = staffed_job(&engine, &store, 16.0).await;

    let actual = HashMap::from([(a.id, 8.0), (b.id, 8.0)]);
    let err = engine.reconcile(job.id, &actual).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn test_reconcile_requires_hours_for_every_accepted_installer() {
    let (engine, store) = engine();
    let (job, a, _b) = staffed_job(&engine, &store, 16.0).await;
    engine.complete_job(job.id).await.unwrap();

    let partial = HashMap::from([(a.id, 8.0)]);
    let err = engine.reconcile(job.id, &partial).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // The failed run recorded nothing.
    let assignments = store.assignments_for_job(job.id).await.unwrap();
    assert!(assignments.iter().all(|x| x.reconciled_hours.is_none()));
}

#[tokio::test]
async fn test_complete_job_withdraws_pending_requests() {
    let (engine, store) = engine();
    let a = installer("A", 1);
    store.insert_installer(a.clone());

    let job = Job {
        id: Uuid::new_v4(),
        date: date(2026, 4, 1),
        slot: SlotType::FullDay { days: 1 },
        crew_size: 1,
        status: JobStatus::Scheduled,
        declared_hours: 8.0,
        overbooking_resolved: true,
    };
    store.insert_job(job.clone());
    engine.dispatch(job.id).await.unwrap();

    engine.complete_job(job.id).await.unwrap();
    engine.complete_job(job.id).await.unwrap();

    let requests = store.requests_for_job(job.id).await.unwrap();
    assert_eq!(requests[0].status, RequestStatus::Cancelled);
    assert_eq!(
        store.job(job.id).await.unwrap().unwrap().status,
        JobStatus::Completed
    );
}

#[tokio::test]
async fn test_expiry_cascades_to_next_ranked_installer() {
    let (engine, store) = engine();
    let a = installer("A", 1);
    let b = installer("B", 2);
    store.insert_installer(a.clone());
    store.insert_installer(b.clone());

    let job = Job {
        id: Uuid::new_v4(),
        date: date(2026, 4, 1),
        slot: SlotType::FullDay { days: 1 },
        crew_size: 1,
        status: JobStatus::Scheduled,
        declared_hours: 8.0,
        overbooking_resolved: true,
    };
    store.insert_job(job.clone());
    engine.dispatch(job.id).await.unwrap();

    // Nothing is older than a cutoff in the past.
    assert_eq!(engine.expire_pending(0).await.unwrap(), 0);

    // A never answers: the request expires and the seat moves on to B, not
    // back to A.
    let expired = engine.expire_pending(now_ms() + 60_000).await.unwrap();
    assert_eq!(expired, 1);

    let requests = store.requests_for_job(job.id).await.unwrap();
    let a_request = requests.iter().find(|r| r.installer_id == a.id).unwrap();
    let b_request = requests.iter().find(|r| r.installer_id == b.id).unwrap();
    assert_eq!(a_request.status, RequestStatus::Expired);
    assert_eq!(b_request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_expiry_exhaustion_opens_manual_task() {
    let (engine, store) = engine();
    let a = installer("A", 1);
    let b = installer("B", 2);
    store.insert_installer(a.clone());
    store.insert_installer(b.clone());

    let job = Job {
        id: Uuid::new_v4(),
        date: date(2026, 4, 1),
        slot: SlotType::FullDay { days: 1 },
        crew_size: 1,
        status: JobStatus::Scheduled,
        declared_hours: 8.0,
        overbooking_resolved: true,
    };
    store.insert_job(job.clone());
    engine.dispatch(job.id).await.unwrap();

    // Both candidates sit on the request past the cutoff in turn. Once the
    // list is exhausted the engine raises a manual task instead of cycling
    // back to the first installer.
    assert_eq!(engine.expire_pending(now_ms() + 60_000).await.unwrap(), 1);
    assert_eq!(engine.expire_pending(now_ms() + 60_000).await.unwrap(), 1);

    let requests = store.requests_for_job(job.id).await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.status == RequestStatus::Expired));

    let tasks = store.manual_tasks_for_job(job.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, ManualTaskKind::InsufficientCandidates);
}
