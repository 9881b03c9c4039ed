use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;
use tokio::sync::Notify;

use redshift_core::model::{CourseProgress, DashboardSnapshot, Student, Task, TaskId, TaskStatus};
use redshift_core::time::{fixed_clock, fixed_now};
use services::gateway::normalize_login_payload;
use services::{
    BootstrapOutcome, Clock, DashboardController, DashboardError, DashboardPhase, DashboardServices,
    GatewayError, OfflineGateway, RemoteGateway, SESSION_KEY, SessionStore, SubmitOutcome,
    TaskSubmission,
};
use storage::repository::{InMemoryRepository, KeyValueRepository};

const PASSCODE: &str = "1234";

/// Lets a test observe the controller while a gateway request is outstanding.
#[derive(Default)]
struct Hold {
    entered: Notify,
    release: Notify,
}

struct FakeGateway {
    snapshot: DashboardSnapshot,
    login_unreachable: bool,
    submit_reply: Option<TaskStatus>,
    hold: Option<Hold>,
    login_hold: Option<Hold>,
    login_calls: AtomicUsize,
    submissions: Mutex<Vec<TaskSubmission>>,
}

impl FakeGateway {
    fn new(snapshot: DashboardSnapshot) -> Self {
        Self {
            snapshot,
            login_unreachable: false,
            submit_reply: Some(TaskStatus::Submitted),
            hold: None,
            login_hold: None,
            login_calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn replying(mut self, status: Option<TaskStatus>) -> Self {
        self.submit_reply = status;
        self
    }

    fn unreachable_login(mut self) -> Self {
        self.login_unreachable = true;
        self
    }

    fn holding(mut self) -> Self {
        self.hold = Some(Hold::default());
        self
    }

    fn holding_login(mut self) -> Self {
        self.login_hold = Some(Hold::default());
        self
    }

    fn hold(&self) -> &Hold {
        self.hold.as_ref().expect("gateway built with holding()")
    }

    fn login_hold(&self) -> &Hold {
        self.login_hold
            .as_ref()
            .expect("gateway built with holding_login()")
    }

    fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    fn submissions(&self) -> Vec<TaskSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn login(
        &self,
        _name: &str,
        passcode: &str,
    ) -> Result<Option<DashboardSnapshot>, GatewayError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.login_hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        if self.login_unreachable {
            return Err(GatewayError::Timeout);
        }
        Ok((passcode == PASSCODE).then(|| self.snapshot.clone()))
    }

    async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskStatus, GatewayError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(hold) = &self.hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        self.submit_reply
            .ok_or_else(|| GatewayError::Rejected("backend down".into()))
    }
}

fn alex_week() -> DashboardSnapshot {
    DashboardSnapshot::new(
        Student::new("Alex", "Batch 24"),
        vec![
            Task::new("t1", "Project Setup", TaskStatus::Checked).with_week(3),
            Task::new("t2", "Component Architecture", TaskStatus::Live).with_week(3),
            Task::new("t3", "Context API", TaskStatus::Redo).with_week(3),
            Task::new("t4", "Performance Hooks", TaskStatus::Locked).with_week(3),
        ],
        CourseProgress::default(),
        "Advanced React Patterns",
    )
}

fn controller(
    gateway: &Arc<FakeGateway>,
    repo: &InMemoryRepository,
    clock: Clock,
) -> DashboardController {
    let sessions = SessionStore::new(Arc::new(repo.clone()), clock);
    DashboardController::new(gateway.clone(), sessions)
}

fn status_of(controller: &DashboardController, id: &str) -> TaskStatus {
    controller
        .snapshot()
        .expect("signed in")
        .task(&TaskId::new(id))
        .expect("task present")
        .status
}

async fn stored_expiry_millis(repo: &InMemoryRepository) -> Option<i64> {
    let raw = repo.get(SESSION_KEY).await.unwrap()?;
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["expiry"].as_i64()
}

// ─── Login ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_installs_snapshot_and_persists_session() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    let controller = controller(&gateway, &repo, fixed_clock());
    assert!(matches!(controller.bootstrap().await, BootstrapOutcome::NoSession));

    controller.login("Alex", PASSCODE).await.unwrap();

    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.student().name, "Alex");
    assert_eq!(snapshot.progress().weekly_tasks_completed, 1);
    assert_eq!(snapshot.progress().total_weekly_tasks, 4);
    assert!(matches!(controller.phase(), DashboardPhase::Authenticated(_)));
    assert_eq!(
        stored_expiry_millis(&repo).await,
        Some((fixed_now() + Duration::minutes(90)).timestamp_millis())
    );
}

#[tokio::test]
async fn wrong_passcode_stays_unauthenticated_without_session() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    let controller = controller(&gateway, &repo, fixed_clock());
    controller.bootstrap().await;

    let err = controller.login("Alex", "9999").await.unwrap_err();

    assert!(matches!(err, DashboardError::InvalidCredentials));
    assert_eq!(controller.phase(), DashboardPhase::Unauthenticated);
    assert_eq!(repo.get(SESSION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn unreachable_backend_is_not_reported_as_bad_credentials() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).unreachable_login());
    let repo = InMemoryRepository::new();
    let controller = controller(&gateway, &repo, fixed_clock());
    controller.bootstrap().await;

    let err = controller.login("Alex", PASSCODE).await.unwrap_err();

    assert!(matches!(err, DashboardError::Gateway(GatewayError::Timeout)));
    assert_eq!(
        err.user_message(),
        "Connection Error: Unable to verify credentials."
    );
    assert!(!controller.is_authenticated());
    assert_eq!(repo.get(SESSION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn failed_login_keeps_previous_snapshot() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    let controller = controller(&gateway, &repo, fixed_clock());
    controller.login("Alex", PASSCODE).await.unwrap();
    let before = controller.snapshot().unwrap();

    assert!(controller.login("Alex", "0000").await.is_err());

    assert!(Arc::ptr_eq(&before, &controller.snapshot().unwrap()));
}

#[tokio::test]
async fn login_or_replay_while_a_login_is_pending_is_busy() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).holding_login());
    let repo = InMemoryRepository::new();
    SessionStore::new(Arc::new(repo.clone()), fixed_clock())
        .save("Alex", PASSCODE)
        .await
        .unwrap();
    let controller = controller(&gateway, &repo, fixed_clock());

    let (first, (second, replay)) = tokio::join!(controller.login("Alex", PASSCODE), async {
        gateway.login_hold().entered.notified().await;
        let second = controller.login("Alex", PASSCODE).await;
        let replay = controller.bootstrap().await;
        gateway.login_hold().release.notify_one();
        (second, replay)
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(DashboardError::Busy)));
    assert!(matches!(
        replay,
        BootstrapOutcome::ReplayFailed(DashboardError::Busy)
    ));
    assert_eq!(gateway.login_calls(), 1);
    assert!(controller.is_authenticated());
}

// ─── Bootstrap ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn expired_session_is_deleted_without_calling_gateway() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    SessionStore::new(Arc::new(repo.clone()), fixed_clock())
        .save("Alex", PASSCODE)
        .await
        .unwrap();

    let later = fixed_clock().advanced(Duration::hours(2));
    let controller = controller(&gateway, &repo, later);
    assert!(controller.is_checking_session());

    let outcome = controller.bootstrap().await;

    assert!(matches!(outcome, BootstrapOutcome::NoSession));
    assert_eq!(gateway.login_calls(), 0);
    assert_eq!(repo.get(SESSION_KEY).await.unwrap(), None);
    assert!(!controller.is_checking_session());
    assert_eq!(controller.phase(), DashboardPhase::Unauthenticated);
}

#[tokio::test]
async fn valid_session_replays_login_and_writes_new_expiry() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    SessionStore::new(Arc::new(repo.clone()), fixed_clock())
        .save("Alex", PASSCODE)
        .await
        .unwrap();

    let later = fixed_clock().advanced(Duration::minutes(30));
    let controller = controller(&gateway, &repo, later);

    let outcome = controller.bootstrap().await;

    assert!(matches!(outcome, BootstrapOutcome::Restored));
    assert_eq!(gateway.login_calls(), 1);
    assert!(controller.is_authenticated());
    assert!(!controller.is_checking_session());
    assert_eq!(
        stored_expiry_millis(&repo).await,
        Some((fixed_now() + Duration::minutes(120)).timestamp_millis())
    );
}

#[tokio::test]
async fn rejected_replay_leaves_stored_session_in_place() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let repo = InMemoryRepository::new();
    SessionStore::new(Arc::new(repo.clone()), fixed_clock())
        .save("Alex", "4321")
        .await
        .unwrap();
    let controller = controller(&gateway, &repo, fixed_clock());

    let outcome = controller.bootstrap().await;

    assert!(matches!(outcome, BootstrapOutcome::ReplayRejected));
    assert_eq!(controller.phase(), DashboardPhase::Unauthenticated);
    assert!(repo.get(SESSION_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn unreachable_replay_still_finishes_checking() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).unreachable_login());
    let repo = InMemoryRepository::new();
    SessionStore::new(Arc::new(repo.clone()), fixed_clock())
        .save("Alex", PASSCODE)
        .await
        .unwrap();
    let controller = controller(&gateway, &repo, fixed_clock());

    let outcome = controller.bootstrap().await;

    assert!(matches!(
        outcome,
        BootstrapOutcome::ReplayFailed(DashboardError::Gateway(_))
    ));
    assert!(!controller.is_checking_session());
    assert_eq!(controller.phase(), DashboardPhase::Unauthenticated);
}

// ─── Submission ─────────────────────────────────────────────────────────────────

async fn signed_in(gateway: &Arc<FakeGateway>) -> DashboardController {
    let controller = controller(gateway, &InMemoryRepository::new(), fixed_clock());
    controller.bootstrap().await;
    controller.login("Alex", PASSCODE).await.unwrap();
    controller
}

#[tokio::test]
async fn optimistic_status_shows_before_backend_answers_then_reconciles() {
    let gateway = Arc::new(
        FakeGateway::new(alex_week())
            .replying(Some(TaskStatus::Resubmitted))
            .holding(),
    );
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t2")).unwrap();

    let (outcome, ()) = tokio::join!(controller.submit_task("https://github.com/alex/app"), async {
        gateway.hold().entered.notified().await;
        assert_eq!(status_of(&controller, "t2"), TaskStatus::Submitted);
        assert_eq!(
            controller.snapshot().unwrap().progress().weekly_tasks_completed,
            2
        );
        assert!(controller.is_submitting());
        gateway.hold().release.notify_one();
    });

    assert_eq!(
        outcome.unwrap(),
        SubmitOutcome::Reconciled {
            optimistic: TaskStatus::Submitted,
            confirmed: TaskStatus::Resubmitted,
            applied: true,
        }
    );
    assert_eq!(status_of(&controller, "t2"), TaskStatus::Resubmitted);
    assert_eq!(
        controller.snapshot().unwrap().progress().weekly_tasks_completed,
        2
    );
    assert!(controller.submission_target().is_none());
}

#[tokio::test]
async fn matching_confirmation_does_not_touch_snapshot_again() {
    let gateway = Arc::new(
        FakeGateway::new(alex_week())
            .replying(Some(TaskStatus::Submitted))
            .holding(),
    );
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t2")).unwrap();

    let (outcome, optimistic) = tokio::join!(controller.submit_task("done"), async {
        gateway.hold().entered.notified().await;
        let optimistic = controller.snapshot().unwrap();
        gateway.hold().release.notify_one();
        optimistic
    });

    assert_eq!(
        outcome.unwrap(),
        SubmitOutcome::Confirmed(TaskStatus::Submitted)
    );
    assert!(Arc::ptr_eq(&optimistic, &controller.snapshot().unwrap()));
}

#[tokio::test]
async fn redo_task_resubmits_and_payload_names_student_and_task() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).replying(Some(TaskStatus::Resubmitted)));
    let controller = signed_in(&gateway).await;
    let task = controller.open_submission(&TaskId::new("t3")).unwrap();
    assert_eq!(task.title, "Context API");

    let outcome = controller.submit_task("fixed the re-renders").await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Confirmed(TaskStatus::Resubmitted));
    assert_eq!(
        gateway.submissions(),
        vec![TaskSubmission {
            task_id: TaskId::new("t3"),
            content: "fixed the re-renders".into(),
            student_name: "Alex".into(),
            task_title: "Context API".into(),
        }]
    );
}

#[tokio::test]
async fn failed_submission_keeps_optimistic_status() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).replying(None));
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t3")).unwrap();

    let err = controller.submit_task("retry later").await.unwrap_err();

    assert!(matches!(err, DashboardError::Gateway(GatewayError::Rejected(_))));
    // No rollback: the optimistic status stays until the next login.
    assert_eq!(status_of(&controller, "t3"), TaskStatus::Resubmitted);
    assert_eq!(
        controller.submission_target().map(|task| task.id),
        Some(TaskId::new("t3"))
    );
}

#[tokio::test]
async fn reconciliation_is_dropped_when_snapshot_was_replaced() {
    let gateway = Arc::new(
        FakeGateway::new(alex_week())
            .replying(Some(TaskStatus::Resubmitted))
            .holding(),
    );
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t2")).unwrap();

    let (outcome, ()) = tokio::join!(controller.submit_task("v1"), async {
        gateway.hold().entered.notified().await;
        controller.login("Alex", PASSCODE).await.unwrap();
        gateway.hold().release.notify_one();
    });

    assert_eq!(
        outcome.unwrap(),
        SubmitOutcome::Reconciled {
            optimistic: TaskStatus::Submitted,
            confirmed: TaskStatus::Resubmitted,
            applied: false,
        }
    );
    assert_eq!(status_of(&controller, "t2"), TaskStatus::Live);
}

#[tokio::test]
async fn second_submission_while_one_is_in_flight_is_busy() {
    let gateway = Arc::new(FakeGateway::new(alex_week()).holding());
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t2")).unwrap();

    let (first, second) = tokio::join!(controller.submit_task("one"), async {
        gateway.hold().entered.notified().await;
        let second = controller.submit_task("two").await;
        gateway.hold().release.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(DashboardError::Busy)));
    assert_eq!(gateway.submissions().len(), 1);
}

#[tokio::test]
async fn submit_without_target_or_session_is_a_no_op() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let signed_out = controller(&gateway, &InMemoryRepository::new(), fixed_clock());
    assert_eq!(
        signed_out.submit_task("text").await.unwrap(),
        SubmitOutcome::Skipped
    );

    let controller = signed_in(&gateway).await;
    let before = controller.snapshot().unwrap();
    assert_eq!(
        controller.submit_task("text").await.unwrap(),
        SubmitOutcome::Skipped
    );
    controller.open_submission(&TaskId::new("t2")).unwrap();
    controller.close_submission();
    assert_eq!(
        controller.submit_task("text").await.unwrap(),
        SubmitOutcome::Skipped
    );

    assert!(gateway.submissions().is_empty());
    assert!(Arc::ptr_eq(&before, &controller.snapshot().unwrap()));
}

#[tokio::test]
async fn blank_submission_is_refused_before_any_update() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let controller = signed_in(&gateway).await;
    controller.open_submission(&TaskId::new("t2")).unwrap();

    let err = controller.submit_task("   ").await.unwrap_err();

    assert!(matches!(err, DashboardError::EmptySubmission));
    assert_eq!(status_of(&controller, "t2"), TaskStatus::Live);
    assert!(gateway.submissions().is_empty());
}

#[tokio::test]
async fn checked_locked_and_unknown_tasks_cannot_be_targeted() {
    let gateway = Arc::new(FakeGateway::new(alex_week()));
    let controller = signed_in(&gateway).await;

    assert!(matches!(
        controller.open_submission(&TaskId::new("t1")),
        Err(DashboardError::NotSubmittable(TaskStatus::Checked))
    ));
    assert!(matches!(
        controller.open_submission(&TaskId::new("t4")),
        Err(DashboardError::NotSubmittable(TaskStatus::Locked))
    ));
    assert!(matches!(
        controller.open_submission(&TaskId::new("t9")),
        Err(DashboardError::UnknownTask(_))
    ));
    assert!(controller.submission_target().is_none());
}

#[tokio::test]
async fn task_with_unrecognized_status_can_still_be_submitted() {
    let snapshot = normalize_login_payload(&json!({
        "student": {"name": "Alex", "cohort": "Batch 24"},
        "tasks": [
            {"id": "t9", "title": "Custom Hooks", "status": "In Progress"},
            {"id": "t10", "title": "Suspense"}
        ]
    }));
    let gateway = Arc::new(FakeGateway::new(snapshot));
    let controller = signed_in(&gateway).await;
    assert_eq!(status_of(&controller, "t10"), TaskStatus::Live);

    controller.open_submission(&TaskId::new("t9")).unwrap();
    let outcome = controller.submit_task("https://github.com/alex/hooks").await;

    assert_eq!(
        outcome.unwrap(),
        SubmitOutcome::Confirmed(TaskStatus::Submitted)
    );
    assert_eq!(status_of(&controller, "t9"), TaskStatus::Submitted);
}

// ─── Assembly ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn offline_services_run_the_whole_flow() {
    let services = DashboardServices::in_memory(Arc::new(OfflineGateway::new()), fixed_clock());
    let controller = services.controller();

    assert!(matches!(controller.bootstrap().await, BootstrapOutcome::NoSession));
    controller.login("Sam", "1234").await.unwrap();
    controller.open_submission(&TaskId::new("t2")).unwrap();
    let outcome = controller.submit_task("my repo link").await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Confirmed(TaskStatus::Submitted));
    assert_eq!(
        controller.snapshot().unwrap().progress().weekly_tasks_completed,
        2
    );
    assert!(controller.sessions().load().await.is_some());
}
