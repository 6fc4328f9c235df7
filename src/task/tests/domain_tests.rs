//! Domain-focused tests for task construction, patching and edit locking.

use chrono::TimeDelta;
use rstest::rstest;
use serde_json::json;

use super::fixtures::{TaskBuilder, reference_now};
use crate::task::{
    adapters::ManualClock,
    domain::{
        AuditAction, AuditEntry, NewTask, Priority, Task, TaskDetails, TaskDomainError, TaskPatch,
        TaskStatus, TaskType,
    },
};

fn new_task(title: &str) -> NewTask {
    NewTask {
        details: TaskDetails::new(title, "Something to do").expect("valid details"),
        priority: Priority::High,
        task_type: TaskType::Deadline,
        deadline: None,
        issue_key: None,
        project_id: None,
        duration_minutes: None,
    }
}

#[rstest]
#[case("", "body", TaskDomainError::EmptyTitle)]
#[case("   ", "body", TaskDomainError::EmptyTitle)]
#[case("Title", "\t\n", TaskDomainError::EmptyDescription)]
fn task_details_reject_blank_text(
    #[case] title: &str,
    #[case] description: &str,
    #[case] expected: TaskDomainError,
) {
    assert_eq!(TaskDetails::new(title, description), Err(expected));
}

#[rstest]
fn task_details_trim_text() {
    let details = TaskDetails::new("  Pay rent ", " before Friday ").expect("valid details");

    assert_eq!(details.title(), "Pay rent");
    assert_eq!(details.description(), "before Friday");
}

#[rstest]
fn new_task_starts_pending_with_creation_time() {
    let clock = ManualClock::new(reference_now());

    let task = Task::new(new_task("Write report"), &clock);

    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.created_at(), reference_now());
    assert_eq!(task.started_at(), None);
    assert_eq!(task.completed_at(), None);
    assert_eq!(task.updated_at(), None);
}

#[rstest]
fn task_serializes_with_camel_case_and_type_key() {
    let clock = ManualClock::new(reference_now());
    let task = Task::new(
        NewTask {
            duration_minutes: Some(25),
            ..new_task("Focus block")
        },
        &clock,
    );

    let value = serde_json::to_value(&task).expect("task serializes");

    assert_eq!(value.get("type"), Some(&json!("deadline")));
    assert_eq!(value.get("priority"), Some(&json!("high")));
    assert_eq!(value.get("status"), Some(&json!("pending")));
    assert_eq!(value.get("durationMinutes"), Some(&json!(25)));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("deadline").is_none());
    assert!(value.get("completedAt").is_none());
}

#[rstest]
fn persisted_task_round_trips_through_json() {
    let task = TaskBuilder::new("Archive photos")
        .priority(Priority::Higher)
        .deadline(reference_now() + TimeDelta::days(1))
        .build();

    let encoded = serde_json::to_string(&task).expect("task serializes");
    let decoded: Task = serde_json::from_str(&encoded).expect("task deserializes");

    assert_eq!(decoded, task);
}

#[rstest]
fn apply_patch_updates_fields_and_touches() {
    let mut task = TaskBuilder::new("Plan trip").build();
    let now = reference_now() + TimeDelta::minutes(5);
    let deadline = reference_now() + TimeDelta::days(3);

    task.apply_patch(
        TaskPatch::new()
            .with_title(" Plan summer trip ")
            .with_priority(Priority::Higher)
            .with_deadline(Some(deadline))
            .with_project_id(Some("travel".to_owned())),
        now,
    )
    .expect("patch should apply");

    assert_eq!(task.title(), "Plan summer trip");
    assert_eq!(task.priority(), Priority::Higher);
    assert_eq!(task.deadline(), Some(deadline));
    assert_eq!(task.project_id(), Some("travel"));
    assert_eq!(task.updated_at(), Some(now));
}

#[rstest]
fn apply_patch_can_clear_optional_fields() {
    let mut task = TaskBuilder::new("Call bank")
        .deadline(reference_now() + TimeDelta::hours(2))
        .build();

    task.apply_patch(TaskPatch::new().with_deadline(None), reference_now())
        .expect("patch should apply");

    assert_eq!(task.deadline(), None);
}

#[rstest]
fn rejected_patch_leaves_task_untouched() {
    let original = TaskBuilder::new("Fix bike").build();
    let mut task = original.clone();

    let result = task.apply_patch(
        TaskPatch::new()
            .with_priority(Priority::Higher)
            .with_description("  "),
        reference_now(),
    );

    assert_eq!(result, Err(TaskDomainError::EmptyDescription));
    assert_eq!(task, original);
}

#[rstest]
fn completing_stamps_completion_and_recompleting_refreshes_it() {
    let mut task = TaskBuilder::new("Submit form").build();
    let first = reference_now();
    let second = reference_now() + TimeDelta::hours(1);

    task.transition_to(TaskStatus::Completed, first)
        .expect("pending to completed is allowed");
    task.transition_to(TaskStatus::Completed, second)
        .expect("re-completing is allowed");

    assert_eq!(task.completed_at(), Some(second));
    assert_eq!(task.updated_at(), Some(second));
}

#[rstest]
fn starting_keeps_first_start_time() {
    let mut task = TaskBuilder::new("Read chapter").build();
    let first = reference_now();
    let second = reference_now() + TimeDelta::minutes(30);

    task.transition_to(TaskStatus::InProgress, first)
        .expect("pending to in_progress is allowed");
    task.transition_to(TaskStatus::InProgress, second)
        .expect("in_progress to in_progress is allowed");

    assert_eq!(task.started_at(), Some(first));
    assert_eq!(task.updated_at(), Some(second));
}

#[rstest]
#[case(TimeDelta::hours(23), false)]
#[case(TimeDelta::hours(24), false)]
#[case(TimeDelta::hours(24) + TimeDelta::seconds(1), true)]
#[case(TimeDelta::days(3), true)]
fn edit_lock_applies_strictly_after_a_day(#[case] since_completion: TimeDelta, #[case] locked: bool) {
    let task = TaskBuilder::new("Done thing")
        .completed_at(reference_now())
        .build();

    assert_eq!(task.is_edit_locked(reference_now() + since_completion), locked);
}

#[rstest]
#[case(TaskStatus::Pending)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Missed)]
fn only_completed_tasks_lock(#[case] status: TaskStatus) {
    let task = TaskBuilder::new("Open thing").status(status).build();

    assert!(!task.is_edit_locked(reference_now() + TimeDelta::days(30)));
}

#[rstest]
#[case("low", Priority::Low)]
#[case(" HIGH ", Priority::High)]
#[case("higher", Priority::Higher)]
fn priority_parses_case_insensitively(#[case] raw: &str, #[case] expected: Priority) {
    assert_eq!(Priority::try_from(raw), Ok(expected));
}

#[rstest]
fn priority_weights_order_higher_first() {
    assert!(Priority::Higher.weight() > Priority::High.weight());
    assert!(Priority::High.weight() > Priority::Low.weight());
}

#[rstest]
fn unknown_priority_is_rejected() {
    assert_eq!(
        Priority::try_from("urgent"),
        Err(TaskDomainError::InvalidPriority("urgent".to_owned()))
    );
}

#[rstest]
fn audit_entry_snapshots_task_states() {
    let before = TaskBuilder::new("Tidy desk").build();
    let mut after = before.clone();
    after
        .transition_to(TaskStatus::InProgress, reference_now())
        .expect("transition allowed");

    let entry = AuditEntry::new(reference_now(), before.id(), AuditAction::Updated)
        .with_previous(&before)
        .with_new(&after);
    let encoded = serde_json::to_value(&entry).expect("entry serializes");

    assert_eq!(encoded.get("action"), Some(&json!("updated")));
    assert_eq!(
        encoded.pointer("/previousValue/status"),
        Some(&json!("pending"))
    );
    assert_eq!(
        encoded.pointer("/newValue/status"),
        Some(&json!("in_progress"))
    );
    assert_eq!(
        encoded.get("taskId"),
        Some(&json!(before.id().to_string()))
    );
}
