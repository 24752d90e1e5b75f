//! Integration tests for `TodoItemController` running on a real store
//!
//! The service is held where a test needs to observe the optimistic state
//! before the response arrives.

#![allow(clippy::unwrap_used)]

use composable_todo::item::{ItemOperation, TodoItemController, TodoItemEnvironment};
use composable_todo::{
    AuthContext, ControllerError, FailurePolicy, Filter, StaticPrompt, TodoList, User,
    ValidationError,
};
use composable_todo_api::{ApiError, TodoId, TodoPatch, UserId};
use composable_todo_runtime::StoreError;
use composable_todo_testing::{fixtures, helpers, MockTodoService, ServiceCall};
use std::sync::Arc;

struct Harness {
    service: MockTodoService,
    list: TodoList,
    prompt: StaticPrompt,
}

impl Harness {
    fn new(service: MockTodoService) -> Self {
        let list = TodoList::new(service.todos());
        Self {
            service,
            list,
            prompt: StaticPrompt::confirming(),
        }
    }

    fn with_prompt(mut self, prompt: StaticPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    fn controller(&self, id: &str, policy: FailurePolicy) -> TodoItemController {
        let todo = self.list.get(&TodoId::new(id)).unwrap();
        let environment = TodoItemEnvironment::new(
            Arc::new(self.service.clone()),
            self.list.clone(),
            AuthContext::signed_in(User::new(fixtures::USER, "alice")),
            Arc::new(self.prompt.clone()),
        )
        .with_failure_policy(policy);
        TodoItemController::new(&todo, environment)
    }
}

fn milk_and_dog() -> MockTodoService {
    MockTodoService::with_todos(vec![
        fixtures::todo("1", "Buy milk", false),
        fixtures::todo("2", "Walk dog", true),
    ])
}

#[tokio::test]
async fn toggle_is_optimistic_then_reconciled() {
    let harness = Harness::new(milk_and_dog().held());
    let item = harness.controller("1", FailurePolicy::Revert);

    let handle = item.toggle_complete().await.unwrap();

    let optimistic = item.snapshot().await;
    assert!(optimistic.complete);
    assert!(optimistic.loading);
    assert!(!harness.list.get(&TodoId::new("1")).unwrap().complete);

    harness.service.release(1);
    helpers::settle(handle).await;

    let state = item.snapshot().await;
    assert!(state.complete);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(
        harness.list.get(&TodoId::new("1")),
        Some(harness.service.todos()[0].clone())
    );
    assert_eq!(
        harness.service.calls(),
        vec![ServiceCall::Update {
            user: UserId::new("u1"),
            id: TodoId::new("1"),
            patch: TodoPatch::Complete { complete: true },
        }]
    );
}

#[tokio::test]
async fn failed_toggle_keeps_optimistic_value_when_configured() {
    let harness = Harness::new(milk_and_dog());
    harness.service.fail_next(ApiError::Timeout);
    let item = harness.controller("1", FailurePolicy::KeepOptimistic);

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.complete);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Request timed out"));
    assert!(!harness.list.get(&TodoId::new("1")).unwrap().complete);
}

#[tokio::test]
async fn failed_toggle_reverts_by_default() {
    let harness = Harness::new(milk_and_dog());
    harness.service.fail_next(ApiError::Status {
        status: 503,
        body: "maintenance".to_string(),
    });
    let item = harness.controller("2", FailurePolicy::default());

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.complete);
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("503"));
}

#[tokio::test]
async fn response_for_another_todo_is_not_found() {
    let harness = Harness::new(milk_and_dog());
    harness
        .service
        .respond_next_update(fixtures::todo("2", "Walk dog", false));
    let item = harness.controller("1", FailurePolicy::Revert);

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("Not found"));
    assert!(!state.complete);
    assert!(harness.list.get(&TodoId::new("2")).unwrap().complete);
}

#[tokio::test]
async fn filtered_list_still_clears_loading() {
    let harness = Harness::new(milk_and_dog());
    harness.list.set_current_filter(Filter::Active);
    let item = harness.controller("1", FailurePolicy::Revert);

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.complete);
    assert!(!state.loading);
    assert!(harness.list.get(&TodoId::new("1")).unwrap().complete);
    assert_eq!(harness.list.visible().len(), 0);
}

#[tokio::test]
async fn legacy_policy_leaves_filtered_item_loading() {
    let harness = Harness::new(milk_and_dog());
    harness.list.set_current_filter(Filter::Active);
    let item = harness.controller("1", FailurePolicy::KeepOptimistic);

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.complete);
    assert!(state.loading);
    assert!(!item.is_running(ItemOperation::Toggle).await);
    assert!(harness.list.get(&TodoId::new("1")).unwrap().complete);
}

#[tokio::test]
async fn latest_toggle_wins() {
    let harness = Harness::new(milk_and_dog().held());
    let item = harness.controller("1", FailurePolicy::Revert);

    let first = item.toggle_complete().await.unwrap();
    let second = item.toggle_complete().await.unwrap();
    assert!(!item.snapshot().await.complete);

    harness.service.release(2);
    helpers::settle(first).await;
    helpers::settle(second).await;

    let state = item.snapshot().await;
    assert!(!state.complete);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(
        harness.service.calls().last(),
        Some(&ServiceCall::Update {
            user: UserId::new("u1"),
            id: TodoId::new("1"),
            patch: TodoPatch::Complete { complete: false },
        })
    );
    assert!(!harness.service.todos()[0].complete);
}

#[tokio::test]
async fn blank_edit_never_reaches_the_service() {
    let harness = Harness::new(milk_and_dog());
    let item = harness.controller("1", FailurePolicy::Revert);
    item.toggle_editing().await.unwrap();

    let result = item.submit_edit("  ").await;

    assert_eq!(
        result.unwrap_err(),
        ControllerError::Validation(ValidationError::Required)
    );
    let state = item.snapshot().await;
    assert_eq!(state.field_error.as_deref(), Some("Required"));
    assert!(state.is_editing());
    assert!(harness.service.calls().is_empty());
}

#[tokio::test]
async fn edit_outside_edit_mode_is_rejected() {
    let harness = Harness::new(milk_and_dog());
    let item = harness.controller("1", FailurePolicy::Revert);

    let result = item.submit_edit("Buy bread").await;

    assert_eq!(
        result.unwrap_err(),
        ControllerError::Validation(ValidationError::NotEditing)
    );
    assert!(harness.service.calls().is_empty());
}

#[tokio::test]
async fn successful_edit_takes_server_text() {
    let harness = Harness::new(milk_and_dog());
    let item = harness.controller("1", FailurePolicy::Revert);
    item.toggle_editing().await.unwrap();

    helpers::settle(item.submit_edit("Buy oat milk").await.unwrap()).await;

    let state = item.snapshot().await;
    assert_eq!(state.text, "Buy oat milk");
    assert!(!state.is_editing());
    assert!(!state.loading);
    assert_eq!(
        harness.list.get(&TodoId::new("1")).unwrap().text,
        "Buy oat milk"
    );
}

#[tokio::test]
async fn failed_edit_shows_field_error() {
    let harness = Harness::new(milk_and_dog());
    harness
        .service
        .fail_next(ApiError::RequestFailed("connection reset".to_string()));
    let item = harness.controller("1", FailurePolicy::Revert);
    item.toggle_editing().await.unwrap();

    helpers::settle(item.submit_edit("Buy oat milk").await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.is_editing());
    assert!(!state.loading);
    assert_eq!(state.text, "Buy milk");
    assert!(state.field_error.unwrap().contains("connection reset"));
}

#[tokio::test]
async fn cancelled_delete_issues_no_request() {
    let harness = Harness::new(milk_and_dog()).with_prompt(StaticPrompt::cancelling());
    let before = harness.list.todos();
    let item = harness.controller("1", FailurePolicy::Revert);

    helpers::settle(item.delete_todo().await.unwrap()).await;

    let asked = harness.prompt.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].title, "Delete Buy milk?");
    assert_eq!(asked[0].message, "Please Confirm to Proceed");

    let state = item.snapshot().await;
    assert!(!state.deleted);
    assert!(!state.loading);
    assert!(!state.confirming_delete);
    assert!(harness.service.calls().is_empty());
    assert_eq!(harness.list.todos(), before);
}

#[tokio::test]
async fn confirmed_delete_removes_exactly_the_deleted_entry() {
    let harness = Harness::new(milk_and_dog());
    let item = harness.controller("1", FailurePolicy::Revert);

    helpers::settle(item.delete_todo().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(state.deleted);
    assert!(!state.loading);
    assert_eq!(harness.list.todos(), vec![fixtures::todo("2", "Walk dog", true)]);
    assert_eq!(harness.service.todos().len(), 1);
}

#[tokio::test]
async fn delete_without_record_reports_not_found() {
    let harness = Harness::new(milk_and_dog());
    harness.service.respond_next_delete(None);
    let item = harness.controller("1", FailurePolicy::Revert);

    helpers::settle(item.delete_todo().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(!state.deleted);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Not found"));
    assert_eq!(harness.list.len(), 2);
}

#[tokio::test]
async fn confirmed_delete_cancels_pending_toggle() {
    let harness = Harness::new(milk_and_dog().held());
    let item = harness.controller("1", FailurePolicy::Revert);

    let toggle = item.toggle_complete().await.unwrap();
    let delete = item.delete_todo().await.unwrap();

    harness.service.release(2);
    helpers::settle(toggle).await;
    helpers::settle(delete).await;

    let state = item.snapshot().await;
    assert!(state.deleted);
    assert!(!state.loading);
    assert!(!item.is_running(ItemOperation::Toggle).await);
    assert_eq!(harness.list.todos(), vec![fixtures::todo("2", "Walk dog", true)]);
}

#[tokio::test]
async fn failed_delete_after_pending_toggle_matches_shared_entry() {
    let harness = Harness::new(milk_and_dog().held());
    harness.service.fail_next(ApiError::Timeout);
    harness.service.fail_next(ApiError::Timeout);
    let item = harness.controller("1", FailurePolicy::Revert);

    let toggle = item.toggle_complete().await.unwrap();
    helpers::yield_now().await;
    assert!(item.snapshot().await.complete);
    let delete = item.delete_todo().await.unwrap();

    harness.service.release(2);
    helpers::settle(toggle).await;
    helpers::settle(delete).await;

    let state = item.snapshot().await;
    assert!(!state.deleted);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Request timed out"));
    assert_eq!(state.rollback, None);
    assert_eq!(
        state.complete,
        harness.list.get(&TodoId::new("1")).unwrap().complete
    );
    assert!(!harness.service.todos()[0].complete);
}

#[tokio::test]
async fn dismissed_item_ignores_late_responses() {
    let harness = Harness::new(milk_and_dog().held());
    let item = harness.controller("1", FailurePolicy::Revert);

    let handle = item.toggle_complete().await.unwrap();
    item.dismiss().await.unwrap();
    let dismissed = item.snapshot().await;

    harness.service.release(1);
    helpers::settle(handle).await;
    helpers::yield_now().await;

    assert_eq!(item.snapshot().await, dismissed);
    assert!(!dismissed.loading);
    assert!(!harness.list.get(&TodoId::new("1")).unwrap().complete);
    assert!(!harness.service.todos()[0].complete);
    assert_eq!(
        item.toggle_complete().await.unwrap_err(),
        ControllerError::Store(StoreError::ShutdownInProgress)
    );
}

#[tokio::test]
async fn items_reconcile_into_the_list_independently() {
    let harness = Harness::new(milk_and_dog().held());
    let milk = harness.controller("1", FailurePolicy::Revert);
    let dog = harness.controller("2", FailurePolicy::Revert);

    let first = milk.toggle_complete().await.unwrap();
    let second = dog.toggle_complete().await.unwrap();

    harness.service.release(2);
    helpers::settle(first).await;
    helpers::settle(second).await;

    let todos = harness.list.todos();
    assert!(todos[0].complete);
    assert!(!todos[1].complete);
    assert_eq!(harness.list.count(), 1);
}

#[tokio::test]
async fn sync_follows_shared_entry() {
    let harness = Harness::new(milk_and_dog());
    let item = harness.controller("1", FailurePolicy::Revert);

    harness.list.replace_by_id(fixtures::todo("1", "Buy milk", true));
    let updated = harness.list.get(&TodoId::new("1")).unwrap();
    item.sync_from_list(updated).await.unwrap();

    assert!(item.snapshot().await.complete);
}

#[tokio::test]
async fn signed_out_user_cannot_toggle() {
    let harness = Harness::new(milk_and_dog());
    let todo = harness.list.get(&TodoId::new("1")).unwrap();
    let item = TodoItemController::new(
        &todo,
        TodoItemEnvironment::new(
            Arc::new(harness.service.clone()),
            harness.list.clone(),
            AuthContext::default(),
            Arc::new(StaticPrompt::confirming()),
        ),
    );

    helpers::settle(item.toggle_complete().await.unwrap()).await;

    let state = item.snapshot().await;
    assert!(!state.complete);
    assert_eq!(state.error.as_deref(), Some("Not signed in"));
    assert!(harness.service.calls().is_empty());
}
