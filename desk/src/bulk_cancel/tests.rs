//! Unit tests for bulk cancellation.
//!
//! Covers:
//! - Empty selection and unreachable backend (nothing dispatched)
//! - Endpoint choice per attendee type, and already-cancelled skips
//! - Partial failure aggregation and sample messages
//! - Read-model invalidation regardless of outcome
//! - Selection lifecycle in the reducer

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use super::*;
use crate::batch::{BatchError, BatchSettings, BatchSummary, ItemOutcome};
use crate::environment::ProductionDeskEnvironment;
use crate::notice::NoticeLevel;
use auction_desk_client::{
    ApiError, AttendeeRecord, AttendeeStatus, CancelAttendeesPayload, EventId, GuestId, ReadModel,
    RegistrationId,
};
use auction_desk_runtime::Store;
use auction_desk_testing::{
    ApiCall, AttendeeRecordExt, MockAttendeeApi, RecordingReadModelCache, ReducerTest, assertions,
    guest, registrant, test_clock,
};
use std::sync::Arc;

fn event() -> EventId {
    EventId::new("gala-2025")
}

fn payload() -> CancelAttendeesPayload {
    CancelAttendeesPayload {
        reason: Some("Event capacity reduced".to_string()),
        notes: Some("Refund issued".to_string()),
    }
}

fn five_attendees() -> Vec<AttendeeRecord> {
    vec![
        registrant("r-1", "reg-1"),
        guest("g-1"),
        guest("g-2"),
        registrant("r-2", "reg-2"),
        guest("g-3"),
    ]
}

fn canceller(api: &Arc<MockAttendeeApi>, cache: &Arc<RecordingReadModelCache>) -> BulkAttendeeCanceller {
    BulkAttendeeCanceller::new(api.clone(), cache.clone())
}

fn test_env(api: &Arc<MockAttendeeApi>, cache: &Arc<RecordingReadModelCache>) -> ProductionDeskEnvironment {
    ProductionDeskEnvironment::new(api.clone(), cache.clone(), Arc::new(test_clock()))
}

fn submit() -> BulkCancelAction {
    BulkCancelAction::Submit {
        event_id: event(),
        payload: payload(),
    }
}

// ============================================================================
// Canceller
// ============================================================================

#[tokio::test]
async fn test_empty_selection_sends_nothing() {
    let api = Arc::new(MockAttendeeApi::new());
    let cache = Arc::new(RecordingReadModelCache::new());

    let error = canceller(&api, &cache)
        .cancel_all(&event(), &[], &payload())
        .await
        .unwrap_err();

    assert_eq!(error, BatchError::EmptySelection);
    assert_eq!(error.to_string(), "No attendees selected");
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_each_type_uses_its_endpoint_with_the_same_payload() {
    let api = Arc::new(MockAttendeeApi::new().with_attendees(&event(), five_attendees()));
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &five_attendees(), &payload())
        .await
        .unwrap();

    assert_eq!(result.summary(), BatchSummary::AllSucceeded { count: 5 });
    assert_eq!(api.cancellation_calls(), 5);

    let calls = api.calls();
    assert!(calls.contains(&ApiCall::CancelRegistration {
        registration_id: RegistrationId::new("reg-1"),
        payload: payload(),
    }));
    assert!(calls.contains(&ApiCall::CancelGuest {
        guest_id: GuestId::new("g-3"),
        payload: payload(),
    }));
    assert!(calls.iter().all(|call| match call {
        ApiCall::CancelRegistration { payload: p, .. } | ApiCall::CancelGuest { payload: p, .. } =>
            *p == payload(),
        _ => true,
    }));
    assert!(api.attendees(&event()).iter().all(|a| a.status.is_cancelled()));
}

#[tokio::test]
async fn test_already_cancelled_attendees_are_skipped_without_requests() {
    let selection = vec![
        guest("g-1").cancelled(),
        guest("g-2").with_status(AttendeeStatus::from("canceled".to_string())),
        registrant("r-1", "reg-1").cancelled(),
    ];
    let api = Arc::new(MockAttendeeApi::new().with_attendees(&event(), selection.clone()));
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &selection, &payload())
        .await
        .unwrap();

    assert_eq!(result.summary(), BatchSummary::AllSucceeded { count: 3 });
    assert_eq!(result.skipped_count(), 3);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_single_timeout_is_a_partial_failure() {
    let api = Arc::new(
        MockAttendeeApi::new()
            .with_attendees(&event(), five_attendees())
            .failing("g-2", ApiError::Timeout),
    );
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &five_attendees(), &payload())
        .await
        .unwrap();

    assert_eq!(
        result.summary(),
        BatchSummary::PartialFailure {
            success_count: 4,
            failure_count: 1,
            sample_messages: vec!["network timeout".to_string()],
        }
    );
    // The other four stay cancelled
    let still_active: Vec<GuestId> = api
        .attendees(&event())
        .into_iter()
        .filter(|a| !a.status.is_cancelled())
        .map(|a| a.id)
        .collect();
    assert_eq!(still_active, vec![GuestId::new("g-2")]);
}

#[tokio::test]
async fn test_cancel_all_runs_on_a_spawned_task() {
    let api = Arc::new(
        MockAttendeeApi::new()
            .with_attendees(&event(), five_attendees())
            .failing("g-2", ApiError::Timeout),
    );
    let cache = Arc::new(RecordingReadModelCache::new());
    let canceller = canceller(&api, &cache);
    let selection = five_attendees();

    let result = tokio::spawn(async move {
        canceller.cancel_all(&event(), &selection, &payload()).await
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.success_count(), 4);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(api.cancellation_calls(), 5);
}

#[tokio::test]
async fn test_sample_messages_are_distinct_and_capped() {
    let selection: Vec<AttendeeRecord> = (1..=6).map(|n| guest(&format!("g-{n}"))).collect();
    let forbidden = ApiError::Backend {
        status: 403,
        message: Some("Attendee is checked in".to_string()),
    };
    let api = Arc::new(
        MockAttendeeApi::new()
            .with_attendees(&event(), selection.clone())
            .failing("g-1", ApiError::Timeout)
            .failing("g-2", forbidden.clone())
            .failing("g-3", ApiError::Timeout)
            .failing("g-4", forbidden)
            .failing("g-5", ApiError::Backend { status: 404, message: Some("Guest not found".to_string()) })
            .failing("g-6", ApiError::Backend { status: 409, message: Some("Already refunded".to_string()) }),
    );
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &selection, &payload())
        .await
        .unwrap();

    assert_eq!(
        result.summary(),
        BatchSummary::PartialFailure {
            success_count: 0,
            failure_count: 6,
            sample_messages: vec![
                "network timeout".to_string(),
                "Attendee is checked in".to_string(),
                "Guest not found".to_string(),
            ],
        }
    );
}

#[tokio::test]
async fn test_registrant_without_registration_fails_alone() {
    let mut orphan = registrant("r-9", "unused");
    orphan.registration_id = None;
    let selection = vec![orphan, guest("g-1")];
    let api = Arc::new(MockAttendeeApi::new().with_attendees(&event(), selection.clone()));
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &selection, &payload())
        .await
        .unwrap();

    assert_eq!(result.items()[0].outcome, ItemOutcome::Failed("Registrant r-9 has no registration".to_string()));
    assert_eq!(result.items()[1].outcome, ItemOutcome::Succeeded);
    assert_eq!(api.cancellation_calls(), 1);
}

#[tokio::test]
async fn test_duplicate_selections_are_collapsed() {
    let selection = vec![guest("g-1"), guest("g-2"), guest("g-1")];
    let api = Arc::new(MockAttendeeApi::new().with_attendees(&event(), selection[..2].to_vec()));
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &selection, &payload())
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(api.cancellation_calls(), 2);
}

#[tokio::test]
async fn test_read_models_invalidated_even_when_everything_fails() {
    let selection = vec![guest("g-1")];
    let api = Arc::new(MockAttendeeApi::new().failing("g-1", ApiError::Timeout));
    let cache = Arc::new(RecordingReadModelCache::new());

    let result = canceller(&api, &cache)
        .cancel_all(&event(), &selection, &payload())
        .await
        .unwrap();

    assert_eq!(result.failure_count(), 1);
    assert_eq!(cache.invalidated(), ReadModel::after_cancellation(&event()));
    assert!(cache.was_invalidated(&ReadModel::MealSummary(event())));
    assert!(cache.was_invalidated(&ReadModel::Seating(event())));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_total_failure() {
    let api = Arc::new(MockAttendeeApi::new().unreachable());
    let cache = Arc::new(RecordingReadModelCache::new());
    let settings = BatchSettings { preflight: true, ..BatchSettings::default() };

    let error = canceller(&api, &cache)
        .with_settings(settings)
        .cancel_all(&event(), &five_attendees(), &payload())
        .await
        .unwrap_err();

    assert!(matches!(error, BatchError::TotalNetworkFailure(_)));
    assert_eq!(api.cancellation_calls(), 0);
    assert!(cache.invalidated().is_empty());
}

// ============================================================================
// Reducer
// ============================================================================

#[test]
fn test_selection_edits() {
    let api = Arc::new(MockAttendeeApi::new());
    let cache = Arc::new(RecordingReadModelCache::new());

    ReducerTest::new(BulkCancelReducer::new())
        .with_env(test_env(&api, &cache))
        .given_state(BulkCancelState::new())
        .when_action(BulkCancelAction::SelectAll(five_attendees()))
        .when_action(BulkCancelAction::Select(guest("g-1")))
        .when_action(BulkCancelAction::Deselect(GuestId::new("r-2")))
        .then_state(|state| {
            assert_eq!(state.selection_len(), 4);
            assert!(!state.is_selected(&GuestId::new("r-2")));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_empty_submit_raises_error_without_effects() {
    let api = Arc::new(MockAttendeeApi::new());
    let cache = Arc::new(RecordingReadModelCache::new());

    ReducerTest::new(BulkCancelReducer::new())
        .with_env(test_env(&api, &cache))
        .given_state(BulkCancelState::new())
        .when_action(submit())
        .then_state(|state| {
            assert_eq!(
                state.status,
                CancelStatus::Failed {
                    message: "No attendees selected".to_string()
                }
            );
            assert_eq!(state.last_notice().unwrap().level, NoticeLevel::Error);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_submit_keeps_and_freezes_selection() {
    let api = Arc::new(MockAttendeeApi::new());
    let cache = Arc::new(RecordingReadModelCache::new());

    ReducerTest::new(BulkCancelReducer::new())
        .with_env(test_env(&api, &cache))
        .given_state(BulkCancelState::new())
        .when_action(BulkCancelAction::SelectAll(five_attendees()))
        .when_action(submit())
        .then_state(|state| {
            assert_eq!(state.status, CancelStatus::Cancelling { attempted: 5 });
            assert_eq!(state.selection_len(), 5);
        })
        .then_effects(|effects| assertions::assert_future_effects(effects, 1))
        .run();

    ReducerTest::new(BulkCancelReducer::new())
        .with_env(test_env(&api, &cache))
        .given_state(BulkCancelState::new())
        .when_action(BulkCancelAction::SelectAll(five_attendees()))
        .when_action(submit())
        .when_action(BulkCancelAction::ClearSelection)
        .then_state(|state| assert_eq!(state.selection_len(), 5))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_total_failure_keeps_selection() {
    let api = Arc::new(MockAttendeeApi::new());
    let cache = Arc::new(RecordingReadModelCache::new());

    ReducerTest::new(BulkCancelReducer::new())
        .with_env(test_env(&api, &cache))
        .given_state(BulkCancelState::new())
        .when_action(BulkCancelAction::SelectAll(five_attendees()))
        .when_action(submit())
        .when_action(BulkCancelAction::Settled {
            result: Err(BatchError::TotalNetworkFailure(ApiError::RequestFailed(
                "connection refused".to_string(),
            ))),
        })
        .then_state(|state| {
            assert_eq!(state.selection_len(), 5);
            assert!(matches!(state.status, CancelStatus::Failed { .. }));
            assert!(state.last_result.is_none());
        })
        .run();
}

#[tokio::test]
async fn test_store_clears_selection_after_partial_failure() {
    let api = Arc::new(
        MockAttendeeApi::new()
            .with_attendees(&event(), five_attendees())
            .failing("g-2", ApiError::Timeout),
    );
    let cache = Arc::new(RecordingReadModelCache::new());
    let store = Store::new(BulkCancelState::new(), BulkCancelReducer::new(), test_env(&api, &cache));

    store
        .send_and_settle(BulkCancelAction::SelectAll(five_attendees()))
        .await
        .unwrap();
    store.send_and_settle(submit()).await.unwrap();

    let (selected, status, notice) = store
        .state(|s| (s.selection_len(), s.status.clone(), s.last_notice().cloned()))
        .await;
    assert_eq!(selected, 0);
    assert_eq!(
        status,
        CancelStatus::Completed(BatchSummary::PartialFailure {
            success_count: 4,
            failure_count: 1,
            sample_messages: vec!["network timeout".to_string()],
        })
    );
    let notice = notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.message, "Cancelled 4 of 5 attendees. 1 failed: network timeout");
}
