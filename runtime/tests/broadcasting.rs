//! Integration tests for Store action broadcasting
//!
//! Subscribers observe every action the store reduces: actions sent by
//! callers and actions fed back by effects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use folio_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use folio_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

/// A miniature request lifecycle: Start → Progress(1..=3) → Done | Failed
#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    Start { id: u64 },
    Progress { id: u64, step: u32 },
    Done { id: u64 },
    Failed { id: u64 },
    Increment,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    counter: u32,
    steps: Vec<u32>,
}

struct TestEnvironment;

struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Start { id } => {
                smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Some(TestAction::Progress { id, step: 1 })
                }))]
            },
            TestAction::Progress { id, step } => {
                state.steps.push(step);
                if step < 3 {
                    smallvec![Effect::Future(Box::pin(async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(TestAction::Progress { id, step: step + 1 })
                    }))]
                } else {
                    smallvec![Effect::Future(Box::pin(async move { Some(TestAction::Done { id }) }))]
                }
            },
            TestAction::Done { .. } | TestAction::Failed { .. } => SmallVec::new(),
            TestAction::Increment => {
                state.counter += 1;
                SmallVec::new()
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<TestAction>) -> Vec<TestAction> {
    let mut received = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(action) => received.push(action),
            Err(TryRecvError::Lagged(_)) => {},
            Err(TryRecvError::Empty | TryRecvError::Closed) => return received,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_wait_for_terminal_action() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Start { id: 42 },
            |action| matches!(action, TestAction::Done { id: 42 } | TestAction::Failed { id: 42 }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Done { id: 42 });
    assert_eq!(store.state(|s| s.steps.clone()).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_send_and_wait_for_timeout() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Start { id: 99 },
            |action| matches!(action, TestAction::Failed { id: 99 }),
            Duration::from_millis(50),
        )
        .await;

    assert_eq!(result, Err(StoreError::Timeout));
}

#[tokio::test]
async fn test_sent_action_is_itself_observable() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Increment,
            |action| matches!(action, TestAction::Increment),
            Duration::from_millis(100),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Increment);
}

#[tokio::test]
async fn test_subscribers_see_every_reduced_action_in_order() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store
        .send_and_wait_for(
            TestAction::Start { id: 7 },
            |action| matches!(action, TestAction::Done { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            TestAction::Start { id: 7 },
            TestAction::Progress { id: 7, step: 1 },
            TestAction::Progress { id: 7, step: 2 },
            TestAction::Progress { id: 7, step: 3 },
            TestAction::Done { id: 7 },
        ]
    );
}

#[tokio::test]
async fn test_concurrent_requests_filter_by_id() {
    let store = Arc::new(store());

    let mut handles = vec![];
    for id in 1..=5 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .send_and_wait_for(
                    TestAction::Start { id },
                    move |action| matches!(action, TestAction::Done { id: done } if *done == id),
                    Duration::from_secs(2),
                )
                .await
        }));
    }

    for (index, handle) in handles.into_iter().enumerate() {
        let id = u64::try_from(index).unwrap() + 1;
        assert_eq!(handle.await.expect("task panicked"), Ok(TestAction::Done { id }));
    }

    assert_eq!(store.state(|s| s.steps.len()).await, 15);
}

#[tokio::test]
async fn test_lagging_subscriber_skips_but_keeps_receiving() {
    let store = Store::with_broadcast_capacity(TestState::default(), TestReducer, TestEnvironment, 4);
    let mut rx = store.subscribe_actions();

    for _ in 0..20 {
        store.send(TestAction::Increment).await.unwrap();
    }

    let mut lagged = false;
    let mut received = 0;
    loop {
        match rx.try_recv() {
            Ok(_) => received += 1,
            Err(TryRecvError::Lagged(_)) => lagged = true,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    assert!(lagged, "expected subscriber to lag");
    assert_eq!(received, 4);
    assert_eq!(store.state(|s| s.counter).await, 20);
}

#[tokio::test]
async fn test_multiple_independent_subscribers() {
    let store = store();
    let mut first = store.subscribe_actions();
    let mut second = store.subscribe_actions();

    store.send(TestAction::Increment).await.unwrap();
    store.send(TestAction::Increment).await.unwrap();

    assert_eq!(drain(&mut first).len(), 2);
    assert_eq!(drain(&mut second).len(), 2);
}
