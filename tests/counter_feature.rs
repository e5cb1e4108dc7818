mod common;

use common::counter_store;
use tca_runtime::features::counter::{CounterAction, CounterReducer, CounterState, FactClient};
use tca_runtime::testing::TestStore;
use tca_runtime::Store;

#[tokio::test]
async fn increment_increment_decrement() {
    let store = counter_store();
    assert_eq!(store.state().count, 0);

    store.send(CounterAction::IncrementButtonTapped);
    assert_eq!(store.state().count, 1);

    store.send(CounterAction::IncrementButtonTapped);
    assert_eq!(store.state().count, 2);

    store.send(CounterAction::DecrementButtonTapped);
    assert_eq!(store.state().count, 1);
}

#[tokio::test]
async fn test_store_asserts_every_change() {
    let mut store = TestStore::new(
        CounterState::default(),
        CounterReducer::new(FactClient::canned()),
    );
    store.send(CounterAction::IncrementButtonTapped, |state| state.count = 1);
    store.send(CounterAction::IncrementButtonTapped, |state| state.count = 2);
    store.send(CounterAction::DecrementButtonTapped, |state| state.count = 1);
    store.finish().await;
}

#[tokio::test]
async fn replay_is_deterministic() {
    let script = [
        CounterAction::IncrementButtonTapped,
        CounterAction::IncrementButtonTapped,
        CounterAction::DecrementButtonTapped,
        CounterAction::FactResponse("cached".to_string()),
        CounterAction::IncrementButtonTapped,
        CounterAction::TimerTick,
    ];

    let first = counter_store();
    let second = counter_store();
    for action in script.iter().cloned() {
        first.send(action.clone());
        second.send(action);
    }

    assert_eq!(first.state(), second.state());
    assert_eq!(
        first.state(),
        CounterState {
            count: 3,
            fact: None,
            is_loading: false,
            is_timer_running: false,
        }
    );
}

#[tokio::test]
async fn fact_is_fetched_for_current_count() {
    let mut store = TestStore::new(
        CounterState {
            count: 7,
            ..Default::default()
        },
        CounterReducer::new(FactClient::canned()),
    );

    store.send(CounterAction::FactButtonTapped, |state| state.is_loading = true);
    store
        .receive(
            CounterAction::FactResponse("7 is a good number.".to_string()),
            |state| {
                state.is_loading = false;
                state.fact = Some("7 is a good number.".to_string());
            },
        )
        .await;
    store.finish().await;
}

#[tokio::test]
async fn fact_failure_becomes_an_action() {
    let mut store = TestStore::new(
        CounterState::default(),
        CounterReducer::new(FactClient::failing("offline")),
    );

    store.send(CounterAction::FactButtonTapped, |state| state.is_loading = true);
    store
        .receive(CounterAction::FactFailed("offline".to_string()), |state| {
            state.is_loading = false;
        })
        .await;
    store.finish().await;
}

#[tokio::test]
async fn injected_client_receives_count() {
    let client = FactClient::new(|number| async move { Ok(format!("fact #{number}")) });
    let store = Store::new(CounterState::default(), CounterReducer::new(client));

    store.send(CounterAction::IncrementButtonTapped);
    store.send(CounterAction::FactButtonTapped);
    assert!(store.state().is_loading);

    store.settled().await;
    let state = store.state();
    assert!(!state.is_loading);
    assert_eq!(state.fact.as_deref(), Some("fact #1"));
}

#[tokio::test]
async fn changing_count_clears_fact() {
    let store = counter_store();
    store.send(CounterAction::FactResponse("old fact".to_string()));
    assert!(store.state().fact.is_some());

    store.send(CounterAction::IncrementButtonTapped);
    assert_eq!(store.state().fact, None);
}
