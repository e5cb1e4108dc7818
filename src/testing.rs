//! Exhaustive assertion harness for reducers and their effects.
//!
//! ```ignore
//! let mut store = TestStore::new(CounterState::default(), CounterReducer::new(client));
//! store.send(CounterAction::FactButtonTapped, |state| state.is_loading = true);
//! store
//!     .receive(CounterAction::FactResponse(fact.clone()), |state| {
//!         state.is_loading = false;
//!         state.fact = Some(fact);
//!     })
//!     .await;
//! store.finish().await;
//! ```
//!
//! Unlike [`crate::Store`], actions produced by effects are not reduced
//! until the test receives them, so every state change is asserted.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::Comparison;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::UnhandledErrorPolicy;
use crate::effect::{is_live, EffectRuntime, Latch};
use crate::reducer::{Reducer, ReducerExt};

/// Default time `receive` and `finish` wait for effects.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How strictly a [`TestStore`] checks the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exhaustivity {
    /// Every state change and every received action must be asserted, and
    /// all effects must have finished by [`TestStore::finish`].
    #[default]
    On,
    /// Only what the test mentions is checked: `update` closures only need
    /// to set the fields they care about, unasserted received actions are
    /// reduced and skipped, and `finish` cancels leftover effects.
    Off,
}

pub struct TestStore<S, A> {
    reducer: Box<dyn Reducer<State = S, Action = A>>,
    state: S,
    runtime: EffectRuntime<A>,
    received: mpsc::UnboundedReceiver<(A, Option<Latch>)>,
    pending: VecDeque<(A, Option<Latch>)>,
    exhaustivity: Exhaustivity,
    timeout: Duration,
}

impl<S, A> TestStore<S, A>
where
    S: Clone + PartialEq + fmt::Debug + Send + 'static,
    A: PartialEq + fmt::Debug + Send + 'static,
{
    /// Must be called from within a Tokio runtime.
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Reducer<State = S, Action = A>,
    {
        let (tx, received) = mpsc::unbounded_channel();
        let sink = Arc::new(move |action: A, cancelled: Option<Latch>| {
            let _ = tx.send((action, cancelled));
        });
        Self {
            reducer: reducer.boxed(),
            state: initial,
            runtime: EffectRuntime::new(sink, Handle::current(), UnhandledErrorPolicy::Log),
            received,
            pending: VecDeque::new(),
            exhaustivity: Exhaustivity::On,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_exhaustivity(mut self, exhaustivity: Exhaustivity) -> Self {
        self.exhaustivity = exhaustivity;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn in_flight_effects(&self) -> usize {
        self.runtime.in_flight()
    }

    /// Send `action` and assert the resulting state.
    ///
    /// `update` receives the state as it was before the action and must turn
    /// it into the expected state.
    #[track_caller]
    pub fn send(&mut self, action: A, update: impl FnOnce(&mut S)) {
        self.collect_received();
        if self.exhaustivity == Exhaustivity::On && !self.pending.is_empty() {
            panic!(
                "Must handle {} received action(s) before sending {:?}:\n{}",
                self.pending.len(),
                action,
                self.describe_pending()
            );
        }

        let description = format!("{action:?}");
        let before = self.state.clone();
        self.reduce(action);
        self.assert_state(&description, before, update);
    }

    /// Wait for the next action produced by an effect, reduce it and assert
    /// the resulting state.
    ///
    /// With [`Exhaustivity::Off`], actions received before `expected` are
    /// reduced without assertions.
    pub async fn receive(&mut self, expected: A, update: impl FnOnce(&mut S)) {
        loop {
            let Some(action) = self.next_received().await else {
                panic!(
                    "Expected to receive {:?}, but no action arrived within {:?}",
                    expected, self.timeout
                );
            };

            if action == expected {
                let description = format!("{action:?}");
                let before = self.state.clone();
                self.reduce(action);
                self.assert_state(&description, before, update);
                return;
            }

            match self.exhaustivity {
                Exhaustivity::On => panic!(
                    "Received unexpected action (< expected, > received):\n{}",
                    Comparison::new(&expected, &action)
                ),
                Exhaustivity::Off => self.reduce(action),
            }
        }
    }

    /// Reduce every action received so far without asserting anything.
    pub async fn skip_received_actions(&mut self) {
        tokio::task::yield_now().await;
        self.collect_received();
        while let Some((action, cancelled)) = self.pending.pop_front() {
            if is_live(cancelled.as_ref()) {
                self.reduce(action);
            }
            self.collect_received();
        }
    }

    /// Assert the test left nothing behind.
    ///
    /// Waits up to the timeout for in-flight effects, then checks that no
    /// received action went unasserted and no effect failed unhandled.
    pub async fn finish(mut self) {
        let settled = tokio::time::timeout(self.timeout, self.runtime.settled()).await;
        if settled.is_err() {
            match self.exhaustivity {
                Exhaustivity::On => panic!(
                    "{} effect(s) still running after {:?}; cancel them or await their actions",
                    self.runtime.in_flight(),
                    self.timeout
                ),
                Exhaustivity::Off => self.runtime.shutdown(),
            }
        }

        self.collect_received();
        self.pending.retain(|(_, cancelled)| is_live(cancelled.as_ref()));
        if self.exhaustivity == Exhaustivity::On && !self.pending.is_empty() {
            panic!(
                "{} received action(s) were not asserted:\n{}",
                self.pending.len(),
                self.describe_pending()
            );
        }

        let failures = self.runtime.unhandled_errors();
        assert_eq!(failures, 0, "{failures} effect(s) failed with an unhandled error");
    }

    fn reduce(&mut self, action: A) {
        let effect = self.reducer.reduce(&mut self.state, action);
        self.runtime.start(effect);
    }

    #[track_caller]
    fn assert_state(&self, action: &str, before: S, update: impl FnOnce(&mut S)) {
        let mut expected = match self.exhaustivity {
            Exhaustivity::On => before,
            Exhaustivity::Off => self.state.clone(),
        };
        update(&mut expected);
        if expected != self.state {
            panic!(
                "State after {} does not match (< expected, > actual):\n{}",
                action,
                Comparison::new(&expected, &self.state)
            );
        }
    }

    /// Next received action whose effect was not cancelled in the meantime.
    async fn next_received(&mut self) -> Option<A> {
        while let Some((action, cancelled)) = self.pending.pop_front() {
            if is_live(cancelled.as_ref()) {
                return Some(action);
            }
        }
        let received = &mut self.received;
        let next_live = async move {
            loop {
                let (action, cancelled) = received.recv().await?;
                if is_live(cancelled.as_ref()) {
                    return Some(action);
                }
            }
        };
        tokio::time::timeout(self.timeout, next_live)
            .await
            .ok()
            .flatten()
    }

    fn collect_received(&mut self) {
        while let Ok(received) = self.received.try_recv() {
            self.pending.push_back(received);
        }
    }

    fn describe_pending(&self) -> String {
        self.pending
            .iter()
            .map(|(action, _)| format!("  {action:?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S, A> Drop for TestStore<S, A> {
    fn drop(&mut self) {
        self.runtime.shutdown();
    }
}
