use std::time::Duration;

use crate::effect::Effect;
use crate::features::counter::action::CounterAction;
use crate::features::counter::client::FactClient;
use crate::features::counter::state::CounterState;
use crate::reducer::Reducer;

/// Default time between two timer ticks.
pub const TIMER_INTERVAL: Duration = Duration::from_secs(1);

/// Cancel ids of the counter's long-running effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCancelId {
    Timer,
}

pub struct CounterReducer {
    facts: FactClient,
    tick_interval: Duration,
}

impl CounterReducer {
    pub fn new(facts: FactClient) -> Self {
        Self {
            facts,
            tick_interval: TIMER_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    fn start_timer(&self, state: &mut CounterState) -> Effect<CounterAction> {
        state.is_timer_running = true;
        let interval = self.tick_interval;
        Effect::run(move |send| async move {
            while !send.is_cancelled() {
                tokio::time::sleep(interval).await;
                send.send(CounterAction::TimerTick);
            }
            Ok(())
        })
        .cancellable(CounterCancelId::Timer)
    }

    fn stop_timer(&self, state: &mut CounterState) -> Effect<CounterAction> {
        state.is_timer_running = false;
        Effect::cancel(CounterCancelId::Timer)
    }
}

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;

    fn reduce(&self, state: &mut CounterState, action: CounterAction) -> Effect<CounterAction> {
        match action {
            CounterAction::DecrementButtonTapped => {
                state.count -= 1;
                state.fact = None;
                Effect::none()
            }
            CounterAction::IncrementButtonTapped => {
                state.count += 1;
                state.fact = None;
                Effect::none()
            }
            CounterAction::FactButtonTapped => {
                state.fact = None;
                state.is_loading = true;
                let count = state.count;
                let facts = self.facts.clone();
                Effect::run_catching(
                    move |send| async move {
                        let fact = facts.fetch(count).await?;
                        send.send(CounterAction::FactResponse(fact));
                        Ok(())
                    },
                    |error| CounterAction::FactFailed(format!("{error:#}")),
                )
            }
            CounterAction::FactResponse(fact) => {
                state.fact = Some(fact);
                state.is_loading = false;
                Effect::none()
            }
            CounterAction::FactFailed(error) => {
                tracing::warn!(count = state.count, %error, "Fact request failed");
                state.is_loading = false;
                Effect::none()
            }
            CounterAction::StartTimer => self.start_timer(state),
            CounterAction::StopTimer => self.stop_timer(state),
            CounterAction::TimerTick => {
                state.count += 1;
                state.fact = None;
                Effect::none()
            }
            CounterAction::ToggleTimerButtonTapped => {
                if state.is_timer_running {
                    self.stop_timer(state)
                } else {
                    self.start_timer(state)
                }
            }
        }
    }
}
