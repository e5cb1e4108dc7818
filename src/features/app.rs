//! Two independent counters side by side, composed with [`Scope`].
//!
//! Both tabs run the same counter feature with the same cancel ids; each
//! `Scope` keeps them apart.

use crate::effect::Effect;
use crate::features::counter::{CounterAction, CounterReducer, CounterState, FactClient};
use crate::reducer::{CasePath, Lens, Reducer, ReducerExt, Scope};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub tab1: CounterState,
    pub tab2: CounterState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Tab1(CounterAction),
    Tab2(CounterAction),
    /// Zero both counts and stop both timers.
    ResetAll,
}

impl AppAction {
    pub fn tab1_case() -> CasePath<AppAction, CounterAction> {
        CasePath::new(
            |action| match action {
                AppAction::Tab1(action) => Ok(action),
                other => Err(other),
            },
            AppAction::Tab1,
        )
    }

    pub fn tab2_case() -> CasePath<AppAction, CounterAction> {
        CasePath::new(
            |action| match action {
                AppAction::Tab2(action) => Ok(action),
                other => Err(other),
            },
            AppAction::Tab2,
        )
    }
}

/// The app's own logic, run after both tabs.
struct AppCore;

impl Reducer for AppCore {
    type State = AppState;
    type Action = AppAction;

    fn reduce(&self, state: &mut AppState, action: AppAction) -> Effect<AppAction> {
        match action {
            AppAction::ResetAll => {
                for tab in [&mut state.tab1, &mut state.tab2] {
                    tab.count = 0;
                    tab.fact = None;
                }
                Effect::merge([
                    Effect::send(AppAction::Tab1(CounterAction::StopTimer)),
                    Effect::send(AppAction::Tab2(CounterAction::StopTimer)),
                ])
            }
            AppAction::Tab1(_) | AppAction::Tab2(_) => Effect::none(),
        }
    }
}

pub struct AppReducer {
    inner: Box<dyn Reducer<State = AppState, Action = AppAction>>,
}

impl AppReducer {
    pub fn new(facts: FactClient) -> Self {
        let tab1 = Scope::new(
            Lens::new(|app: &AppState| &app.tab1, |app: &mut AppState| &mut app.tab1),
            AppAction::tab1_case(),
            CounterReducer::new(facts.clone()),
        );
        let tab2 = Scope::new(
            Lens::new(|app: &AppState| &app.tab2, |app: &mut AppState| &mut app.tab2),
            AppAction::tab2_case(),
            CounterReducer::new(facts),
        );
        Self {
            inner: tab1.combine(tab2).combine(AppCore).boxed(),
        }
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;

    fn reduce(&self, state: &mut AppState, action: AppAction) -> Effect<AppAction> {
        self.inner.reduce(state, action)
    }
}
