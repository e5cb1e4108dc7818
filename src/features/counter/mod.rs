mod action;
mod client;
mod reducer;
mod state;

pub use action::CounterAction;
pub use client::FactClient;
pub use reducer::{CounterCancelId, CounterReducer, TIMER_INTERVAL};
pub use state::CounterState;
