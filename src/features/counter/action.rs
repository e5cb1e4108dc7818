/// Everything the user (or the counter's effects) can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    DecrementButtonTapped,
    IncrementButtonTapped,
    FactButtonTapped,
    FactResponse(String),
    /// The fact client failed; carries the rendered error.
    FactFailed(String),
    StartTimer,
    StopTimer,
    TimerTick,
    /// Starts the timer when stopped, stops it when running.
    ToggleTimerButtonTapped,
}
