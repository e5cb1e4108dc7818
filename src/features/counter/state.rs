#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterState {
    pub count: i64,
    /// Last fact fetched for `count`; cleared whenever the count changes.
    pub fact: Option<String>,
    pub is_loading: bool,
    pub is_timer_running: bool,
}
