/// State of a confirmation alert. Alerts have no logic of their own; the
/// presenting feature reacts to the button actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub confirm: String,
}

impl AlertState {
    pub fn confirm_deletion() -> Self {
        Self {
            title: "Are you sure?".to_string(),
            confirm: "Delete".to_string(),
        }
    }
}
