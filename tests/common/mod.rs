//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use tca_runtime::features::contacts::{
    AddContactAction, ContactsAction, ContactsReducer, ContactsState, DestinationAction,
};
use tca_runtime::features::counter::{CounterAction, CounterReducer, CounterState, FactClient};
use tca_runtime::{PresentationAction, RuntimeSection, Store, UnhandledErrorPolicy};

/// Runtime settings that never panic on unhandled effect errors.
pub fn logging_runtime() -> RuntimeSection {
    RuntimeSection {
        unhandled_errors: UnhandledErrorPolicy::Log,
        print_changes: false,
    }
}

pub fn counter_store() -> Store<CounterState, CounterAction> {
    Store::new(
        CounterState::default(),
        CounterReducer::new(FactClient::canned()),
    )
}

pub fn contacts_store() -> Store<ContactsState, ContactsAction> {
    Store::new(ContactsState::default(), ContactsReducer::default())
}

/// Wrap an add-contact sheet action in the parent's action type.
pub fn add_contact(action: AddContactAction) -> ContactsAction {
    ContactsAction::Destination(PresentationAction::Presented(DestinationAction::AddContact(
        action,
    )))
}

/// Shared log of what a test effect observed.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

/// Create a temporary config file with `content`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
