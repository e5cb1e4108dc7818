//! tca-demo: scripted runs of the demo features against a live store.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tca_runtime::features::contacts::{
    AddContactAction, ContactDetailAction, ContactsAction, ContactsReducer, ContactsState,
    DestinationAction,
};
use tca_runtime::features::counter::{CounterAction, CounterReducer, CounterState, FactClient};
use tca_runtime::logging::init_tracing;
use tca_runtime::{PresentationAction, RuntimeConfig, StackAction, Store};

/// Drive the demo features through the state-management runtime.
#[derive(Parser, Debug)]
#[command(name = "tca-demo")]
#[command(about = "Scripted demos of the store, effects and navigation")]
struct Args {
    /// Config file (default: ~/.config/tca-runtime/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every action and the state diff it caused
    #[arg(long)]
    print_changes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count, fetch a fact and let the timer tick
    Counter {
        /// Timer ticks to wait for before stopping the timer
        #[arg(long, default_value = "3")]
        ticks: u32,

        /// Milliseconds between ticks
        #[arg(long, default_value = "1000")]
        interval_ms: u64,
    },
    /// Add a contact through the presented sheet
    Contacts {
        /// Name to enter
        #[arg(long, default_value = "Blob")]
        name: String,
    },
    /// Push contact details onto the stack and pop back to the root
    Stack {
        /// Number of screens to push
        #[arg(long, default_value = "3")]
        depth: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load_from(path),
        None => RuntimeConfig::load(),
    }
    .context("loading config")?;
    if args.print_changes {
        config.runtime.print_changes = true;
        if std::env::var_os(tca_runtime::logging::LOG_ENV).is_none() {
            config.logging.filter = format!("{},tca_runtime::changes=debug", config.logging.filter);
        }
    }
    init_tracing(&config.logging);

    match args.command {
        Command::Counter { ticks, interval_ms } => {
            run_counter(&config, ticks, Duration::from_millis(interval_ms)).await
        }
        Command::Contacts { name } => run_contacts(&config, name).await,
        Command::Stack { depth } => run_stack(&config, depth).await,
    }
}

async fn run_counter(config: &RuntimeConfig, ticks: u32, interval: Duration) -> Result<()> {
    let reducer = CounterReducer::new(FactClient::canned()).with_tick_interval(interval);
    let store = Store::with_config(CounterState::default(), reducer, &config.runtime);

    store.send(CounterAction::IncrementButtonTapped);
    store.send(CounterAction::IncrementButtonTapped);
    store.send(CounterAction::DecrementButtonTapped);
    store.send(CounterAction::FactButtonTapped);
    store.settled().await;
    tracing::info!(state = ?store.state(), "Fact loaded");

    let target = store.with_state(|state| state.count) + i64::from(ticks);
    let mut updates = store.subscribe();
    store.send(CounterAction::StartTimer);
    while store.with_state(|state| state.count) < target {
        updates.changed().await.context("store dropped")?;
    }
    store.send(CounterAction::StopTimer);
    store.settled().await;

    tracing::info!(state = ?store.state(), "Timer stopped");
    println!("{:#?}", store.state());
    Ok(())
}

async fn run_contacts(config: &RuntimeConfig, name: String) -> Result<()> {
    let store = Store::with_config(
        ContactsState::default(),
        ContactsReducer::default(),
        &config.runtime,
    );

    store.send(ContactsAction::AddButtonTapped);
    store.send(add_contact(AddContactAction::SetName(name)));
    store.send(add_contact(AddContactAction::SaveButtonTapped));
    store.settled().await;

    let state = store.state();
    tracing::info!(
        contacts = state.contacts.len(),
        presented = state.destination.is_presented(),
        "Contact saved"
    );
    println!("{:#?}", state.contacts);
    Ok(())
}

async fn run_stack(config: &RuntimeConfig, depth: usize) -> Result<()> {
    let store = Store::with_config(
        ContactsState::default(),
        ContactsReducer::default(),
        &config.runtime,
    );

    for index in 0..depth {
        store.send(ContactsAction::AddButtonTapped);
        store.send(add_contact(AddContactAction::SetName(format!("Contact {}", index + 1))));
        store.send(add_contact(AddContactAction::SaveButtonTapped));
        store.settled().await;
    }

    let contacts: Vec<_> = store.with_state(|state| state.contacts.iter().map(|c| c.id).collect());
    for id in contacts {
        store.send(ContactsAction::ContactTapped(id));
    }
    let ids = store.with_state(|state| state.path.ids());
    tracing::info!(depth = ids.len(), "Pushed detail screens");

    if let Some(top) = ids.last().copied() {
        store.send(ContactsAction::Path(StackAction::Element {
            id: top,
            action: ContactDetailAction::DeleteButtonTapped,
        }));
    }
    if let Some(bottom) = ids.first().copied() {
        store.send(ContactsAction::Path(StackAction::PopFrom { id: bottom }));
    }
    store.settled().await;

    let state = store.state();
    tracing::info!(depth = state.path.len(), "Popped to root");
    println!("{:#?}", state);
    Ok(())
}

fn add_contact(action: AddContactAction) -> ContactsAction {
    ContactsAction::Destination(PresentationAction::Presented(DestinationAction::AddContact(
        action,
    )))
}
