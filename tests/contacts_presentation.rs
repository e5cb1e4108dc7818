mod common;

use std::time::Duration;

use common::{add_contact, contacts_store};
use tca_runtime::features::contacts::{
    AddContactAction, AddContactDelegate, AddContactState, AlertState, Contact,
    ContactsAlertAction, ContactsAction, ContactsReducer, ContactsState, DestinationAction,
    DestinationState,
};
use tca_runtime::testing::TestStore;
use tca_runtime::{
    CasePath, Effect, Lens, PresentationAction, PresentationState, Reduce, Reducer, ReducerExt,
    Store,
};

fn edit_name(state: &mut ContactsState, name: &str) {
    if let Some(DestinationState::AddContact(sheet)) = state.destination.get_mut() {
        sheet.contact.name = name.to_string();
    }
}

#[tokio::test]
async fn add_contact_flow() {
    let mut store = TestStore::new(ContactsState::default(), ContactsReducer::default());

    store.send(ContactsAction::AddButtonTapped, |state| {
        state
            .destination
            .present(DestinationState::AddContact(AddContactState {
                contact: Contact::new(1, ""),
            }));
    });
    store.send(
        add_contact(AddContactAction::SetName("Blob".to_string())),
        |state| edit_name(state, "Blob"),
    );
    store.send(add_contact(AddContactAction::SaveButtonTapped), |_| {});
    store
        .receive(
            add_contact(AddContactAction::Delegate(AddContactDelegate::SaveContact(
                Contact::new(1, "Blob"),
            ))),
            |state| state.contacts.push(Contact::new(1, "Blob")),
        )
        .await;
    store
        .receive(
            ContactsAction::Destination(PresentationAction::Dismiss),
            |state| {
                state.destination.dismiss();
            },
        )
        .await;
    store.finish().await;
}

#[tokio::test]
async fn cancel_dismisses_without_saving() {
    let mut store = TestStore::new(ContactsState::default(), ContactsReducer::default());

    store.send(ContactsAction::AddButtonTapped, |state| {
        state
            .destination
            .present(DestinationState::AddContact(AddContactState {
                contact: Contact::new(1, ""),
            }));
    });
    store.send(add_contact(AddContactAction::CancelButtonTapped), |_| {});
    store
        .receive(
            ContactsAction::Destination(PresentationAction::Dismiss),
            |state| {
                state.destination.dismiss();
            },
        )
        .await;
    store.finish().await;
}

#[tokio::test]
async fn live_store_saves_and_dismisses() {
    let store = contacts_store();

    store.send(ContactsAction::AddButtonTapped);
    store.send(add_contact(AddContactAction::SetName("Blob".to_string())));
    store.send(add_contact(AddContactAction::SaveButtonTapped));
    store.settled().await;

    let state = store.state();
    assert_eq!(state.contacts, vec![Contact::new(1, "Blob")]);
    assert!(!state.destination.is_presented());
}

#[tokio::test]
async fn sheet_ids_keep_incrementing() {
    let store = contacts_store();

    for name in ["Blob", "Blob Jr"] {
        store.send(ContactsAction::AddButtonTapped);
        store.send(add_contact(AddContactAction::SetName(name.to_string())));
        store.send(add_contact(AddContactAction::SaveButtonTapped));
        store.settled().await;
    }

    assert_eq!(
        store.state().contacts,
        vec![Contact::new(1, "Blob"), Contact::new(2, "Blob Jr")]
    );
}

#[tokio::test]
async fn delete_alert_confirmation() {
    let initial = ContactsState {
        contacts: vec![Contact::new(1, "Blob"), Contact::new(2, "Blob Jr")],
        ..Default::default()
    };
    let mut store = TestStore::new(initial, ContactsReducer::default());

    store.send(ContactsAction::DeleteButtonTapped(2), |state| {
        state.destination.present(DestinationState::Alert {
            id: 2,
            alert: AlertState::confirm_deletion(),
        });
    });
    store.send(
        ContactsAction::Destination(PresentationAction::Presented(DestinationAction::Alert(
            ContactsAlertAction::ConfirmDeletion { id: 2 },
        ))),
        |state| {
            state.contacts.pop();
            state.destination.dismiss();
        },
    );
    store.finish().await;
}

#[tokio::test]
async fn action_for_absent_sheet_is_dropped() {
    let store = contacts_store();
    store.send(add_contact(AddContactAction::SetName("ghost".to_string())));
    store.send(add_contact(AddContactAction::Delegate(
        AddContactDelegate::SaveContact(Contact::new(9, "ghost")),
    )));

    assert_eq!(store.state(), ContactsState::default());
    assert_eq!(store.in_flight_effects(), 0);
}

#[tokio::test]
async fn parent_dismiss_clears_the_sheet() {
    let store = contacts_store();
    store.send(ContactsAction::AddButtonTapped);
    store.send(ContactsAction::Destination(PresentationAction::Dismiss));

    assert!(!store.state().destination.is_presented());
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Host {
    ticker: PresentationState<u32>,
}

#[derive(Debug, Clone, PartialEq)]
enum HostAction {
    Open,
    Close,
    Ticker(PresentationAction<TickerAction>),
}

#[derive(Debug, Clone, PartialEq)]
enum TickerAction {
    Start,
    Tick,
    Done,
}

fn ticker() -> impl Reducer<State = u32, Action = TickerAction> {
    Reduce::new(|ticks: &mut u32, action: TickerAction| match action {
        TickerAction::Start => Effect::run(|send| async move {
            while !send.is_cancelled() {
                tokio::time::sleep(Duration::from_secs(1)).await;
                send.send(TickerAction::Tick);
            }
            Ok(())
        }),
        TickerAction::Tick => {
            *ticks += 1;
            Effect::none()
        }
        TickerAction::Done => Effect::run(|send| async move {
            send.dismiss();
            Ok(())
        }),
    })
}

fn host() -> impl Reducer<State = Host, Action = HostAction> {
    Reduce::new(|state: &mut Host, action: HostAction| {
        match action {
            HostAction::Open => state.ticker.present(0),
            HostAction::Close => {
                state.ticker.dismiss();
            }
            HostAction::Ticker(_) => {}
        }
        Effect::none()
    })
    .if_let(
        Lens::new(|host: &Host| &host.ticker, |host: &mut Host| &mut host.ticker),
        CasePath::new(
            |action: HostAction| match action {
                HostAction::Ticker(action) => Ok(action),
                other => Err(other),
            },
            HostAction::Ticker,
        ),
        ticker(),
    )
}

fn tick() -> HostAction {
    HostAction::Ticker(PresentationAction::Presented(TickerAction::Tick))
}

#[tokio::test(start_paused = true)]
async fn closing_the_slot_cancels_child_effects() {
    let store = Store::new(Host::default(), host());

    store.send(HostAction::Open);
    store.send(HostAction::Ticker(PresentationAction::Presented(TickerAction::Start)));
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(store.state().ticker.get(), Some(&2));

    store.send(HostAction::Close);
    store.settled().await;
    assert_eq!(store.in_flight_effects(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!store.state().ticker.is_presented());

    store.send(HostAction::Open);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(store.state().ticker.get(), Some(&0));
}

#[tokio::test(start_paused = true)]
async fn child_dismiss_cancels_its_own_effects() {
    let store = Store::new(Host::default(), host());

    store.send(HostAction::Open);
    store.send(HostAction::Ticker(PresentationAction::Presented(TickerAction::Start)));
    store.send(HostAction::Ticker(PresentationAction::Presented(TickerAction::Done)));
    store.settled().await;

    assert!(!store.state().ticker.is_presented());
    assert_eq!(store.in_flight_effects(), 0);
}

#[tokio::test(start_paused = true)]
async fn replacing_the_presentation_cancels_the_old_one() {
    let store = Store::new(Host::default(), host());

    store.send(HostAction::Open);
    store.send(HostAction::Ticker(PresentationAction::Presented(TickerAction::Start)));
    store.send(HostAction::Open);
    tokio::time::sleep(Duration::from_millis(3500)).await;

    assert_eq!(store.state().ticker.get(), Some(&0));
    assert_eq!(store.in_flight_effects(), 0);
}

#[tokio::test]
async fn late_child_action_after_close_is_ignored() {
    let mut store = TestStore::new(Host::default(), host());

    store.send(HostAction::Open, |state| state.ticker.present(0));
    store.send(tick(), |state| {
        if let Some(ticks) = state.ticker.get_mut() {
            *ticks = 1;
        }
    });
    store.send(HostAction::Close, |state| {
        state.ticker.dismiss();
    });
    store.send(tick(), |_| {});
    store.finish().await;
}
