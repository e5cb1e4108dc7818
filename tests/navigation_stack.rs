mod common;

use std::time::Duration;

use tca_runtime::features::contacts::{
    AlertState, Contact, ContactDetailAction, ContactDetailDelegate, ContactDetailState,
    ContactsAction, ContactsReducer, ContactsState, DetailAlertAction,
};
use tca_runtime::testing::TestStore;
use tca_runtime::{
    CasePath, Effect, Lens, PresentationAction, Reduce, Reducer, ReducerExt, StackAction,
    StackElementId, StackState, Store,
};

fn two_contacts() -> ContactsState {
    ContactsState {
        contacts: vec![Contact::new(1, "Blob"), Contact::new(2, "Blob Jr")],
        ..Default::default()
    }
}

fn detail(id: StackElementId, action: ContactDetailAction) -> ContactsAction {
    ContactsAction::Path(StackAction::Element { id, action })
}

#[tokio::test]
async fn tapping_contacts_pushes_details() {
    let store = Store::new(two_contacts(), ContactsReducer::default());

    store.send(ContactsAction::ContactTapped(1));
    store.send(ContactsAction::ContactTapped(2));

    let state = store.state();
    let names: Vec<_> = state
        .path
        .iter()
        .map(|(_, detail)| detail.contact.name.clone())
        .collect();
    assert_eq!(names, vec!["Blob", "Blob Jr"]);
}

#[tokio::test]
async fn delete_from_detail_removes_contact_and_pops() {
    let mut store = TestStore::new(two_contacts(), ContactsReducer::default());

    store.send(ContactsAction::ContactTapped(1), |state| {
        state
            .path
            .push(ContactDetailState::new(Contact::new(1, "Blob")));
    });
    let id = store.state().path.ids()[0];

    store.send(detail(id, ContactDetailAction::DeleteButtonTapped), |state| {
        if let Some(detail) = state.path.get_mut(id) {
            detail.alert.present(AlertState::confirm_deletion());
        }
    });
    store.send(
        detail(
            id,
            ContactDetailAction::Alert(PresentationAction::Presented(
                DetailAlertAction::ConfirmDeletion,
            )),
        ),
        |state| {
            if let Some(detail) = state.path.get_mut(id) {
                detail.alert.dismiss();
            }
        },
    );
    store
        .receive(
            detail(
                id,
                ContactDetailAction::Delegate(ContactDetailDelegate::ConfirmDeletion),
            ),
            |state| state.contacts.retain(|contact| contact.id != 1),
        )
        .await;
    store
        .receive(ContactsAction::Path(StackAction::PopFrom { id }), |state| {
            state.path.pop_from(id);
        })
        .await;
    store.finish().await;
}

#[tokio::test]
async fn pop_from_truncates_the_stack() {
    let store = Store::new(two_contacts(), ContactsReducer::default());
    store.send(ContactsAction::ContactTapped(1));
    store.send(ContactsAction::ContactTapped(2));
    store.send(ContactsAction::ContactTapped(1));

    let ids = store.with_state(|state| state.path.ids());
    store.send(ContactsAction::Path(StackAction::PopFrom { id: ids[1] }));

    assert_eq!(store.with_state(|state| state.path.ids()), vec![ids[0]]);
}

#[tokio::test]
async fn unknown_element_id_is_a_noop() {
    let store = Store::new(two_contacts(), ContactsReducer::default());
    store.send(ContactsAction::ContactTapped(1));
    let gone = store.with_state(|state| state.path.ids()[0]);
    store.send(ContactsAction::Path(StackAction::PopFrom { id: gone }));
    let before = store.state();

    store.send(detail(gone, ContactDetailAction::DeleteButtonTapped));
    store.send(detail(
        gone,
        ContactDetailAction::Delegate(ContactDetailDelegate::ConfirmDeletion),
    ));
    store.send(ContactsAction::Path(StackAction::PopFrom { id: gone }));

    assert_eq!(store.state(), before);
    assert_eq!(store.state().contacts.len(), 2);
}

#[tokio::test]
async fn push_action_uses_reserved_id() {
    let store = Store::new(two_contacts(), ContactsReducer::default());
    let id = StackElementId::generate();

    store.send(ContactsAction::Path(StackAction::Push {
        id,
        state: ContactDetailState::new(Contact::new(2, "Blob Jr")),
    }));

    let state = store.state();
    assert_eq!(state.path.ids(), vec![id]);
    assert_eq!(
        state.path.get(id).map(|detail| detail.contact.id),
        Some(2)
    );
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Screens {
    path: StackState<u32>,
}

#[derive(Debug, Clone, PartialEq)]
enum ScreensAction {
    Open,
    /// Replace the whole stack with a single fresh screen.
    Reset,
    Path(StackAction<u32, ScreenAction>),
}

#[derive(Debug, Clone, PartialEq)]
enum ScreenAction {
    Start,
    Tick,
    Close,
}

fn screen() -> impl Reducer<State = u32, Action = ScreenAction> {
    Reduce::new(|ticks: &mut u32, action: ScreenAction| match action {
        ScreenAction::Start => Effect::run(|send| async move {
            while !send.is_cancelled() {
                tokio::time::sleep(Duration::from_secs(1)).await;
                send.send(ScreenAction::Tick);
            }
            Ok(())
        }),
        ScreenAction::Tick => {
            *ticks += 1;
            Effect::none()
        }
        ScreenAction::Close => Effect::run(|send| async move {
            send.dismiss();
            Ok(())
        }),
    })
}

fn screens() -> impl Reducer<State = Screens, Action = ScreensAction> {
    Reduce::new(|state: &mut Screens, action: ScreensAction| {
        match action {
            ScreensAction::Open => {
                state.path.push(0);
            }
            ScreensAction::Reset => {
                state.path = StackState::new();
                state.path.push(0);
            }
            ScreensAction::Path(_) => {}
        }
        Effect::none()
    })
    .for_each(
        Lens::new(
            |screens: &Screens| &screens.path,
            |screens: &mut Screens| &mut screens.path,
        ),
        CasePath::new(
            |action: ScreensAction| match action {
                ScreensAction::Path(action) => Ok(action),
                other => Err(other),
            },
            ScreensAction::Path,
        ),
        screen(),
    )
}

fn on(id: StackElementId, action: ScreenAction) -> ScreensAction {
    ScreensAction::Path(StackAction::Element { id, action })
}

#[tokio::test(start_paused = true)]
async fn popping_cancels_effects_of_removed_elements() {
    let store = Store::new(Screens::default(), screens());
    store.send(ScreensAction::Open);
    store.send(ScreensAction::Open);
    store.send(ScreensAction::Open);
    let ids = store.with_state(|state| state.path.ids());
    for id in &ids {
        store.send(on(*id, ScreenAction::Start));
    }

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.in_flight_effects(), 3);

    store.send(ScreensAction::Path(StackAction::PopFrom { id: ids[1] }));
    tokio::time::sleep(Duration::from_secs(3)).await;

    let state = store.state();
    assert_eq!(state.path.ids(), vec![ids[0]]);
    assert_eq!(state.path.get(ids[0]), Some(&4));
    assert_eq!(store.in_flight_effects(), 1);
}

#[tokio::test(start_paused = true)]
async fn element_dismiss_pops_itself() {
    let store = Store::new(Screens::default(), screens());
    store.send(ScreensAction::Open);
    store.send(ScreensAction::Open);
    let ids = store.with_state(|state| state.path.ids());

    store.send(on(ids[1], ScreenAction::Start));
    store.send(on(ids[1], ScreenAction::Close));
    store.settled().await;

    assert_eq!(store.with_state(|state| state.path.ids()), vec![ids[0]]);
    assert_eq!(store.in_flight_effects(), 0);
}

#[tokio::test]
async fn action_for_popped_element_never_reaches_a_new_one() {
    let mut store = TestStore::new(Screens::default(), screens());

    store.send(ScreensAction::Open, |state| {
        state.path.push(0);
    });
    let first = store.state().path.ids()[0];
    store.send(
        ScreensAction::Path(StackAction::PopFrom { id: first }),
        |state| {
            state.path.pop_from(first);
        },
    );
    store.send(ScreensAction::Open, |state| {
        state.path.push(0);
    });
    store.send(on(first, ScreenAction::Tick), |_| {});
    store.finish().await;
}

#[tokio::test(start_paused = true)]
async fn replacing_the_stack_cancels_old_elements() {
    let store = Store::new(Screens::default(), screens());
    store.send(ScreensAction::Open);
    let old = store.with_state(|state| state.path.ids()[0]);
    store.send(on(old, ScreenAction::Start));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.state().path.get(old), Some(&1));

    store.send(ScreensAction::Reset);
    store.settled().await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let state = store.state();
    let ids = state.path.ids();
    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], old);
    assert_eq!(state.path.get(ids[0]), Some(&0));
    assert_eq!(store.in_flight_effects(), 0);
}

#[tokio::test]
async fn reset_stack_matches_a_freshly_pushed_expectation() {
    let mut store = TestStore::new(Screens::default(), screens());

    store.send(ScreensAction::Open, |state| {
        state.path.push(0);
    });
    store.send(ScreensAction::Reset, |state| {
        state.path = [0].into_iter().collect();
    });
    store.finish().await;
}
