use crate::effect::Effect;
use crate::features::contacts::action::ContactsAction;
use crate::features::contacts::add_contact::{AddContactAction, AddContactDelegate, AddContactState};
use crate::features::contacts::alert::AlertState;
use crate::features::contacts::contact::{Contact, ContactIdGenerator};
use crate::features::contacts::contact_detail::{
    ContactDetailAction, ContactDetailDelegate, ContactDetailReducer, ContactDetailState,
};
use crate::features::contacts::destination::{
    ContactsAlertAction, DestinationAction, DestinationReducer, DestinationState,
};
use crate::features::contacts::state::ContactsState;
use crate::presentation::PresentationAction;
use crate::reducer::{ForEach, IfLet, Reducer, ReducerExt};
use crate::stack::StackAction;

/// The list's own logic; children are integrated by [`ContactsReducer`].
struct ContactsCore {
    ids: ContactIdGenerator,
}

impl Reducer for ContactsCore {
    type State = ContactsState;
    type Action = ContactsAction;

    fn reduce(&self, state: &mut ContactsState, action: ContactsAction) -> Effect<ContactsAction> {
        match action {
            ContactsAction::AddButtonTapped => {
                let contact = Contact::new(self.ids.next_id(), "");
                state
                    .destination
                    .present(DestinationState::AddContact(AddContactState { contact }));
                Effect::none()
            }
            ContactsAction::ContactTapped(id) => {
                if let Some(contact) = state.contacts.iter().find(|c| c.id == id) {
                    state.path.push(ContactDetailState::new(contact.clone()));
                }
                Effect::none()
            }
            ContactsAction::DeleteButtonTapped(id) => {
                state.destination.present(DestinationState::Alert {
                    id,
                    alert: AlertState::confirm_deletion(),
                });
                Effect::none()
            }
            ContactsAction::Destination(PresentationAction::Presented(
                DestinationAction::AddContact(AddContactAction::Delegate(
                    AddContactDelegate::SaveContact(contact),
                )),
            )) => {
                state.contacts.push(contact);
                Effect::none()
            }
            ContactsAction::Destination(PresentationAction::Presented(
                DestinationAction::Alert(ContactsAlertAction::ConfirmDeletion { id }),
            )) => {
                state.contacts.retain(|contact| contact.id != id);
                state.destination.dismiss();
                Effect::none()
            }
            ContactsAction::Destination(_) => Effect::none(),
            ContactsAction::Path(StackAction::Element {
                id,
                action: ContactDetailAction::Delegate(ContactDetailDelegate::ConfirmDeletion),
            }) => {
                if let Some(detail) = state.path.get(id) {
                    let contact = detail.contact.id;
                    state.contacts.retain(|c| c.id != contact);
                }
                Effect::none()
            }
            ContactsAction::Path(_) => Effect::none(),
        }
    }
}

/// Contacts list with its add-contact sheet, delete alert and detail stack.
pub struct ContactsReducer {
    inner: ForEach<IfLet<ContactsCore, DestinationReducer>, ContactDetailReducer>,
}

impl ContactsReducer {
    pub fn new(ids: ContactIdGenerator) -> Self {
        let inner = ContactsCore { ids }
            .if_let(
                ContactsState::destination_lens(),
                ContactsAction::destination_case(),
                DestinationReducer,
            )
            .for_each(
                ContactsState::path_lens(),
                ContactsAction::path_case(),
                ContactDetailReducer::new(),
            );
        Self { inner }
    }
}

impl Default for ContactsReducer {
    fn default() -> Self {
        Self::new(ContactIdGenerator::incrementing())
    }
}

impl Reducer for ContactsReducer {
    type State = ContactsState;
    type Action = ContactsAction;

    fn reduce(&self, state: &mut ContactsState, action: ContactsAction) -> Effect<ContactsAction> {
        self.inner.reduce(state, action)
    }
}
