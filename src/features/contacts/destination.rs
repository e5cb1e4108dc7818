//! Everything the contacts list can present. One enum makes "two things
//! presented at once" unrepresentable.

use crate::diagnostics::runtime_warning;
use crate::effect::Effect;
use crate::features::contacts::add_contact::{AddContactAction, AddContactReducer, AddContactState};
use crate::features::contacts::alert::AlertState;
use crate::features::contacts::contact::ContactId;
use crate::reducer::Reducer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationState {
    AddContact(AddContactState),
    /// Confirmation before deleting the contact `id`.
    Alert { id: ContactId, alert: AlertState },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    AddContact(AddContactAction),
    Alert(ContactsAlertAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactsAlertAction {
    ConfirmDeletion { id: ContactId },
}

pub struct DestinationReducer;

impl Reducer for DestinationReducer {
    type State = DestinationState;
    type Action = DestinationAction;

    fn reduce(
        &self,
        state: &mut DestinationState,
        action: DestinationAction,
    ) -> Effect<DestinationAction> {
        match (state, action) {
            (DestinationState::AddContact(add), DestinationAction::AddContact(action)) => {
                AddContactReducer
                    .reduce(add, action)
                    .map(DestinationAction::AddContact)
            }
            (DestinationState::Alert { .. }, DestinationAction::Alert(_)) => Effect::none(),
            (state, action) => {
                runtime_warning(
                    "destination",
                    &format!("{action:?} was sent while {state:?} is presented; the action was dropped"),
                );
                Effect::none()
            }
        }
    }
}
