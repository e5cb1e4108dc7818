//! Sheet for entering the name of a new contact.

use crate::effect::Effect;
use crate::features::contacts::contact::Contact;
use crate::reducer::Reducer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddContactState {
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddContactAction {
    CancelButtonTapped,
    SaveButtonTapped,
    SetName(String),
    Delegate(AddContactDelegate),
}

/// Actions only the presenting feature interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddContactDelegate {
    SaveContact(Contact),
}

pub struct AddContactReducer;

impl Reducer for AddContactReducer {
    type State = AddContactState;
    type Action = AddContactAction;

    fn reduce(
        &self,
        state: &mut AddContactState,
        action: AddContactAction,
    ) -> Effect<AddContactAction> {
        match action {
            AddContactAction::CancelButtonTapped => Effect::run(|send| async move {
                send.dismiss();
                Ok(())
            }),
            AddContactAction::SaveButtonTapped => {
                let contact = state.contact.clone();
                Effect::run(move |send| async move {
                    send.send(AddContactAction::Delegate(AddContactDelegate::SaveContact(
                        contact,
                    )));
                    send.dismiss();
                    Ok(())
                })
            }
            AddContactAction::SetName(name) => {
                state.contact.name = name;
                Effect::none()
            }
            AddContactAction::Delegate(_) => Effect::none(),
        }
    }
}
