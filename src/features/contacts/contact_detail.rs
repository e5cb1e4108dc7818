//! Detail screen pushed onto the contacts navigation stack.

use crate::effect::Effect;
use crate::features::contacts::alert::AlertState;
use crate::features::contacts::contact::Contact;
use crate::presentation::{PresentationAction, PresentationState};
use crate::reducer::{CasePath, EmptyReducer, IfLet, Lens, Reducer, ReducerExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetailState {
    pub alert: PresentationState<AlertState>,
    pub contact: Contact,
}

impl ContactDetailState {
    pub fn new(contact: Contact) -> Self {
        Self {
            alert: PresentationState::none(),
            contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactDetailAction {
    Alert(PresentationAction<DetailAlertAction>),
    Delegate(ContactDetailDelegate),
    DeleteButtonTapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAlertAction {
    ConfirmDeletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactDetailDelegate {
    ConfirmDeletion,
}

struct ContactDetailCore;

impl Reducer for ContactDetailCore {
    type State = ContactDetailState;
    type Action = ContactDetailAction;

    fn reduce(
        &self,
        state: &mut ContactDetailState,
        action: ContactDetailAction,
    ) -> Effect<ContactDetailAction> {
        match action {
            ContactDetailAction::Alert(PresentationAction::Presented(
                DetailAlertAction::ConfirmDeletion,
            )) => {
                state.alert.dismiss();
                Effect::run(|send| async move {
                    send.send(ContactDetailAction::Delegate(
                        ContactDetailDelegate::ConfirmDeletion,
                    ));
                    send.dismiss();
                    Ok(())
                })
            }
            ContactDetailAction::Alert(_) | ContactDetailAction::Delegate(_) => Effect::none(),
            ContactDetailAction::DeleteButtonTapped => {
                state.alert.present(AlertState::confirm_deletion());
                Effect::none()
            }
        }
    }
}

pub struct ContactDetailReducer {
    inner: IfLet<ContactDetailCore, EmptyReducer<AlertState, DetailAlertAction>>,
}

impl ContactDetailReducer {
    pub fn new() -> Self {
        Self {
            inner: ContactDetailCore.if_let(
                Lens::new(
                    |detail: &ContactDetailState| &detail.alert,
                    |detail: &mut ContactDetailState| &mut detail.alert,
                ),
                CasePath::new(
                    |action: ContactDetailAction| match action {
                        ContactDetailAction::Alert(action) => Ok(action),
                        other => Err(other),
                    },
                    ContactDetailAction::Alert,
                ),
                EmptyReducer::new(),
            ),
        }
    }
}

impl Default for ContactDetailReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ContactDetailReducer {
    type State = ContactDetailState;
    type Action = ContactDetailAction;

    fn reduce(
        &self,
        state: &mut ContactDetailState,
        action: ContactDetailAction,
    ) -> Effect<ContactDetailAction> {
        self.inner.reduce(state, action)
    }
}
