use crate::features::contacts::contact::ContactId;
use crate::features::contacts::contact_detail::{ContactDetailAction, ContactDetailState};
use crate::features::contacts::destination::DestinationAction;
use crate::presentation::PresentationAction;
use crate::reducer::CasePath;
use crate::stack::StackAction;

#[derive(Debug, Clone, PartialEq)]
pub enum ContactsAction {
    AddButtonTapped,
    /// Push the detail screen of a listed contact.
    ContactTapped(ContactId),
    DeleteButtonTapped(ContactId),
    Destination(PresentationAction<DestinationAction>),
    Path(StackAction<ContactDetailState, ContactDetailAction>),
}

impl ContactsAction {
    pub fn destination_case() -> CasePath<ContactsAction, PresentationAction<DestinationAction>> {
        CasePath::new(
            |action| match action {
                ContactsAction::Destination(action) => Ok(action),
                other => Err(other),
            },
            ContactsAction::Destination,
        )
    }

    pub fn path_case(
    ) -> CasePath<ContactsAction, StackAction<ContactDetailState, ContactDetailAction>> {
        CasePath::new(
            |action| match action {
                ContactsAction::Path(action) => Ok(action),
                other => Err(other),
            },
            ContactsAction::Path,
        )
    }
}
