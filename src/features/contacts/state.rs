use crate::features::contacts::contact::Contact;
use crate::features::contacts::contact_detail::ContactDetailState;
use crate::features::contacts::destination::DestinationState;
use crate::presentation::PresentationState;
use crate::reducer::Lens;
use crate::stack::StackState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactsState {
    pub contacts: Vec<Contact>,
    pub destination: PresentationState<DestinationState>,
    pub path: StackState<ContactDetailState>,
}

impl ContactsState {
    pub fn destination_lens() -> Lens<ContactsState, PresentationState<DestinationState>> {
        Lens::new(|state| &state.destination, |state| &mut state.destination)
    }

    pub fn path_lens() -> Lens<ContactsState, StackState<ContactDetailState>> {
        Lens::new(|state| &state.path, |state| &mut state.path)
    }
}
