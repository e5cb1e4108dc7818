mod action;
mod add_contact;
mod alert;
mod contact;
mod contact_detail;
mod destination;
mod reducer;
mod state;

pub use action::ContactsAction;
pub use add_contact::{AddContactAction, AddContactDelegate, AddContactReducer, AddContactState};
pub use alert::AlertState;
pub use contact::{Contact, ContactId, ContactIdGenerator};
pub use contact_detail::{
    ContactDetailAction, ContactDetailDelegate, ContactDetailReducer, ContactDetailState,
    DetailAlertAction,
};
pub use destination::{ContactsAlertAction, DestinationAction, DestinationReducer, DestinationState};
pub use reducer::ContactsReducer;
pub use state::ContactsState;
