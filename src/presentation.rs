//! Optional child state for presented features (sheets, alerts, popovers).

use std::fmt;

use uuid::Uuid;

/// Identity of one presentation.
///
/// Every call to [`PresentationState::present`] mints a new id, so replacing
/// a presented child with another one is observable even when the two states
/// compare equal. Effects of the child are scoped to this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresentationId(Uuid);

impl PresentationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A child feature that is either absent or presented.
///
/// Becoming absent is the single authoritative "dismissed" signal: the
/// [`crate::IfLet`] operator cancels all of the child's effects when it
/// observes this transition.
#[derive(Clone)]
pub struct PresentationState<S> {
    slot: Option<(PresentationId, S)>,
}

impl<S> PresentationState<S> {
    pub fn none() -> Self {
        Self { slot: None }
    }

    pub fn presented(state: S) -> Self {
        Self {
            slot: Some((PresentationId::new(), state)),
        }
    }

    /// Present `state`, replacing whatever was presented before.
    pub fn present(&mut self, state: S) {
        self.slot = Some((PresentationId::new(), state));
    }

    /// Return to absent, handing back the child state if there was one.
    pub fn dismiss(&mut self) -> Option<S> {
        self.slot.take().map(|(_, state)| state)
    }

    pub fn is_presented(&self) -> bool {
        self.slot.is_some()
    }

    pub fn get(&self) -> Option<&S> {
        self.slot.as_ref().map(|(_, state)| state)
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.slot.as_mut().map(|(_, state)| state)
    }

    pub fn id(&self) -> Option<PresentationId> {
        self.slot.as_ref().map(|(id, _)| *id)
    }
}

impl<S> Default for PresentationState<S> {
    fn default() -> Self {
        Self::none()
    }
}

impl<S> From<Option<S>> for PresentationState<S> {
    fn from(state: Option<S>) -> Self {
        match state {
            Some(state) => Self::presented(state),
            None => Self::none(),
        }
    }
}

/// Presentation ids are not part of equality; two presented states compare
/// equal when their child states do.
impl<S: PartialEq> PartialEq for PresentationState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<S: Eq> Eq for PresentationState<S> {}

impl<S: fmt::Debug> fmt::Debug for PresentationState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(state) => f.debug_tuple("Presented").field(state).finish(),
            None => f.write_str("Absent"),
        }
    }
}

/// Actions a parent routes to a presented child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationAction<A> {
    /// An action for the presented child.
    Presented(A),
    /// Return the slot to absent. Sent by [`crate::ActionSender::dismiss`]
    /// or by the parent itself.
    Dismiss,
}
