use std::sync::Arc;

use super::lens::{CasePath, Lens};
use super::reduce::Reducer;
use crate::diagnostics::runtime_warning;
use crate::effect::{ActionSender, CancelId, Effect};
use crate::presentation::{PresentationAction, PresentationId, PresentationState};

/// Cancel scope owning every effect of one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PresentationScope(PresentationId);

/// Integrates a presented child feature into its parent.
///
/// For every action:
///
/// 1. `Presented(child_action)` runs the child first, if it is presented.
///    An action for an absent child is a logic error: it is reported and
///    dropped, and the parent does not see it either.
/// 2. The parent runs with the action.
/// 3. `Dismiss` clears the slot after the parent has seen it.
/// 4. If the presentation that existed before the action is gone (dismissed
///    or replaced), all of its effects are cancelled.
///
/// Child effects get an [`ActionSender`] whose `dismiss()` sends
/// `PresentationAction::Dismiss` back through the parent.
pub struct IfLet<P: Reducer, C: Reducer> {
    parent: P,
    state: Lens<P::State, PresentationState<C::State>>,
    action: CasePath<P::Action, PresentationAction<C::Action>>,
    child: C,
}

impl<P: Reducer, C: Reducer> IfLet<P, C> {
    pub fn new(
        parent: P,
        state: Lens<P::State, PresentationState<C::State>>,
        action: CasePath<P::Action, PresentationAction<C::Action>>,
        child: C,
    ) -> Self {
        Self {
            parent,
            state,
            action,
            child,
        }
    }

    fn lift_child(&self, effect: Effect<C::Action>, id: PresentationId) -> Effect<P::Action> {
        let embed = self.action.embedder();
        effect
            .lift(
                Arc::new(move |action: C::Action| {
                    embed(PresentationAction::Presented(action))
                }),
                Arc::new(move |parent: ActionSender<P::Action>| {
                    let dismisser = parent.clone();
                    parent
                        .with_dismiss(move || dismisser.send(embed(PresentationAction::Dismiss)))
                        .pullback(move |action: C::Action| {
                            embed(PresentationAction::Presented(action))
                        })
                }),
            )
            .scoped(&CancelId::new(PresentationScope(id)))
    }
}

impl<P, C> Reducer for IfLet<P, C>
where
    P: Reducer,
    C: Reducer,
    C::Action: Clone,
{
    type State = P::State;
    type Action = P::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        let before = self.state.get(state).id();

        let (child_effect, parent_effect) = match self.action.extract(action) {
            Ok(PresentationAction::Presented(child_action)) => {
                let (Some(id), Some(child_state)) = (before, self.state.get_mut(state).get_mut())
                else {
                    runtime_warning(
                        "if_let",
                        &format!(
                            "{} received an action while its {} is absent; the action was dropped",
                            std::any::type_name::<P::State>(),
                            std::any::type_name::<C::State>(),
                        ),
                    );
                    return Effect::none();
                };
                let child_effect = self.child.reduce(child_state, child_action.clone());
                let child_effect = self.lift_child(child_effect, id);
                let parent_action = self
                    .action
                    .embed(PresentationAction::Presented(child_action));
                (child_effect, self.parent.reduce(state, parent_action))
            }
            Ok(PresentationAction::Dismiss) => {
                let parent_effect = self
                    .parent
                    .reduce(state, self.action.embed(PresentationAction::Dismiss));
                self.state.get_mut(state).dismiss();
                (Effect::none(), parent_effect)
            }
            Err(action) => (Effect::none(), self.parent.reduce(state, action)),
        };

        let after = self.state.get(state).id();
        let cancel = match before {
            Some(id) if after != Some(id) => {
                tracing::debug!(
                    target: "tca_runtime::runtime",
                    presentation = %id,
                    "Presentation ended, cancelling its effects"
                );
                Effect::cancel_scope(&CancelId::new(PresentationScope(id)))
            }
            _ => Effect::none(),
        };

        Effect::merge([child_effect, parent_effect, cancel])
    }
}
