use std::sync::Arc;

use uuid::Uuid;

use super::lens::{CasePath, Lens};
use super::reduce::Reducer;
use crate::diagnostics::runtime_warning;
use crate::effect::{ActionSender, CancelId, Effect};
use crate::stack::{StackAction, StackElementId, StackState};

/// Cancel scope owning every effect of one stack element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StackElementScope {
    stack: Uuid,
    element: StackElementId,
}

/// Integrates a navigation stack of child features into its parent.
///
/// `Element` actions run the child against the addressed element, then the
/// parent. An id that is no longer on the stack is reported and the action
/// dropped. `PopFrom` and `Push` are applied after the parent has seen them.
/// Whenever elements disappear, however that happened, their effects are
/// cancelled topmost first.
pub struct ForEach<P: Reducer, C: Reducer> {
    parent: P,
    state: Lens<P::State, StackState<C::State>>,
    action: CasePath<P::Action, StackAction<C::State, C::Action>>,
    child: C,
    stack: Uuid,
}

impl<P: Reducer, C: Reducer> ForEach<P, C> {
    pub fn new(
        parent: P,
        state: Lens<P::State, StackState<C::State>>,
        action: CasePath<P::Action, StackAction<C::State, C::Action>>,
        child: C,
    ) -> Self {
        Self {
            parent,
            state,
            action,
            child,
            stack: Uuid::new_v4(),
        }
    }

    fn scope(&self, element: StackElementId) -> CancelId {
        CancelId::new(StackElementScope {
            stack: self.stack,
            element,
        })
    }

    fn lift_child(&self, effect: Effect<C::Action>, id: StackElementId) -> Effect<P::Action> {
        let embed = self.action.embedder();
        effect
            .lift(
                Arc::new(move |action: C::Action| embed(StackAction::Element { id, action })),
                Arc::new(move |parent: ActionSender<P::Action>| {
                    let dismisser = parent.clone();
                    parent
                        .with_dismiss(move || dismisser.send(embed(StackAction::PopFrom { id })))
                        .pullback(move |action: C::Action| embed(StackAction::Element { id, action }))
                }),
            )
            .scoped(&self.scope(id))
    }

    fn warn_missing(&self, id: StackElementId, what: &str) {
        runtime_warning(
            "for_each",
            &format!(
                "{what} for element {id} of a {} stack that is no longer present; the action was dropped",
                std::any::type_name::<C::State>(),
            ),
        );
    }
}

impl<P, C> Reducer for ForEach<P, C>
where
    P: Reducer,
    C: Reducer,
    C::State: Clone,
    C::Action: Clone,
{
    type State = P::State;
    type Action = P::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        let before = self.state.get(state).ids();

        let (child_effect, parent_effect) = match self.action.extract(action) {
            Ok(StackAction::Element { id, action }) => {
                let Some(element) = self.state.get_mut(state).get_mut(id) else {
                    self.warn_missing(id, "An action was sent");
                    return Effect::none();
                };
                let child_effect = self.child.reduce(element, action.clone());
                let child_effect = self.lift_child(child_effect, id);
                let parent_action = self.action.embed(StackAction::Element { id, action });
                (child_effect, self.parent.reduce(state, parent_action))
            }
            Ok(StackAction::PopFrom { id }) => {
                if !self.state.get(state).contains(id) {
                    self.warn_missing(id, "A pop was requested");
                    return Effect::none();
                }
                let parent_effect = self
                    .parent
                    .reduce(state, self.action.embed(StackAction::PopFrom { id }));
                self.state.get_mut(state).pop_from(id);
                (Effect::none(), parent_effect)
            }
            Ok(StackAction::Push { id, state: element }) => {
                let parent_action = self.action.embed(StackAction::Push {
                    id,
                    state: element.clone(),
                });
                let parent_effect = self.parent.reduce(state, parent_action);
                if !self.state.get_mut(state).push_with_id(id, element) {
                    runtime_warning(
                        "for_each",
                        &format!("A push reused element id {id}, which is already on the stack; the push was ignored"),
                    );
                }
                (Effect::none(), parent_effect)
            }
            Err(action) => (Effect::none(), self.parent.reduce(state, action)),
        };

        let stack = self.state.get(state);
        let cancels: Vec<_> = before
            .into_iter()
            .rev()
            .filter(|id| !stack.contains(*id))
            .map(|id| {
                tracing::debug!(
                    target: "tca_runtime::runtime",
                    element = %id,
                    "Stack element removed, cancelling its effects"
                );
                Effect::cancel_scope(&self.scope(id))
            })
            .collect();

        Effect::merge([child_effect, parent_effect, Effect::merge(cancels)])
    }
}
