use uuid::Uuid;

use super::lens::{CasePath, Lens};
use super::reduce::Reducer;
use crate::effect::{CancelId, Effect};

/// Runs a child reducer on a field of the parent state.
///
/// Actions the case path does not match are ignored, so a `Scope` is usually
/// combined with the parent's own reducer:
///
/// ```ignore
/// let app = Scope::new(counter_lens, counter_case, CounterReducer::new())
///     .combine(AppReducer);
/// ```
///
/// Cancel ids used by the child are private to each `Scope`: two scopes
/// embedding the same feature never cancel each other's effects.
pub struct Scope<PS, PA, C: Reducer> {
    state: Lens<PS, C::State>,
    action: CasePath<PA, C::Action>,
    child: C,
    namespace: CancelId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScopeNamespace(Uuid);

impl<PS, PA, C: Reducer> Scope<PS, PA, C> {
    pub fn new(state: Lens<PS, C::State>, action: CasePath<PA, C::Action>, child: C) -> Self {
        Self {
            state,
            action,
            child,
            namespace: CancelId::new(ScopeNamespace(Uuid::new_v4())),
        }
    }
}

impl<PS, PA, C> Reducer for Scope<PS, PA, C>
where
    PS: Send + 'static,
    PA: Send + 'static,
    C: Reducer,
{
    type State = PS;
    type Action = PA;

    fn reduce(&self, state: &mut PS, action: PA) -> Effect<PA> {
        let Ok(child_action) = self.action.extract(action) else {
            return Effect::none();
        };
        let child_state = self.state.get_mut(state);
        let embed = self.action.embedder();
        self.child
            .reduce(child_state, child_action)
            .map(embed)
            .namespaced(&self.namespace)
    }
}
