//! Effects: descriptions of asynchronous work that feed actions back into a store.
//!
//! A reducer never performs side effects itself. It returns an [`Effect`]
//! and the runtime executes it:
//!
//! ```text
//! send(action) ──→ Reducer ──→ Effect ──→ runtime ──→ send(action) ...
//! ```
//!
//! Effects are plain values. Nothing runs until a store (or test store)
//! starts them, so reducers stay synchronous and deterministic.

mod cancellation;
mod latch;
mod runtime;
mod sender;

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;

pub use cancellation::CancelId;
pub use sender::ActionSender;

pub(crate) use cancellation::CancelKey;
pub(crate) use latch::{is_live, Latch};
pub(crate) use runtime::EffectRuntime;

/// Error surfaced by an effect body.
pub type EffectError = anyhow::Error;

/// Boxed future returned by effect bodies.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Where effects deliver actions. The latch is the cancellation signal of
/// the sending task, checked again when the action is dequeued.
pub(crate) type Sink<A> = Arc<dyn Fn(A, Option<Latch>) + Send + Sync>;

type Operation<A> = Box<dyn FnOnce(ActionSender<A>) -> BoxFuture<Result<(), EffectError>> + Send>;

/// Description of zero or more asynchronous tasks producing actions of type `A`.
#[must_use = "effects do nothing unless returned to the store"]
pub struct Effect<A> {
    kind: EffectKind<A>,
}

pub(crate) enum EffectKind<A> {
    None,
    /// Feed an action back synchronously, right after the current one.
    Send(A),
    Run(Operation<A>),
    Cancel(CancelKey),
    Merge(Vec<Effect<A>>),
    Concatenate(Vec<Effect<A>>),
    Cancellable {
        key: CancelKey,
        cancel_in_flight: bool,
        effect: Box<Effect<A>>,
    },
}

impl<A: Send + 'static> Effect<A> {
    /// No work.
    pub fn none() -> Self {
        Self {
            kind: EffectKind::None,
        }
    }

    /// Feed `action` back into the store immediately after the current action.
    pub fn send(action: A) -> Self {
        Self {
            kind: EffectKind::Send(action),
        }
    }

    /// Asynchronous unit of work.
    ///
    /// The body receives an [`ActionSender`] and may send any number of
    /// actions before finishing. An `Err` returned from the body is an
    /// unhandled failure; use [`Effect::run_catching`] to turn failures into
    /// actions instead.
    pub fn run<F, Fut>(body: F) -> Self
    where
        F: FnOnce(ActionSender<A>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        Self {
            kind: EffectKind::Run(Box::new(
                move |sender: ActionSender<A>| -> BoxFuture<Result<(), EffectError>> {
                    Box::pin(body(sender))
                },
            )),
        }
    }

    /// Like [`Effect::run`], converting a failure into an action with `handler`.
    pub fn run_catching<F, Fut, H>(body: F, handler: H) -> Self
    where
        F: FnOnce(ActionSender<A>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
        H: FnOnce(EffectError) -> A + Send + 'static,
    {
        Self::run(move |sender| async move {
            if let Err(error) = body(sender.clone()).await {
                sender.send(handler(error));
            }
            Ok(())
        })
    }

    /// Cancel every in-flight effect started under `id`.
    ///
    /// Idempotent: cancelling an id with nothing running is a no-op.
    pub fn cancel<I>(id: I) -> Self
    where
        I: Eq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            kind: EffectKind::Cancel(CancelKey::id(CancelId::new(id))),
        }
    }

    /// Run effects concurrently.
    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let mut effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Self::none(),
            1 => effects.remove(0),
            _ => Self {
                kind: EffectKind::Merge(effects),
            },
        }
    }

    /// Run effects one after another; each starts once the previous finished.
    pub fn concatenate(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let mut effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Self::none(),
            1 => effects.remove(0),
            _ => Self {
                kind: EffectKind::Concatenate(effects),
            },
        }
    }

    pub fn merge_with(self, other: Effect<A>) -> Self {
        Self::merge([self, other])
    }

    pub fn concatenate_with(self, other: Effect<A>) -> Self {
        Self::concatenate([self, other])
    }

    /// Register this effect under `id`.
    ///
    /// Anything still running under the same id is cancelled, and its
    /// termination awaited, before this effect's tasks start.
    pub fn cancellable<I>(self, id: I) -> Self
    where
        I: Eq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        if self.is_none() {
            return self;
        }
        Self {
            kind: EffectKind::Cancellable {
                key: CancelKey::id(CancelId::new(id)),
                cancel_in_flight: true,
                effect: Box::new(self),
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, EffectKind::None)
    }

    /// Transform every action this effect produces.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let embed = Arc::clone(&f);
        self.lift(
            f,
            Arc::new(move |sender: ActionSender<B>| {
                let embed = Arc::clone(&embed);
                sender.pullback(move |action| embed(action))
            }),
        )
    }

    /// Re-type this effect for a parent domain.
    ///
    /// `action` re-embeds synchronously sent actions, `sender` derives the
    /// child sender handed to running tasks.
    pub(crate) fn lift<B>(
        self,
        action: Arc<dyn Fn(A) -> B + Send + Sync>,
        sender: Arc<dyn Fn(ActionSender<B>) -> ActionSender<A> + Send + Sync>,
    ) -> Effect<B>
    where
        B: Send + 'static,
    {
        let kind = match self.kind {
            EffectKind::None => EffectKind::None,
            EffectKind::Send(value) => EffectKind::Send(action(value)),
            EffectKind::Cancel(key) => EffectKind::Cancel(key),
            EffectKind::Run(operation) => {
                EffectKind::Run(Box::new(move |parent: ActionSender<B>| operation(sender(parent))))
            }
            EffectKind::Merge(effects) => EffectKind::Merge(
                effects
                    .into_iter()
                    .map(|effect| effect.lift(Arc::clone(&action), Arc::clone(&sender)))
                    .collect(),
            ),
            EffectKind::Concatenate(effects) => EffectKind::Concatenate(
                effects
                    .into_iter()
                    .map(|effect| effect.lift(Arc::clone(&action), Arc::clone(&sender)))
                    .collect(),
            ),
            EffectKind::Cancellable {
                key,
                cancel_in_flight,
                effect,
            } => EffectKind::Cancellable {
                key,
                cancel_in_flight,
                effect: Box::new(effect.lift(action, sender)),
            },
        };
        Effect { kind }
    }

    /// Confine this effect to a presentation or stack-element scope.
    ///
    /// Cancel ids used inside are namespaced by `scope`, and everything is
    /// registered under the scope itself so the whole subtree can be
    /// cancelled when the scope goes away.
    pub(crate) fn scoped(self, scope: &CancelId) -> Self {
        if self.is_none() {
            return self;
        }
        Self {
            kind: EffectKind::Cancellable {
                key: CancelKey::scope(scope.clone()),
                cancel_in_flight: false,
                effect: Box::new(self.namespaced(scope)),
            },
        }
    }

    /// Cancel everything registered under a scope opened by [`Effect::scoped`].
    pub(crate) fn cancel_scope(scope: &CancelId) -> Self {
        Self {
            kind: EffectKind::Cancel(CancelKey::scope(scope.clone())),
        }
    }

    /// Nest every cancel id used inside this effect under `scope`.
    pub(crate) fn namespaced(self, scope: &CancelId) -> Self {
        let kind = match self.kind {
            EffectKind::Cancel(key) => EffectKind::Cancel(key.nested_in(scope)),
            EffectKind::Merge(effects) => {
                EffectKind::Merge(effects.into_iter().map(|e| e.namespaced(scope)).collect())
            }
            EffectKind::Concatenate(effects) => EffectKind::Concatenate(
                effects.into_iter().map(|e| e.namespaced(scope)).collect(),
            ),
            EffectKind::Cancellable {
                key,
                cancel_in_flight,
                effect,
            } => EffectKind::Cancellable {
                key: key.nested_in(scope),
                cancel_in_flight,
                effect: Box::new(effect.namespaced(scope)),
            },
            other => other,
        };
        Effect { kind }
    }

    pub(crate) fn into_kind(self) -> EffectKind<A> {
        self.kind
    }
}

impl<A: Send + 'static> Default for Effect<A> {
    fn default() -> Self {
        Self::none()
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EffectKind::None => f.write_str("Effect::none"),
            EffectKind::Send(action) => f.debug_tuple("Effect::send").field(action).finish(),
            EffectKind::Run(_) => f.write_str("Effect::run(..)"),
            EffectKind::Cancel(key) => write!(f, "Effect::cancel({key})"),
            EffectKind::Merge(effects) => f.debug_tuple("Effect::merge").field(effects).finish(),
            EffectKind::Concatenate(effects) => {
                f.debug_tuple("Effect::concatenate").field(effects).finish()
            }
            EffectKind::Cancellable { key, effect, .. } => f
                .debug_struct("Effect::cancellable")
                .field("id", &format_args!("{key}"))
                .field("effect", effect)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Timer,
    }

    #[test]
    fn merge_flattens_none() {
        let effect: Effect<u8> = Effect::merge([Effect::none(), Effect::none()]);
        assert!(effect.is_none());

        let single = Effect::merge([Effect::none(), Effect::send(1u8)]);
        assert!(matches!(single.into_kind(), EffectKind::Send(1)));
    }

    #[test]
    fn cancellable_none_stays_none() {
        let effect: Effect<u8> = Effect::none().cancellable(Kind::Timer);
        assert!(effect.is_none());
    }

    #[test]
    fn map_rewrites_sent_actions() {
        let effect = Effect::send(2u8).map(|value| u32::from(value) + 1);
        assert!(matches!(effect.into_kind(), EffectKind::Send(3)));
    }

    #[test]
    fn scoped_namespaces_inner_cancel_ids() {
        let scope = CancelId::new("sheet");
        let effect: Effect<u8> = Effect::cancel(Kind::Timer).scoped(&scope);
        let EffectKind::Cancellable { key, effect, .. } = effect.into_kind() else {
            panic!("expected scope group");
        };
        assert_eq!(key, CancelKey::scope(scope.clone()));
        let EffectKind::Cancel(inner) = effect.into_kind() else {
            panic!("expected cancel");
        };
        assert_eq!(inner, CancelKey::id(CancelId::new(Kind::Timer)).nested_in(&scope));
    }

    #[test]
    fn debug_describes_shape() {
        let effect = Effect::merge([Effect::send(1u8), Effect::cancel(Kind::Timer)]);
        assert_eq!(
            format!("{effect:?}"),
            "Effect::merge([Effect::send(1), Effect::cancel(Timer)])"
        );
    }
}
