//! The runtime that owns a feature's state and serializes its actions.

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::RuntimeSection;
use crate::effect::{is_live, Effect, EffectRuntime, Latch};
use crate::reducer::{Reducer, ReducerExt};

/// Owns one feature's state and runs its reducer.
///
/// `send` may be called from any thread and from inside effects. Actions are
/// buffered FIFO and reduced one at a time: a reducer never runs concurrently
/// with itself, and an action sent while another is being reduced is picked
/// up right after it.
///
/// Cloning a `Store` yields another handle to the same state. Dropping the
/// last handle cancels every in-flight effect.
pub struct Store<S, A> {
    inner: Arc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<S, A> {
    reducer: Box<dyn Reducer<State = S, Action = A>>,
    state: Mutex<S>,
    /// Pending actions, each with the cancellation latch of the effect that
    /// sent it.
    queue: Mutex<VecDeque<(A, Option<Latch>)>>,
    /// Set while some `send` on this thread is draining the queue.
    draining: ReentrantMutex<Cell<bool>>,
    runtime: EffectRuntime<A>,
    version: watch::Sender<u64>,
}

impl<S, A> Store<S, A>
where
    S: Send + 'static,
    A: Send + 'static,
{
    /// Create a store with the default runtime settings.
    ///
    /// Effects are spawned on the current Tokio runtime, so this must be
    /// called from within one.
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Reducer<State = S, Action = A>,
    {
        Self::build(initial, reducer.boxed(), RuntimeSection::default())
    }

    /// Create a store honoring the `[runtime]` config section.
    pub fn with_config<R>(initial: S, reducer: R, config: &RuntimeSection) -> Self
    where
        R: Reducer<State = S, Action = A>,
        S: fmt::Debug,
        A: fmt::Debug,
    {
        let reducer = if config.print_changes {
            reducer.print_changes().boxed()
        } else {
            reducer.boxed()
        };
        Self::build(initial, reducer, config.clone())
    }

    fn build(
        initial: S,
        reducer: Box<dyn Reducer<State = S, Action = A>>,
        config: RuntimeSection,
    ) -> Self {
        let (version, _) = watch::channel(0);
        let inner = Arc::new_cyclic(|weak: &Weak<StoreInner<S, A>>| {
            let weak = weak.clone();
            let sink = Arc::new(move |action: A, cancelled: Option<Latch>| {
                if let Some(inner) = weak.upgrade() {
                    inner.enqueue(action, cancelled);
                }
            });
            StoreInner {
                reducer,
                state: Mutex::new(initial),
                queue: Mutex::new(VecDeque::new()),
                draining: ReentrantMutex::new(Cell::new(false)),
                runtime: EffectRuntime::new(sink, Handle::current(), config.unhandled_errors),
                version,
            }
        });
        Self { inner }
    }

    /// Reduce `action` and start the effect it returns.
    ///
    /// Returns once the action (and anything it synchronously feeds back
    /// with [`Effect::send`]) has been reduced; effects keep running.
    pub fn send(&self, action: A) {
        self.inner.enqueue(action, None);
    }

    /// Borrow the current state.
    ///
    /// Must not call back into [`Store::send`].
    pub fn with_state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&*self.inner.state.lock())
    }

    /// Receiver bumped after every reduced action.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    /// Whether an effect registered under root-level cancel id `id` is running.
    pub fn has_effect<I>(&self, id: I) -> bool
    where
        I: Eq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.runtime.is_running(id)
    }

    pub fn in_flight_effects(&self) -> usize {
        self.inner.runtime.in_flight()
    }

    /// Resolves once no effect is running.
    pub async fn settled(&self) {
        self.inner.runtime.settled().await;
    }

    /// Effect failures handled by [`crate::UnhandledErrorPolicy::Log`].
    pub fn unhandled_errors(&self) -> usize {
        self.inner.runtime.unhandled_errors()
    }

    /// Cancel every in-flight effect. Later effects are cancelled on start.
    pub fn shutdown(&self) {
        self.inner.runtime.shutdown();
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + 'static,
    A: Send + 'static,
{
    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.inner.state.lock().clone()
    }
}

impl<S, A> StoreInner<S, A>
where
    S: Send + 'static,
    A: Send + 'static,
{
    fn enqueue(&self, action: A, cancelled: Option<Latch>) {
        self.queue.lock().push_back((action, cancelled));

        let draining = self.draining.lock();
        if draining.get() {
            // Reentrant send from a reducer's synchronous effect; the outer
            // loop picks it up.
            return;
        }
        draining.set(true);
        let _reset = scopeguard::guard(&*draining, |flag| flag.set(false));

        loop {
            let Some((action, cancelled)) = self.queue.lock().pop_front() else {
                break;
            };
            if !is_live(cancelled.as_ref()) {
                tracing::trace!(
                    target: "tca_runtime::effect",
                    action = std::any::type_name::<A>(),
                    "Dropped queued action from cancelled effect"
                );
                continue;
            }
            let effect: Effect<A> = {
                let mut state = self.state.lock();
                self.reducer.reduce(&mut state, action)
            };
            self.version.send_modify(|version| *version += 1);
            self.runtime.start(effect);
        }
    }
}

impl<S, A> Drop for StoreInner<S, A> {
    fn drop(&mut self) {
        self.runtime.shutdown();
    }
}
