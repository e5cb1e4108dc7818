//! Executes effect trees on a Tokio runtime.

use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::cancellation::{CancelId, CancelKey, CancellationRegistry, GroupRef};
use super::latch::Latch;
use super::sender::ActionSender;
use super::{BoxFuture, Effect, EffectError, EffectKind, Sink};
use crate::config::UnhandledErrorPolicy;

/// Where a task is being started: the latch it hangs off, the cancellable
/// groups it belongs to and the tasks it must outlive.
#[derive(Clone)]
struct TaskScope {
    cancel: Latch,
    groups: Vec<GroupRef>,
    predecessors: Vec<Latch>,
}

impl TaskScope {
    fn root(cancel: Latch) -> Self {
        Self {
            cancel,
            groups: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    fn enter(&self, group: GroupRef, cancel: Latch, predecessors: Vec<Latch>) -> Self {
        let mut groups = self.groups.clone();
        groups.push(group);
        let mut waits = self.predecessors.clone();
        waits.extend(predecessors);
        Self {
            cancel,
            groups,
            predecessors: waits,
        }
    }
}

/// Effect executor shared by [`crate::Store`] and [`crate::testing::TestStore`].
///
/// Every `run` becomes one Tokio task. Actions the tasks produce go to
/// `sink`, which is how the owning store serializes them.
pub(crate) struct EffectRuntime<A> {
    sink: Sink<A>,
    registry: Arc<Mutex<CancellationRegistry>>,
    handle: Handle,
    root: Latch,
    policy: UnhandledErrorPolicy,
    unhandled: Arc<AtomicUsize>,
}

impl<A> Clone for EffectRuntime<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            registry: Arc::clone(&self.registry),
            handle: self.handle.clone(),
            root: self.root.clone(),
            policy: self.policy,
            unhandled: Arc::clone(&self.unhandled),
        }
    }
}

impl<A> EffectRuntime<A> {
    pub(crate) fn in_flight(&self) -> usize {
        self.registry.lock().in_flight()
    }

    /// Cancel every in-flight and future effect of this runtime.
    pub(crate) fn shutdown(&self) {
        if !self.root.is_triggered() {
            tracing::debug!(
                target: "tca_runtime::effect",
                in_flight = self.in_flight(),
                "Cancelling all effects"
            );
        }
        self.root.trigger();
    }
}

impl<A: Send + 'static> EffectRuntime<A> {
    pub(crate) fn new(
        sink: Sink<A>,
        handle: Handle,
        policy: UnhandledErrorPolicy,
    ) -> Self {
        Self {
            sink,
            registry: Arc::new(Mutex::new(CancellationRegistry::new())),
            handle,
            root: Latch::new(),
            policy,
            unhandled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start `effect`. Synchronous parts (`send`, `cancel`) happen before
    /// this returns; `run` bodies are spawned.
    pub(crate) fn start(&self, effect: Effect<A>) {
        let scope = TaskScope::root(self.root.clone());
        self.start_in(effect, &scope);
    }

    fn start_in(&self, effect: Effect<A>, scope: &TaskScope) -> Vec<Latch> {
        match effect.into_kind() {
            EffectKind::None => Vec::new(),
            EffectKind::Send(action) => {
                if !scope.cancel.is_triggered() {
                    (self.sink)(action, None);
                }
                Vec::new()
            }
            EffectKind::Cancel(key) => {
                self.registry.lock().cancel(&key);
                Vec::new()
            }
            EffectKind::Run(operation) => {
                vec![self.spawn(scope, move |sender, _| operation(sender))]
            }
            EffectKind::Merge(effects) => effects
                .into_iter()
                .flat_map(|effect| self.start_in(effect, scope))
                .collect(),
            EffectKind::Concatenate(effects) => vec![self.spawn_sequence(effects, scope)],
            EffectKind::Cancellable {
                key,
                cancel_in_flight,
                effect,
            } => {
                let (group, cancel, predecessors) =
                    self.registry
                        .lock()
                        .open_group(key, &scope.cancel, cancel_in_flight);
                let inner = scope.enter(group.clone(), cancel, predecessors);
                let finished = self.start_in(*effect, &inner);
                self.registry.lock().seal_group(&group);
                finished
            }
        }
    }

    fn spawn<F>(&self, scope: &TaskScope, body: F) -> Latch
    where
        F: FnOnce(ActionSender<A>, Latch) -> BoxFuture<Result<(), EffectError>> + Send + 'static,
    {
        let cancel = scope.cancel.child();
        let (task_id, finished) = self.registry.lock().register_task(&scope.groups);
        let sender = ActionSender::new(Arc::clone(&self.sink), cancel.clone());
        let predecessors = scope.predecessors.clone();
        let policy = self.policy;
        let unhandled = Arc::clone(&self.unhandled);
        let body_cancel = cancel.clone();

        // Also fires if the runtime drops the task before it is ever polled.
        let completion = scopeguard::guard(Arc::clone(&self.registry), move |registry| {
            registry.lock().complete_task(task_id);
        });

        self.handle.spawn(async move {
            let _completion = completion;
            let work = async move {
                for predecessor in &predecessors {
                    predecessor.wait().await;
                }
                body(sender, body_cancel).await
            };

            tokio::select! {
                biased;
                _ = cancel.wait() => {
                    tracing::trace!(target: "tca_runtime::effect", task_id, "Effect cancelled");
                }
                result = work => {
                    if let Err(error) = result {
                        report_unhandled(policy, &unhandled, error);
                    }
                }
            }
        });

        finished
    }

    fn spawn_sequence(&self, effects: Vec<Effect<A>>, scope: &TaskScope) -> Latch {
        let runtime = self.clone();
        let groups = scope.groups.clone();
        self.spawn(scope, move |_, cancel| {
            Box::pin(async move {
                let steps = TaskScope {
                    cancel,
                    groups,
                    predecessors: Vec::new(),
                };
                for effect in effects {
                    if steps.cancel.is_triggered() {
                        break;
                    }
                    for finished in runtime.start_in(effect, &steps) {
                        finished.wait().await;
                    }
                }
                Ok(())
            })
        })
    }

    /// Whether anything is running under a root-level cancel id.
    pub(crate) fn is_running<I>(&self, id: I) -> bool
    where
        I: Eq + Hash + std::fmt::Debug + Send + Sync + 'static,
    {
        self.registry
            .lock()
            .is_registered(&CancelKey::id(CancelId::new(id)))
    }

    /// Resolves once no effect task is running.
    pub(crate) async fn settled(&self) {
        let mut in_flight = self.registry.lock().subscribe();
        let _ = in_flight.wait_for(|count| *count == 0).await;
    }

    pub(crate) fn unhandled_errors(&self) -> usize {
        self.unhandled.load(Ordering::SeqCst)
    }
}

fn report_unhandled(policy: UnhandledErrorPolicy, counter: &AtomicUsize, error: EffectError) {
    counter.fetch_add(1, Ordering::SeqCst);
    match policy {
        UnhandledErrorPolicy::Log => {
            let error = format!("{error:#}");
            tracing::error!(
                target: "tca_runtime::effect",
                error = %error,
                "Effect failed with an unhandled error"
            );
        }
        UnhandledErrorPolicy::Panic => panic!(
            "effect failed with an unhandled error: {error:#}; \
             convert it into an action with Effect::run_catching"
        ),
    }
}
