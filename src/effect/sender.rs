use std::sync::Arc;

use super::latch::Latch;
use super::Sink;
use crate::diagnostics::runtime_warning;

type Dismiss = Arc<dyn Fn() + Send + Sync>;

/// Handle given to a running effect for feeding actions back into the store.
///
/// Once the effect is cancelled every further `send` is dropped. Sends that
/// were already queued when the cancellation landed are dropped by the store
/// before they reach the reducer.
pub struct ActionSender<A> {
    sink: Sink<A>,
    dismiss: Option<Dismiss>,
    cancelled: Latch,
}

impl<A> Clone for ActionSender<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            dismiss: self.dismiss.clone(),
            cancelled: self.cancelled.clone(),
        }
    }
}

impl<A: Send + 'static> ActionSender<A> {
    pub(crate) fn new(sink: Sink<A>, cancelled: Latch) -> Self {
        Self {
            sink,
            dismiss: None,
            cancelled,
        }
    }

    /// Send an action into the store that started this effect.
    pub fn send(&self, action: A) {
        if self.cancelled.is_triggered() {
            tracing::trace!(
                target: "tca_runtime::effect",
                action = std::any::type_name::<A>(),
                "Dropped action from cancelled effect"
            );
            return;
        }
        (self.sink)(action, Some(self.cancelled.clone()));
    }

    /// Dismiss the presented feature (or stack element) this effect belongs to.
    ///
    /// Equivalent to the parent clearing the presentation slot itself. Calling
    /// it from an effect that is not scoped to a presented feature is a logic
    /// error and only reported.
    pub fn dismiss(&self) {
        if self.cancelled.is_triggered() {
            return;
        }
        match &self.dismiss {
            Some(dismiss) => dismiss(),
            None => runtime_warning(
                "dismiss",
                &format!(
                    "dismiss() was called from an effect of {} that is not part of a presented feature",
                    std::any::type_name::<A>()
                ),
            ),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_triggered()
    }

    /// Resolves once this effect has been cancelled.
    pub async fn cancelled(&self) {
        self.cancelled.wait().await;
    }

    /// Derive a sender for a child action type.
    pub(crate) fn pullback<C, F>(&self, embed: F) -> ActionSender<C>
    where
        C: Send + 'static,
        F: Fn(C) -> A + Send + Sync + 'static,
    {
        let sink = Arc::clone(&self.sink);
        ActionSender {
            sink: Arc::new(move |action: C, cancelled: Option<Latch>| {
                sink(embed(action), cancelled)
            }),
            dismiss: self.dismiss.clone(),
            cancelled: self.cancelled.clone(),
        }
    }

    pub(crate) fn with_dismiss<F>(mut self, dismiss: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.dismiss = Some(Arc::new(dismiss));
        self
    }
}

impl<A> std::fmt::Debug for ActionSender<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSender")
            .field("cancelled", &self.cancelled.is_triggered())
            .field("can_dismiss", &self.dismiss.is_some())
            .finish()
    }
}
