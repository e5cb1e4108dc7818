use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// One-shot signal shared between the runtime and running effect tasks.
///
/// Used both as a cancellation signal and as a "task finished" signal.
/// Latches form a tree: triggering a latch triggers every latch created
/// from it with [`Latch::child`], so cancelling a scope reaches every task
/// started inside it.
#[derive(Clone)]
pub(crate) struct Latch {
    inner: Arc<LatchInner>,
}

struct LatchInner {
    triggered: AtomicBool,
    notify: Notify,
    children: Mutex<Vec<Weak<LatchInner>>>,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(LatchInner {
                triggered: AtomicBool::new(false),
                notify: Notify::new(),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a latch that fires when this one fires.
    ///
    /// A child of an already-triggered latch is born triggered.
    pub(crate) fn child(&self) -> Latch {
        let child = Latch::new();
        let mut children = self.inner.children.lock();
        if self.is_triggered() {
            drop(children);
            child.trigger();
        } else {
            children.retain(|weak| weak.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        child
    }

    pub(crate) fn trigger(&self) {
        if self.inner.triggered.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.notify.notify_waiters();

        let children = std::mem::take(&mut *self.inner.children.lock());
        for child in children.iter().filter_map(Weak::upgrade) {
            Latch { inner: child }.trigger();
        }
    }

    pub(crate) fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait(&self) {
        // Register interest before checking the flag, otherwise a trigger
        // landing between the check and the await is lost.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

/// Whether an action sent under `cancelled` may still be reduced.
///
/// Actions without a latch come from outside any effect and are always live.
pub(crate) fn is_live(cancelled: Option<&Latch>) -> bool {
    cancelled.map_or(true, |latch| !latch.is_triggered())
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}
