//! Cancellation identities and the registry of in-flight effect tasks.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::watch;

use super::latch::Latch;

/// Token identifying a class of in-flight effects.
///
/// Any hashable value can serve as an id; feature authors usually declare a
/// small enum:
///
/// ```
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum CancelKind {
///     Timer,
/// }
///
/// let id = tca_runtime::CancelId::new(CancelKind::Timer);
/// assert_eq!(id, tca_runtime::CancelId::new(CancelKind::Timer));
/// ```
///
/// Ids of different types never compare equal, even when their values
/// hash the same.
#[derive(Clone)]
pub struct CancelId(Arc<dyn DynCancelId>);

trait DynCancelId: Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynCancelId) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> DynCancelId for T
where
    T: Any + Eq + Hash + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynCancelId) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

impl CancelId {
    pub fn new<T>(id: T) -> Self
    where
        T: Any + Eq + Hash + fmt::Debug + Send + Sync,
    {
        if let Some(existing) = (&id as &dyn Any).downcast_ref::<CancelId>() {
            return existing.clone();
        }
        Self(Arc::new(id))
    }
}

impl PartialEq for CancelId {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for CancelId {}

impl Hash for CancelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for CancelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for CancelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Registry key: a cancel id namespaced by the presentation / stack scopes
/// the effect was started in.
///
/// `id == None` addresses a whole scope.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct CancelKey {
    scope: Vec<CancelId>,
    id: Option<CancelId>,
}

impl CancelKey {
    pub(crate) fn id(id: CancelId) -> Self {
        Self {
            scope: Vec::new(),
            id: Some(id),
        }
    }

    pub(crate) fn scope(scope: CancelId) -> Self {
        Self {
            scope: vec![scope],
            id: None,
        }
    }

    pub(crate) fn nested_in(mut self, scope: &CancelId) -> Self {
        self.scope.insert(0, scope.clone());
        self
    }
}

impl fmt::Debug for CancelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scope in &self.scope {
            write!(f, "{scope}/")?;
        }
        match &self.id {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "*"),
        }
    }
}

impl fmt::Display for CancelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub(crate) type TaskId = u64;
type GroupId = u64;

/// Handle to a cancellable group opened by [`CancellationRegistry::open_group`].
#[derive(Clone, Debug)]
pub(crate) struct GroupRef {
    key: CancelKey,
    id: GroupId,
}

struct Group {
    id: GroupId,
    cancel: Latch,
    members: HashSet<TaskId>,
    sealed: bool,
}

struct TaskRecord {
    groups: Vec<GroupRef>,
    finished: Latch,
}

/// Mapping from cancel keys to the groups of tasks started under them.
///
/// A group is everything one `cancellable` effect started. It stays
/// registered until it is sealed (its effect tree finished starting) and
/// its last task completed, or until it is cancelled.
pub(crate) struct CancellationRegistry {
    next_id: u64,
    groups: HashMap<CancelKey, Vec<Group>>,
    tasks: HashMap<TaskId, TaskRecord>,
    in_flight: watch::Sender<usize>,
}

impl CancellationRegistry {
    pub(crate) fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            next_id: 0,
            groups: HashMap::new(),
            tasks: HashMap::new(),
            in_flight,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Open a group under `key` whose cancellation latch hangs off `parent`.
    ///
    /// With `cancel_in_flight`, groups already registered under `key` are
    /// cancelled first and the finish latches of their tasks are returned
    /// so the new group's tasks can wait for them.
    pub(crate) fn open_group(
        &mut self,
        key: CancelKey,
        parent: &Latch,
        cancel_in_flight: bool,
    ) -> (GroupRef, Latch, Vec<Latch>) {
        let predecessors = if cancel_in_flight {
            self.cancel(&key)
        } else {
            Vec::new()
        };

        let id = self.next_id();
        let cancel = parent.child();
        self.groups.entry(key.clone()).or_default().push(Group {
            id,
            cancel: cancel.clone(),
            members: HashSet::new(),
            sealed: false,
        });

        (GroupRef { key, id }, cancel, predecessors)
    }

    /// Mark a group as fully started; an empty sealed group is dropped.
    pub(crate) fn seal_group(&mut self, group: &GroupRef) {
        if let Some(entry) = self.group_mut(group) {
            entry.sealed = true;
        }
        self.prune(group);
    }

    pub(crate) fn register_task(&mut self, groups: &[GroupRef]) -> (TaskId, Latch) {
        let id = self.next_id();
        let finished = Latch::new();
        for group in groups {
            if let Some(entry) = self.group_mut(group) {
                entry.members.insert(id);
            }
        }
        self.tasks.insert(
            id,
            TaskRecord {
                groups: groups.to_vec(),
                finished: finished.clone(),
            },
        );
        self.in_flight.send_replace(self.tasks.len());
        (id, finished)
    }

    pub(crate) fn complete_task(&mut self, task: TaskId) {
        let Some(record) = self.tasks.remove(&task) else {
            return;
        };
        for group in &record.groups {
            if let Some(entry) = self.group_mut(group) {
                entry.members.remove(&task);
            }
            self.prune(group);
        }
        record.finished.trigger();
        self.in_flight.send_replace(self.tasks.len());
    }

    /// Cancel every group registered under `key`.
    ///
    /// Returns the finish latches of the affected tasks. Cancelling a key
    /// with nothing registered is a no-op.
    pub(crate) fn cancel(&mut self, key: &CancelKey) -> Vec<Latch> {
        let Some(groups) = self.groups.remove(key) else {
            return Vec::new();
        };

        let mut finished = Vec::new();
        for group in groups {
            group.cancel.trigger();
            finished.extend(
                group
                    .members
                    .iter()
                    .filter_map(|task| self.tasks.get(task))
                    .map(|record| record.finished.clone()),
            );
        }
        tracing::debug!(
            target: "tca_runtime::effect",
            cancel_id = %key,
            tasks = finished.len(),
            "Cancelled effects"
        );
        finished
    }

    pub(crate) fn is_registered(&self, key: &CancelKey) -> bool {
        self.groups.contains_key(key)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    fn group_mut(&mut self, group: &GroupRef) -> Option<&mut Group> {
        self.groups
            .get_mut(&group.key)?
            .iter_mut()
            .find(|entry| entry.id == group.id)
    }

    fn prune(&mut self, group: &GroupRef) {
        let Some(entries) = self.groups.get_mut(&group.key) else {
            return;
        };
        entries.retain(|entry| entry.id != group.id || !entry.sealed || !entry.members.is_empty());
        if entries.is_empty() {
            self.groups.remove(&group.key);
        }
    }
}

impl Default for CancellationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
