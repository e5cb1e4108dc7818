//! Navigation stacks of uniquely identified child states.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one element pushed onto a [`StackState`].
///
/// Ids come from one process-wide counter, in increasing order, and are
/// never reused. An action addressed to a popped element can never reach a
/// newer one, even after the whole stack has been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackElementId(u64);

impl StackElementId {
    /// Mint an id no element has had before.
    pub fn generate() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StackElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered stack of child states, bottom first.
///
/// Equality compares the states in order and ignores their ids, so an
/// expected stack built with [`StackState::push`] matches the real one.
#[derive(Clone)]
pub struct StackState<S> {
    elements: Vec<(StackElementId, S)>,
}

impl<S> StackState<S> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Push `state` on top and return its new id.
    pub fn push(&mut self, state: S) -> StackElementId {
        let id = StackElementId::generate();
        self.elements.push((id, state));
        id
    }

    /// Push with an id obtained earlier from [`StackElementId::generate`].
    ///
    /// Returns `false` and leaves the stack unchanged if an element with
    /// that id is already on the stack.
    pub fn push_with_id(&mut self, id: StackElementId, state: S) -> bool {
        if self.contains(id) {
            return false;
        }
        self.elements.push((id, state));
        true
    }

    pub fn pop_last(&mut self) -> Option<(StackElementId, S)> {
        self.elements.pop()
    }

    /// Remove the element `id` and everything above it.
    ///
    /// Removed elements are returned topmost first. An unknown id removes
    /// nothing.
    pub fn pop_from(&mut self, id: StackElementId) -> Vec<(StackElementId, S)> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut removed = self.elements.split_off(index);
        removed.reverse();
        removed
    }

    /// Remove every element.
    pub fn clear(&mut self) -> Vec<(StackElementId, S)> {
        let mut removed = std::mem::take(&mut self.elements);
        removed.reverse();
        removed
    }

    pub fn get(&self, id: StackElementId) -> Option<&S> {
        self.index_of(id).map(|index| &self.elements[index].1)
    }

    pub fn get_mut(&mut self, id: StackElementId) -> Option<&mut S> {
        let index = self.index_of(id)?;
        Some(&mut self.elements[index].1)
    }

    pub fn contains(&self, id: StackElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn ids(&self) -> Vec<StackElementId> {
        self.elements.iter().map(|(id, _)| *id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StackElementId, &S)> {
        self.elements.iter().map(|(id, state)| (*id, state))
    }

    pub fn last(&self) -> Option<(StackElementId, &S)> {
        self.elements.last().map(|(id, state)| (*id, state))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn index_of(&self, id: StackElementId) -> Option<usize> {
        self.elements.iter().position(|(element, _)| *element == id)
    }
}

impl<S> Default for StackState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromIterator<S> for StackState<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stack = Self::new();
        for state in iter {
            stack.push(state);
        }
        stack
    }
}

impl<S: PartialEq> PartialEq for StackState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|((_, a), (_, b))| a == b)
    }
}

impl<S: Eq> Eq for StackState<S> {}

impl<S: fmt::Debug> fmt::Debug for StackState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.elements.iter().map(|(id, state)| (id.0, state)))
            .finish()
    }
}

/// Actions a parent routes to its navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackAction<S, A> {
    /// An action for the element `id`.
    Element { id: StackElementId, action: A },
    /// Pop `id` and everything above it.
    PopFrom { id: StackElementId },
    /// Push `state` under an id from [`StackElementId::generate`].
    Push { id: StackElementId, state: S },
}
