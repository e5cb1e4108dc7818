use std::fmt;
use std::marker::PhantomData;

use super::for_each::ForEach;
use super::if_let::IfLet;
use super::lens::{CasePath, Lens};
use super::print_changes::PrintChanges;
use crate::effect::Effect;
use crate::presentation::{PresentationAction, PresentationState};
use crate::stack::{StackAction, StackState};

/// Reducer evolves state in place for one action and describes follow-up work.
///
/// This is the only place where state transitions happen. It must not
/// block or suspend; anything asynchronous goes into the returned effect.
pub trait Reducer: Send + Sync + 'static {
    /// The state this reducer operates on.
    type State: Send + 'static;

    /// The actions this reducer handles.
    type Action: Send + 'static;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;
}

impl<R: Reducer + ?Sized> Reducer for Box<R> {
    type State = R::State;
    type Action = R::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        (**self).reduce(state, action)
    }
}

/// Reducer built from a closure.
///
/// ```
/// use tca_runtime::{Effect, Reduce, Reducer};
///
/// let counter = Reduce::new(|count: &mut i32, delta: i32| {
///     *count += delta;
///     Effect::none()
/// });
///
/// let mut count = 0;
/// let _ = counter.reduce(&mut count, 2);
/// assert_eq!(count, 2);
/// ```
pub struct Reduce<S, A, F> {
    reduce: F,
    _domain: PhantomData<fn(&mut S, A)>,
}

impl<S, A, F> Reduce<S, A, F>
where
    F: Fn(&mut S, A) -> Effect<A>,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _domain: PhantomData,
        }
    }
}

impl<S, A, F> Reducer for Reduce<S, A, F>
where
    S: Send + 'static,
    A: Send + 'static,
    F: Fn(&mut S, A) -> Effect<A> + Send + Sync + 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut S, action: A) -> Effect<A> {
        (self.reduce)(state, action)
    }
}

/// Reducer that does nothing. Useful for presenting child state that has
/// no logic of its own, such as an alert.
pub struct EmptyReducer<S, A> {
    _domain: PhantomData<fn(&mut S, A)>,
}

impl<S, A> EmptyReducer<S, A> {
    pub fn new() -> Self {
        Self {
            _domain: PhantomData,
        }
    }
}

impl<S, A> Default for EmptyReducer<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Reducer for EmptyReducer<S, A>
where
    S: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, _state: &mut S, _action: A) -> Effect<A> {
        Effect::none()
    }
}

/// Runs two reducers over the same domain, in order, merging their effects.
pub struct Combine<L, R> {
    first: L,
    second: R,
}

impl<L, R> Reducer for Combine<L, R>
where
    L: Reducer,
    R: Reducer<State = L::State, Action = L::Action>,
    L::Action: Clone,
{
    type State = L::State;
    type Action = L::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        let first = self.first.reduce(state, action.clone());
        let second = self.second.reduce(state, action);
        Effect::merge([first, second])
    }
}

/// Builder-style composition on any reducer.
pub trait ReducerExt: Reducer + Sized {
    /// Run `other` after `self` for every action.
    fn combine<R>(self, other: R) -> Combine<Self, R>
    where
        R: Reducer<State = Self::State, Action = Self::Action>,
    {
        Combine {
            first: self,
            second: other,
        }
    }

    /// Embed `child` in an optional presentation slot of this reducer's state.
    fn if_let<C>(
        self,
        state: Lens<Self::State, PresentationState<C::State>>,
        action: CasePath<Self::Action, PresentationAction<C::Action>>,
        child: C,
    ) -> IfLet<Self, C>
    where
        C: Reducer,
    {
        IfLet::new(self, state, action, child)
    }

    /// Embed `child` in every element of a navigation stack.
    fn for_each<C>(
        self,
        state: Lens<Self::State, StackState<C::State>>,
        action: CasePath<Self::Action, StackAction<C::State, C::Action>>,
        child: C,
    ) -> ForEach<Self, C>
    where
        C: Reducer,
    {
        ForEach::new(self, state, action, child)
    }

    /// Log every action and the state change it caused.
    fn print_changes(self) -> PrintChanges<Self>
    where
        Self::State: fmt::Debug,
        Self::Action: fmt::Debug,
    {
        PrintChanges::new(self)
    }

    fn boxed(self) -> Box<dyn Reducer<State = Self::State, Action = Self::Action>> {
        Box::new(self)
    }
}

impl<R: Reducer> ReducerExt for R {}
