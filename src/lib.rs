//! A unidirectional state-management runtime.
//!
//! A [`Store`] owns a feature's state. Actions sent to it run through a
//! [`Reducer`], which mutates the state and returns an [`Effect`] describing
//! asynchronous follow-up work. Effects feed new actions back into the store
//! through an [`ActionSender`]:
//!
//! ```text
//! Store::send(action) ──→ Reducer::reduce(&mut state, action) ──→ Effect
//!        ↑                                                          │
//!        └────────────── ActionSender::send(action) ←── runtime ←───┘
//! ```
//!
//! Features are composed from independent reducers with [`Scope`],
//! [`IfLet`] (presented children, see [`PresentationState`]) and
//! [`ForEach`] (navigation stacks, see [`StackState`]).

pub mod config;
pub mod diagnostics;
pub mod effect;
pub mod features;
pub mod logging;
pub mod presentation;
pub mod reducer;
pub mod stack;
pub mod store;
pub mod testing;

pub use config::{ConfigError, LoggingConfig, RuntimeConfig, RuntimeSection, UnhandledErrorPolicy};
pub use effect::{ActionSender, BoxFuture, CancelId, Effect, EffectError};
pub use presentation::{PresentationAction, PresentationId, PresentationState};
pub use reducer::{
    CasePath, Combine, EmptyReducer, ForEach, IfLet, Lens, PrintChanges, Reduce, Reducer,
    ReducerExt, Scope,
};
pub use stack::{StackAction, StackElementId, StackState};
pub use store::Store;
