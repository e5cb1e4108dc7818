//! Reducers and the operators that compose them.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State (mutated in place)
//!    ↑          │
//!    │          └──→ Effect ──→ runtime
//!    └──────────────────────────────┘
//! ```
//!
//! - **Reducer**: the only place state changes; synchronous, never suspends
//! - **Scope**: embeds a child reducer in a field of the parent
//! - **IfLet**: embeds a child in an optional, presented slot
//! - **ForEach**: embeds a child in every element of a navigation stack

mod for_each;
mod if_let;
mod lens;
mod print_changes;
mod reduce;
mod scope;

pub use for_each::ForEach;
pub use if_let::IfLet;
pub use lens::{CasePath, Lens};
pub use print_changes::PrintChanges;
pub use reduce::{Combine, EmptyReducer, Reduce, Reducer, ReducerExt};
pub use scope::Scope;

