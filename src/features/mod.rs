//! Demo features driven by the runtime: a counter with a fact client and a
//! timer, a contacts list with a presented sheet, an alert and a navigation
//! stack, and a tabbed app composing two counters.

pub mod app;
pub mod contacts;
pub mod counter;
