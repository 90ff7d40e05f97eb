//! Controller layer: view/session events, reducer-like state transitions, and command execution.

pub mod events;
pub mod orchestration;
pub mod reducer;
