//! Controller glue: feeds UI and backend events into the shared state machine.

pub mod orchestration;
