//! Worker thread executing backend commands off the UI thread.

pub mod runtime;
