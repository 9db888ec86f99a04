//! Worker thread that owns the async runtime and every network call.

pub mod commands;
pub mod runtime;
