//! Command handlers.

pub mod history;
pub mod paths;
pub mod progress;
pub mod serve;
