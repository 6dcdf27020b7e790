//! CLI command implementations

pub mod check;
pub mod platform;
pub mod reap;
pub mod run;
pub mod sync;
pub mod version;
