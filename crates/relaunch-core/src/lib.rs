//! # relaunch-core
//!
//! Core library for the relaunch updater providing:
//! - Updater configuration types (release source, network, marker lifecycle)
//! - Hierarchical configuration loading (embedded defaults, file, environment)
//! - The configuration error type

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::RuntimeConfig;
pub use utils::get_home_dir;
