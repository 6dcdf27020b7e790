//! Common test infrastructure for relaunch-update tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Version strings, host facts, artifact content
//! - `mock_server`: Wiremock setup for the raw-file release host
//! - `fakes`: Recording launchers, fixed probes and coordinator setup

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fakes;
pub mod mock_server;

pub use constants::*;
pub use fakes::*;
pub use mock_server::*;
