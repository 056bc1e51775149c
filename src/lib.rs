//! tabkeeper: keeps browser tab-group layouts across window closures.
//!
//! An in-memory group index follows the host's tab and group events, is
//! written to key-value storage after every change and when a window closes,
//! and is replayed into fresh tabs and groups on the next startup.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
