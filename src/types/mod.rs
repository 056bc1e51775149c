// tabkeeper shared type definitions
// Host records, persisted snapshots, events, settings and errors.

pub mod errors;
pub mod event;
pub mod group;
pub mod settings;
pub mod snapshot;
pub mod tab;
