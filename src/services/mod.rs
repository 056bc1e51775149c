// tabkeeper services
// The host collaborator interface, startup restoration, and settings.

pub mod host;
pub mod restoration;
pub mod settings_engine;
