use thiserror::Error;

// === StorageError ===

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing database rejected the operation.
    #[error("Storage database error: {0}")]
    DatabaseError(String),
    /// A snapshot could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    SerializationError(String),
    /// The storage lock was poisoned by a panicking writer.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

// === HostError ===

/// Errors returned by host tab/group commands.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host answered a command with an error.
    #[error("Host command {method} failed: {message}")]
    CommandFailed { method: String, message: String },
    /// The host answered with something that is not the expected record.
    #[error("Malformed host response to {method}: {message}")]
    MalformedResponse { method: String, message: String },
    /// The host connection is gone; no answer will arrive.
    #[error("Host disconnected")]
    Disconnected,
    /// Writing a command to the host failed.
    #[error("Host I/O error: {0}")]
    Io(String),
}

// === RestoreError ===

/// Errors that stop restoration before any tab is created.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Failed to read saved layouts: {0}")]
    Read(#[source] StorageError),
    #[error("Failed to clear saved layouts: {0}")]
    Clear(#[source] StorageError),
}

// === SettingsError ===

/// Errors related to loading, saving and editing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the config file failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The config file is not valid settings JSON.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The dot-path does not name a setting.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value does not fit the setting's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === BridgeError ===

/// Errors decoding a line received from the host bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The line is not JSON.
    #[error("Bridge parse error: {0}")]
    Parse(String),
    /// The line is JSON but neither an event nor a response.
    #[error("Unrecognized bridge message: {0}")]
    UnknownMessage(String),
}

// === AppError ===

/// Errors that prevent the background process from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Host(#[from] HostError),
    /// Reading host messages from stdin failed.
    #[error("Host bridge I/O error: {0}")]
    BridgeIo(#[from] std::io::Error),
}
