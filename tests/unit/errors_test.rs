use std::error::Error;

use tabkeeper::types::errors::*;

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("disk full".to_string()).to_string(),
        "Storage database error: disk full"
    );
    assert_eq!(
        StorageError::SerializationError("bad json".to_string()).to_string(),
        "Storage serialization error: bad json"
    );
    assert_eq!(
        StorageError::Unavailable("poisoned".to_string()).to_string(),
        "Storage unavailable: poisoned"
    );
}

#[test]
fn storage_error_from_serde() {
    let serde_err = serde_json::from_str::<Vec<u8>>("x").unwrap_err();
    let err: StorageError = serde_err.into();
    assert!(matches!(err, StorageError::SerializationError(_)));
}

// === HostError Tests ===

#[test]
fn host_error_display_variants() {
    assert_eq!(
        HostError::CommandFailed {
            method: "tabs.create".to_string(),
            message: "no window".to_string(),
        }
        .to_string(),
        "Host command tabs.create failed: no window"
    );
    assert_eq!(
        HostError::MalformedResponse {
            method: "tabs.group".to_string(),
            message: "expected i32".to_string(),
        }
        .to_string(),
        "Malformed host response to tabs.group: expected i32"
    );
    assert_eq!(HostError::Disconnected.to_string(), "Host disconnected");
    assert_eq!(HostError::Io("broken pipe".to_string()).to_string(), "Host I/O error: broken pipe");
}

// === RestoreError Tests ===

#[test]
fn restore_error_keeps_storage_source() {
    let err = RestoreError::Read(StorageError::DatabaseError("locked".to_string()));
    assert_eq!(
        err.to_string(),
        "Failed to read saved layouts: Storage database error: locked"
    );
    assert!(err.source().is_some());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::InvalidKey("a.b".to_string()).to_string(),
        "Invalid settings key: a.b"
    );
    assert_eq!(
        SettingsError::InvalidValue("expected bool".to_string()).to_string(),
        "Invalid settings value: expected bool"
    );
}

// === BridgeError / AppError Tests ===

#[test]
fn bridge_error_display_variants() {
    assert_eq!(
        BridgeError::Parse("eof".to_string()).to_string(),
        "Bridge parse error: eof"
    );
    assert_eq!(
        BridgeError::UnknownMessage("{}".to_string()).to_string(),
        "Unrecognized bridge message: {}"
    );
}

#[test]
fn app_error_is_transparent() {
    let err: AppError = HostError::Disconnected.into();
    assert_eq!(err.to_string(), "Host disconnected");
}

#[test]
fn app_error_wraps_bridge_io() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed");
    let err: AppError = io.into();
    assert_eq!(err.to_string(), "Host bridge I/O error: stdin closed");
}
