//! Credential persistence on a real filesystem.

use globetrotter::{AuthContext, CredentialStore};
use tempfile::TempDir;

fn jane() -> AuthContext {
    AuthContext::new("tok-123".to_string(), "jane".to_string())
}

#[test]
fn test_missing_file_means_signed_out() {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("auth.toml"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_saved_credentials_survive_a_new_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auth.toml");

    CredentialStore::new(&path).save(&jane()).unwrap();

    let reopened = CredentialStore::new(&path);
    let auth = reopened.load().unwrap().unwrap();
    assert_eq!(auth, jane());
    assert_eq!(auth.bearer(), "Bearer tok-123");
}

#[test]
fn test_save_replaces_previous_identity() {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("auth.toml"));

    store.save(&jane()).unwrap();
    store
        .save(&AuthContext::new("tok-456".to_string(), "raj".to_string()))
        .unwrap();

    let auth = store.load().unwrap().unwrap();
    assert_eq!(auth.username(), "raj");
    assert_eq!(auth.token(), "tok-456");
}

#[test]
fn test_save_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("auth.toml");
    let store = CredentialStore::new(&path);

    store.save(&jane()).unwrap();
    assert!(path.exists());
}

#[test]
fn test_clear_signs_out_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("auth.toml"));

    store.save(&jane()).unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auth.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    let err = CredentialStore::new(&path).load().unwrap_err();
    assert!(err.message.contains("Failed to parse credentials"));
}
