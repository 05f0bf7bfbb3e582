//! Durable storage for the signed-in identity.

use std::path::{Path, PathBuf};

use derive_more::{Display, Error};
use tracing::{debug, info, instrument};

use crate::auth::AuthContext;

/// Persists the [`AuthContext`] as a TOML file so sign-in survives restarts.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by `path`. Nothing is read until [`load`](Self::load).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored credentials, `None` if nobody is signed in.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<AuthContext>, StoreError> {
        if !self.path.exists() {
            debug!("No stored credentials");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::new(format!("Failed to read credentials: {}", e)))?;
        let auth: AuthContext = toml::from_str(&content)
            .map_err(|e| StoreError::new(format!("Failed to parse credentials: {}", e)))?;
        info!(username = %auth.username(), "Loaded stored credentials");
        Ok(Some(auth))
    }

    /// Writes `auth`, replacing any previous credentials.
    #[instrument(skip(self, auth), fields(path = %self.path.display(), username = %auth.username()))]
    pub fn save(&self, auth: &AuthContext) -> Result<(), StoreError> {
        let content = toml::to_string(auth)
            .map_err(|e| StoreError::new(format!("Failed to encode credentials: {}", e)))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(format!("Failed to create directory: {}", e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::new(format!("Failed to write credentials: {}", e)))?;
        info!("Credentials saved");
        Ok(())
    }

    /// Removes stored credentials. Succeeds if there were none.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| StoreError::new(format!("Failed to remove credentials: {}", e)))?;
            info!("Credentials cleared");
        }
        Ok(())
    }
}

/// Credential storage error.
#[derive(Debug, Clone, Display, Error)]
#[display("Credential store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
