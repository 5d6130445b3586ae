//! File-backed single-slot repositories.
//!
//! Each repository keeps its record as one JSON file in a configured
//! directory, so gatekeeper and user state survive process restarts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::gatekeeper::SingleGatekeeperRepository;
use super::user::{SingleUserRepository, User};
use crate::gatekeeper::Gatekeeper;
use crate::id::{GatekeeperId, UserId};
use crate::AuthError;

fn ensure_dir(directory: impl Into<PathBuf>) -> Result<PathBuf, AuthError> {
    let dir = directory.into();
    std::fs::create_dir_all(&dir)
        .map_err(|e| AuthError::StorageError(format!("failed to create directory: {e}")))?;
    Ok(dir)
}

fn read_slot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AuthError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| AuthError::StorageError(format!("failed to read {}: {e}", path.display())))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| AuthError::StorageError(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(value))
}

fn write_slot<T: Serialize>(path: &Path, value: &T) -> Result<(), AuthError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| AuthError::StorageError(format!("failed to serialize record: {e}")))?;
    std::fs::write(path, content)
        .map_err(|e| AuthError::StorageError(format!("failed to write {}: {e}", path.display())))
}

/// File-backed store for the single primary user.
///
/// # Example
///
/// ```rust,ignore
/// use keygate::FileUserRepository;
///
/// let repo = FileUserRepository::new("/var/lib/myapp/identity")?;
/// ```
pub struct FileUserRepository {
    path: PathBuf,
}

impl FileUserRepository {
    /// Creates the repository, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, AuthError> {
        Ok(Self {
            path: ensure_dir(directory)?.join("user.json"),
        })
    }
}

#[async_trait]
impl SingleUserRepository for FileUserRepository {
    async fn next_id(&self) -> Result<UserId, AuthError> {
        Ok(UserId::generate())
    }

    async fn save(&self, user: User) -> Result<(), AuthError> {
        if let Some(existing) = read_slot::<User>(&self.path)? {
            if existing.id() != user.id() {
                return Err(AuthError::PrimaryUserAlreadyExists);
            }
        }
        write_slot(&self.path, &user)
    }

    async fn remove(&self, user: &User) -> Result<(), AuthError> {
        match read_slot::<User>(&self.path)? {
            Some(existing) if existing.id() == user.id() => std::fs::remove_file(&self.path)
                .map_err(|e| AuthError::StorageError(format!("failed to remove user: {e}"))),
            _ => Err(AuthError::UserNotFound),
        }
    }

    async fn primary_user(&self) -> Result<Option<User>, AuthError> {
        read_slot(&self.path)
    }

    async fn user_by_encrypted_password(
        &self,
        encrypted_password: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(read_slot::<User>(&self.path)?
            .filter(|user| user.encrypted_password() == encrypted_password))
    }
}

/// File-backed store for the single gatekeeper record.
pub struct FileGatekeeperRepository {
    path: PathBuf,
}

impl FileGatekeeperRepository {
    /// Creates the repository, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, AuthError> {
        Ok(Self {
            path: ensure_dir(directory)?.join("gatekeeper.json"),
        })
    }
}

#[async_trait]
impl SingleGatekeeperRepository for FileGatekeeperRepository {
    async fn next_id(&self) -> Result<GatekeeperId, AuthError> {
        Ok(GatekeeperId::generate())
    }

    async fn save(&self, gatekeeper: Gatekeeper) -> Result<(), AuthError> {
        write_slot(&self.path, &gatekeeper)
    }

    async fn gatekeeper(&self) -> Result<Option<Gatekeeper>, AuthError> {
        read_slot(&self.path)
    }
}
