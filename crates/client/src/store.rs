//! Durable credential slot: a small JSON file in the user's data directory.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use console_auth::{Credential, CredentialStore, CredentialStoreError};

const APP_DIR: &str = "console";
const FILE_NAME: &str = "credential.json";

/// On-disk shape of the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub credential: String,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{data_dir}/console/credential.json`.
    pub fn in_data_dir() -> Result<Self, CredentialStoreError> {
        Ok(Self::new(default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored record, if the slot holds a readable one.
    pub fn load(&self) -> Option<StoredCredential> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(error = %err, path = ?self.path, "failed to read credential");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(stored) => Some(stored),
            Err(err) => {
                tracing::warn!(error = %err, path = ?self.path, "ignoring corrupt credential file");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.load()
            .map(|stored| Credential::new(stored.credential))
            .filter(|c| !c.is_empty())
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let stored = StoredCredential {
            credential: credential.as_str().to_string(),
            stored_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_vec(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

fn default_path() -> Result<PathBuf, CredentialStoreError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "no data or home directory"))?;
    dir.push(APP_DIR);
    dir.push(FILE_NAME);
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> FileCredentialStore {
        let dir = std::env::temp_dir().join(format!("console-store-{}", uuid::Uuid::now_v7()));
        FileCredentialStore::new(dir.join(FILE_NAME))
    }

    #[test]
    fn round_trips_and_clears() {
        let store = scratch();
        assert!(store.get().is_none());

        store.set(Credential::new("Bearer abc")).unwrap();
        assert_eq!(store.get().unwrap().as_str(), "Bearer abc");
        assert!(store.load().unwrap().stored_at <= Utc::now());

        store.clear().unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_or_blank_slot_reads_as_absent() {
        let store = scratch();
        store.set(Credential::new("")).unwrap();
        assert!(store.get().is_none());

        fs::write(store.path(), b"not json").unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
    }
}
