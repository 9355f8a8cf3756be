use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TokenPair;

/// Bearer credential as sent in the `Authorization` header
/// (`"Bearer eyJhbGciOi..."`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_tokens(tokens: &TokenPair) -> Self {
        Self(format!("{} {}", tokens.token_type, tokens.access_token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("credential store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A single durable slot holding the session credential.
///
/// Presence of a non-empty value means "authenticated".
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<Credential>;
    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError>;
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-lifetime store (tests, non-persistent sessions).
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|c| !c.is_empty())
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_joins_token_type_and_access_token() {
        let tokens = TokenPair {
            access_token: "abc.def.ghi".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expires: None,
        };
        assert_eq!(Credential::from_tokens(&tokens).as_str(), "Bearer abc.def.ghi");
    }

    #[test]
    fn debug_does_not_leak_token() {
        let c = Credential::new("Bearer secret");
        assert!(!format!("{c:?}").contains("secret"));
    }

    #[test]
    fn memory_store_treats_blank_as_absent() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().is_none());

        store.set(Credential::new("  ")).unwrap();
        assert!(store.get().is_none());

        store.set(Credential::new("Bearer x")).unwrap();
        assert_eq!(store.get(), Some(Credential::new("Bearer x")));

        store.clear().unwrap();
        assert!(store.get().is_none());
    }
}
