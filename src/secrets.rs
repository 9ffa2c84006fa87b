//! Collaborator credential retrieval.
//!
//! Credentials are looked up by parameter path (e.g.
//! `/represent-app/openstates-api-key`) through an injected
//! [`SecretProvider`], fronted by a small bounded read-through cache.
//! Cached entries carry a SHA-256 checksum and are re-fetched when
//! validation fails, so a corrupted cache entry can never be served.

use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

use crate::errors::AppError;

/// Failures surfaced by a secret provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// No secret exists under the requested parameter path.
    NotFound(String),
    /// The provider refused access to the parameter.
    AccessDenied(String),
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretError::NotFound(name) => write!(f, "Secret not found: {}", name),
            SecretError::AccessDenied(name) => write!(f, "Access denied for secret: {}", name),
        }
    }
}

impl std::error::Error for SecretError {}

impl From<SecretError> for AppError {
    fn from(err: SecretError) -> Self {
        AppError::InternalError(format!("Failed to retrieve API key: {}", err))
    }
}

/// Source of collaborator credentials, keyed by parameter path.
pub trait SecretProvider: Send + Sync {
    fn fetch(&self, name: &str) -> Result<String, SecretError>;
}

/// Resolves parameter paths against process environment variables.
///
/// The last path segment is upper-snake-cased, so
/// `/represent-app/openstates-api-key` resolves to `OPENSTATES_API_KEY`.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    fn env_name(parameter: &str) -> String {
        let trimmed = parameter.trim_start_matches('/');
        let tail = trimmed.rsplit('/').next().unwrap_or(trimmed);
        tail.replace('-', "_").to_ascii_uppercase()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn fetch(&self, name: &str) -> Result<String, SecretError> {
        let env_name = Self::env_name(name);
        std::env::var(&env_name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}

/// Cached secret with an integrity checksum, stored serialized.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ValidatedSecret {
    /// The secret value.
    value: String,
    /// SHA-256 checksum of the value (hex encoded).
    checksum: String,
}

impl ValidatedSecret {
    fn new(value: String) -> Self {
        let checksum = Self::compute_checksum(&value);
        Self { value, checksum }
    }

    fn compute_checksum(value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Serializes the entry for storage in the cache.
    fn serialize(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Deserializes and validates a cache entry.
    ///
    /// Returns `Some(value)` if the checksum matches, `None` for corrupted
    /// or invalid entries.
    fn deserialize_and_validate(serialized: &str) -> Option<String> {
        let entry: ValidatedSecret = serde_json::from_str(serialized).ok()?;
        if Self::compute_checksum(&entry.value) == entry.checksum {
            Some(entry.value)
        } else {
            tracing::warn!("Secret cache validation failed: checksum mismatch");
            None
        }
    }
}

/// Bounded read-through cache in front of a secret provider.
///
/// Entries are immutable strings keyed by parameter path, so the cache is
/// safe to share across requests without coordination. A cached entry that
/// fails checksum validation is discarded and fetched fresh.
pub struct SecretStore {
    provider: Arc<dyn SecretProvider>,
    cache: Cache<String, String>,
}

impl SecretStore {
    /// Cache capacity: one entry per configured parameter path, with room
    /// to spare.
    const CACHE_CAPACITY: u64 = 10;

    pub fn new(provider: Arc<dyn SecretProvider>) -> Self {
        Self {
            provider,
            cache: Cache::builder().max_capacity(Self::CACHE_CAPACITY).build(),
        }
    }

    /// Fetch a secret, serving validated cached entries when present.
    pub async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        if let Some(cached) = self.cache.get(name).await {
            if let Some(value) = ValidatedSecret::deserialize_and_validate(&cached) {
                return Ok(value);
            }
            // Corrupted entry; refetch from the provider
            self.cache.invalidate(name).await;
        }

        tracing::info!("Retrieving API key from credential provider: {}", name);
        let value = self.provider.fetch(name)?;
        self.cache
            .insert(name.to_string(), ValidatedSecret::new(value.clone()).serialize())
            .await;
        Ok(value)
    }
}
