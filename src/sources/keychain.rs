//! Credential-store namespaces.
//!
//! A namespace maps to one service name (`<prefix><namespace>`); each
//! variable is an entry whose account is the key and whose secret is the
//! value. OS keyrings cannot list the entries of a service, so every
//! namespace also carries an index entry (account
//! [`KEYCHAIN_INDEX_ACCOUNT`]) holding a JSON array of the stored keys.

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use crate::constants::KEYCHAIN_INDEX_ACCOUNT;
use crate::models::EnvVar;

/// Errors from a credential store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("corrupt key index in service `{service}`: {source}")]
    Index {
        service: String,
        source: serde_json::Error,
    },

    #[error("`{0}` is a reserved name and cannot be stored")]
    ReservedKey(String),

    #[error("variable names must be non-empty and contain no `=` or NUL")]
    InvalidName,

    #[error("key index in service `{service}` lists an invalid variable name")]
    InvalidKey { service: String },
}

/// Read/write access to namespaced secrets.
pub trait CredentialStore {
    /// Every variable stored under the namespace. An unknown namespace
    /// yields an empty list; callers decide whether that is an error.
    fn query_namespace(
        &self,
        namespace: &str,
        service_prefix: &str,
    ) -> Result<Vec<EnvVar>, StoreError>;

    /// Store `vars` under the namespace, replacing existing values.
    fn put_namespace(
        &mut self,
        namespace: &str,
        service_prefix: &str,
        vars: &[EnvVar],
    ) -> Result<(), StoreError>;
}

/// [`CredentialStore`] backed by the OS keyring via the `keyring` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn query_namespace(
        &self,
        namespace: &str,
        service_prefix: &str,
    ) -> Result<Vec<EnvVar>, StoreError> {
        query_indexed(&OsKeyring, &format!("{service_prefix}{namespace}"))
    }

    fn put_namespace(
        &mut self,
        namespace: &str,
        service_prefix: &str,
        vars: &[EnvVar],
    ) -> Result<(), StoreError> {
        put_indexed(&mut OsKeyring, &format!("{service_prefix}{namespace}"), vars)
    }
}

/// Single secrets addressed by service and account.
trait SecretSlots {
    /// `None` when no secret is stored.
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, service: &str, account: &str, secret: &str) -> Result<(), StoreError>;
}

struct OsKeyring;

impl SecretSlots for OsKeyring {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, StoreError> {
        match keyring::Entry::new(service, account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, service: &str, account: &str, secret: &str) -> Result<(), StoreError> {
        keyring::Entry::new(service, account)?.set_password(secret)?;
        Ok(())
    }
}

fn read_index(slots: &impl SecretSlots, service: &str) -> Result<Vec<String>, StoreError> {
    match slots.get(service, KEYCHAIN_INDEX_ACCOUNT)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Index {
            service: service.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Read every indexed entry of `service`.
///
/// An indexed key without an entry is skipped: the index is written before
/// the entries, so an interrupted write leaves such keys behind.
fn query_indexed(slots: &impl SecretSlots, service: &str) -> Result<Vec<EnvVar>, StoreError> {
    let keys = read_index(slots, service)?;

    let mut vars = Vec::with_capacity(keys.len());
    for key in keys {
        if !EnvVar::is_valid_key(&key) {
            return Err(StoreError::InvalidKey {
                service: service.to_string(),
            });
        }
        match slots.get(service, &key)? {
            Some(value) => vars.push(EnvVar::new(key, value)),
            None => tracing::debug!(service, key = %key, "indexed keychain item is missing"),
        }
    }
    Ok(vars)
}

/// Store `vars` under `service`. The index (old keys plus new ones) is
/// written first, so every entry that reaches the keyring is indexed.
fn put_indexed(
    slots: &mut impl SecretSlots,
    service: &str,
    vars: &[EnvVar],
) -> Result<(), StoreError> {
    check_keys(vars)?;

    let mut keys = read_index(slots, service)?;
    let known = keys.len();
    for var in vars {
        if !keys.contains(&var.key) {
            keys.push(var.key.clone());
        }
    }
    if keys.len() != known {
        let raw = serde_json::to_string(&keys).map_err(|source| StoreError::Index {
            service: service.to_string(),
            source,
        })?;
        slots.set(service, KEYCHAIN_INDEX_ACCOUNT, &raw)?;
    }

    for var in vars {
        slots.set(service, &var.key, &var.value)?;
        tracing::debug!(service, key = %var.key, "stored keychain item");
    }
    Ok(())
}

/// In-process [`CredentialStore`], keyed by service name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    services: HashMap<String, IndexMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn query_namespace(
        &self,
        namespace: &str,
        service_prefix: &str,
    ) -> Result<Vec<EnvVar>, StoreError> {
        let service = format!("{service_prefix}{namespace}");
        Ok(self
            .services
            .get(&service)
            .map(|items| {
                items
                    .iter()
                    .map(|(key, value)| EnvVar::new(key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn put_namespace(
        &mut self,
        namespace: &str,
        service_prefix: &str,
        vars: &[EnvVar],
    ) -> Result<(), StoreError> {
        check_keys(vars)?;
        let items = self
            .services
            .entry(format!("{service_prefix}{namespace}"))
            .or_default();
        for var in vars {
            items.insert(var.key.clone(), var.value.clone());
        }
        Ok(())
    }
}

fn check_keys(vars: &[EnvVar]) -> Result<(), StoreError> {
    for var in vars {
        if var.key == KEYCHAIN_INDEX_ACCOUNT {
            return Err(StoreError::ReservedKey(var.key.clone()));
        }
        if !EnvVar::is_valid_key(&var.key) {
            return Err(StoreError::InvalidName);
        }
    }
    Ok(())
}
