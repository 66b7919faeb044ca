use std::cell::RefCell;
use std::collections::HashMap;

use crate::constants::{AUTH_SCHEME, LEGACY_TOKEN_STORAGE_KEY, TOKEN_STORAGE_KEY};

/// Minimal string key/value storage, shaped after `window.localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Holds the visitor's bearer token. An empty or missing token never clears
/// a stored one.
#[derive(Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn set(&self, token: Option<&str>) {
        match token {
            Some(token) if !token.is_empty() => {
                self.storage.set_item(TOKEN_STORAGE_KEY, token);
            }
            _ => log::trace!("ignoring empty token"),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty())
    }

    /// The stored token formatted as an `Authorization` header value.
    pub fn get(&self) -> Option<String> {
        self.raw().map(|token| format!("{} {}", AUTH_SCHEME, token))
    }

    /// Copies a token saved under the legacy key into the canonical key when
    /// the canonical key is still empty. Returns whether a copy happened.
    pub fn migrate_legacy(&self) -> bool {
        let legacy = self
            .storage
            .get_item(LEGACY_TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty());

        let Some(legacy) = legacy else {
            return false;
        };

        let migrated = self.raw().is_none();
        if migrated {
            log::info!("copying token forward from legacy storage key");
            self.set(Some(&legacy));
        }
        self.storage.remove_item(LEGACY_TOKEN_STORAGE_KEY);
        migrated
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TokenStore<MemoryStorage> {
        TokenStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_set_then_get_formats_authorization() {
        let tokens = store();
        assert_eq!(tokens.get(), None);

        tokens.set(Some("abc"));
        assert_eq!(tokens.get().as_deref(), Some("UserState abc"));
        assert_eq!(tokens.raw().as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_or_missing_token_never_clears() {
        let tokens = store();
        tokens.set(Some("abc"));

        tokens.set(None);
        assert_eq!(tokens.get().as_deref(), Some("UserState abc"));

        tokens.set(Some(""));
        assert_eq!(tokens.get().as_deref(), Some("UserState abc"));
    }

    #[test]
    fn test_latest_token_wins() {
        let tokens = store();
        tokens.set(Some("first"));
        tokens.set(Some("second"));
        assert_eq!(tokens.raw().as_deref(), Some("second"));
    }

    #[test]
    fn test_migrate_legacy_copies_forward_once() {
        let tokens = store();
        tokens.storage().set_item(LEGACY_TOKEN_STORAGE_KEY, "old");

        assert!(tokens.migrate_legacy());
        assert_eq!(tokens.raw().as_deref(), Some("old"));
        assert_eq!(tokens.storage().get_item(LEGACY_TOKEN_STORAGE_KEY), None);
        assert!(!tokens.migrate_legacy());
    }

    #[test]
    fn test_migrate_legacy_keeps_canonical_token() {
        let tokens = store();
        tokens.set(Some("new"));
        tokens.storage().set_item(LEGACY_TOKEN_STORAGE_KEY, "old");

        assert!(!tokens.migrate_legacy());
        assert_eq!(tokens.raw().as_deref(), Some("new"));
        assert_eq!(tokens.storage().get_item(LEGACY_TOKEN_STORAGE_KEY), None);
    }
}
