//! Key-value store wrapper with JSON serialization.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::CacheError;

/// JSON-typed view over a key-value store.
///
/// Cloning is cheap; clones share the store.
#[derive(Clone)]
pub struct Cache {
    #[cfg(target_arch = "wasm32")]
    store: std::rc::Rc<spin_sdk::key_value::Store>,
    #[cfg(not(target_arch = "wasm32"))]
    store: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

#[cfg(target_arch = "wasm32")]
impl Cache {
    /// Open the component's default key-value store.
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            store: std::rc::Rc::new(store),
        })
    }

    /// Open a key-value store by its Spin label.
    pub fn open(label: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(label)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            store: std::rc::Rc::new(store),
        })
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store
            .get(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn set_bytes(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        self.store
            .set(key, &bytes)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    /// Delete a key. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store
            .delete(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store
            .exists(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Cache {
    /// Create an empty in-process store.
    pub fn in_memory() -> Self {
        Self {
            store: Default::default(),
        }
    }

    fn with_map<R>(
        &self,
        f: impl FnOnce(&mut std::collections::HashMap<String, Vec<u8>>) -> R,
    ) -> Result<R, CacheError> {
        let mut map = self
            .store
            .lock()
            .map_err(|_| CacheError::StoreError("store lock poisoned".to_string()))?;
        Ok(f(&mut map))
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.with_map(|m| m.get(key).cloned())
    }

    fn set_bytes(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        self.with_map(|m| {
            m.insert(key.to_string(), bytes);
        })
    }

    /// Delete a key. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.with_map(|m| {
            m.remove(key);
        })
    }

    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.with_map(|m| m.contains_key(key))
    }
}

impl Cache {
    /// Get and deserialize a value; `None` if the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_bytes(key, serde_json::to_vec(value)?)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_delete() {
        let cache = Cache::in_memory();
        assert_eq!(cache.get::<u64>("delay").unwrap(), None);

        cache.set("delay", &250u64).unwrap();
        assert_eq!(cache.get::<u64>("delay").unwrap(), Some(250));
        assert!(cache.exists("delay").unwrap());

        cache.delete("delay").unwrap();
        cache.delete("delay").unwrap();
        assert!(!cache.exists("delay").unwrap());
    }

    #[test]
    fn test_wrong_type_is_serialize_error() {
        let cache = Cache::in_memory();
        cache.set("k", &"text").unwrap();
        assert!(matches!(
            cache.get::<u64>("k"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::in_memory();
        cache.clone().set("k", &true).unwrap();
        assert_eq!(cache.get::<bool>("k").unwrap(), Some(true));
    }
}
