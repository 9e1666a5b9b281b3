//! Versioned per-session data in the key-value store.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Cache, CacheError};

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Accept a cookie value as a session ID if it looks like one we issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.strip_prefix("sess_")?;
        let valid = !token.is_empty()
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Set-Cookie` header value carrying this ID.
    pub fn cookie(&self, name: &str) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, self.0)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session data as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds of the last write.
    pub updated_at: u64,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Typed session storage over a [`Cache`].
pub struct Session<T> {
    cache: Cache,
    _phantom: PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            _phantom: PhantomData,
        }
    }

    /// Session data, or `None` if the session does not exist.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Session data, or the default value for an unknown session.
    pub fn get_or_default(&self, id: &SessionId) -> Result<T, CacheError> {
        Ok(self.get(id)?.unwrap_or_default())
    }

    /// Full stored record including version.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get(&Self::key(id))
    }

    /// Replace session data, bumping the version.
    pub fn set(&self, id: &SessionId, data: T) -> Result<u64, CacheError> {
        let previous = self.get_versioned(id)?;
        let now = unix_now();
        let record = SessionData {
            id: id.clone(),
            data,
            version: previous.as_ref().map_or(1, |p| p.version + 1),
            created_at: previous.as_ref().map_or(now, |p| p.created_at),
            updated_at: now,
        };
        self.cache.set(&Self::key(id), &record)?;
        Ok(record.version)
    }

    /// Read-modify-write of session data. Returns the new version.
    pub fn update(&self, id: &SessionId, f: impl FnOnce(&mut T)) -> Result<u64, CacheError> {
        let mut data = self.get_or_default(id)?;
        f(&mut data);
        self.set(id, data)
    }

    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&Self::key(id))
    }

    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&Self::key(id))
    }

    fn key(id: &SessionId) -> String {
        format!("session:{}", id)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: Option<String>,
    }

    #[test]
    fn test_generate_format_and_uniqueness() {
        let id = SessionId::generate();
        assert!(id.as_str().starts_with("sess_"));
        // 18 bytes base64 = 24 chars
        assert_eq!(id.as_str().len(), 29);
        assert_ne!(id, SessionId::generate());
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn test_parse_rejects_foreign_values() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("sess_").is_none());
        assert!(SessionId::parse("abc").is_none());
        assert!(SessionId::parse("sess_a;b").is_none());
    }

    #[test]
    fn test_cookie_header() {
        assert_eq!(
            SessionId::new("sess_x").cookie("nw_session"),
            "nw_session=sess_x; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_versions_increase() {
        let session = Session::<Prefs>::new(Cache::in_memory());
        let id = SessionId::generate();
        assert_eq!(session.get(&id).unwrap(), None);
        assert_eq!(session.get_or_default(&id).unwrap(), Prefs::default());
        assert!(!session.exists(&id).unwrap());

        assert_eq!(session.set(&id, Prefs::default()).unwrap(), 1);
        let version = session
            .update(&id, |p| p.theme = Some("dark".into()))
            .unwrap();
        assert_eq!(version, 2);

        let stored = session.get_versioned(&id).unwrap().unwrap();
        assert_eq!(stored.data.theme.as_deref(), Some("dark"));
        assert!(stored.updated_at >= stored.created_at);

        session.delete(&id).unwrap();
        assert!(session.get(&id).unwrap().is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let cache = Cache::in_memory();
        let session = Session::<Prefs>::new(cache);
        let a = SessionId::new("sess_a");
        let b = SessionId::new("sess_b");
        session.update(&a, |p| p.theme = Some("light".into())).unwrap();
        assert_eq!(session.get(&b).unwrap(), None);
    }
}
