//! Per-session settings store.

use std::collections::BTreeMap;

use northwind_defer::{RequestSettings, SettingsSource};
use serde_json::Value;

use crate::{CacheError, Session, SessionId};

/// Raw settings values for one session, keyed by setting name.
pub type SettingsMap = BTreeMap<String, Value>;

/// One session's settings, loaded once per request.
///
/// Reads come from the snapshot taken at load time; writes go through to
/// the session store and update the snapshot.
pub struct SettingsStore<'a> {
    session: &'a Session<SettingsMap>,
    id: SessionId,
    values: SettingsMap,
}

impl<'a> SettingsStore<'a> {
    pub fn load(session: &'a Session<SettingsMap>, id: SessionId) -> Result<Self, CacheError> {
        let values = session.get_or_default(&id)?;
        Ok(Self {
            session,
            id,
            values,
        })
    }

    /// Store a raw value.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), CacheError> {
        self.values.insert(key.to_string(), value);
        self.session.set(&self.id, self.values.clone())?;
        Ok(())
    }

    /// Coerced request settings.
    pub fn settings(&self) -> RequestSettings {
        RequestSettings::load(self)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.id
    }
}

impl SettingsSource for SettingsStore<'_> {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use northwind_defer::{DEFER_KEY, DELAY_KEY};
    use serde_json::json;

    use super::*;
    use crate::Cache;

    #[test]
    fn test_new_session_has_defaults() {
        let session = Session::new(Cache::in_memory());
        let store = SettingsStore::load(&session, SessionId::generate()).unwrap();
        assert_eq!(store.settings(), RequestSettings::default());
    }

    #[test]
    fn test_set_persists_across_loads() {
        let session = Session::new(Cache::in_memory());
        let id = SessionId::generate();

        let mut store = SettingsStore::load(&session, id.clone()).unwrap();
        store.set(DELAY_KEY, json!(300)).unwrap();
        store.set(DEFER_KEY, json!(true)).unwrap();
        assert_eq!(store.settings(), RequestSettings::new(300, true));

        let reloaded = SettingsStore::load(&session, id).unwrap();
        assert_eq!(reloaded.get(DELAY_KEY), Some(json!(300)));
        assert_eq!(reloaded.settings(), RequestSettings::new(300, true));
    }

    #[test]
    fn test_garbage_values_coerce_to_defaults() {
        let session = Session::new(Cache::in_memory());
        let mut store = SettingsStore::load(&session, SessionId::generate()).unwrap();
        store.set(DELAY_KEY, json!("soon")).unwrap();
        store.set(DEFER_KEY, json!("")).unwrap();
        assert_eq!(store.settings(), RequestSettings::default());
    }
}
