//! Per-request delay and load-mode settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store key holding the artificial delay.
pub const DELAY_KEY: &str = "delay";

/// Store key holding the defer flag.
pub const DEFER_KEY: &str = "defer";

/// Narrow read interface onto the settings store.
///
/// Values are raw JSON as written by the settings action; coercion into a
/// [`RequestSettings`] happens on read.
pub trait SettingsSource {
    /// Look up a raw stored value.
    fn get(&self, key: &str) -> Option<Value>;
}

/// How a page's data is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// The whole response waits for all data.
    Await,
    /// The shell is sent first and each region resolves independently.
    Defer,
}

impl LoadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Await => "await",
            Self::Defer => "defer",
        }
    }
}

/// Settings read once at the start of a page request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSettings {
    /// Minimum artificial delay before data is handed to the view.
    pub delay_ms: u64,
    /// Whether to stream (defer) instead of blocking (await).
    pub should_defer: bool,
}

impl RequestSettings {
    /// Create settings from already-coerced values.
    pub fn new(delay_ms: u64, should_defer: bool) -> Self {
        Self {
            delay_ms,
            should_defer,
        }
    }

    /// Load settings from a store, defaulting absent keys.
    pub fn load(source: &impl SettingsSource) -> Self {
        Self::from_values(
            source.get(DELAY_KEY).as_ref(),
            source.get(DEFER_KEY).as_ref(),
        )
    }

    /// Coerce raw stored values.
    pub fn from_values(delay: Option<&Value>, defer: Option<&Value>) -> Self {
        Self {
            delay_ms: delay.map(coerce_delay).unwrap_or(0),
            should_defer: defer.map(coerce_flag).unwrap_or(false),
        }
    }

    /// Parse the settings form fields.
    ///
    /// The delay is a free-text input and the defer radio submits `""` for
    /// await and `"1"` for defer.
    pub fn from_form(delay: Option<&str>, defer: Option<&str>) -> Self {
        Self {
            delay_ms: delay.map(parse_delay).unwrap_or(0),
            should_defer: defer.is_some_and(|d| !d.is_empty()),
        }
    }

    /// The delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The load mode these settings select.
    pub fn mode(&self) -> LoadMode {
        if self.should_defer {
            LoadMode::Defer
        } else {
            LoadMode::Await
        }
    }
}

/// Coerce a stored delay into whole milliseconds.
///
/// Numbers and numeric strings are accepted; fractional values truncate.
/// Negative, non-finite, non-numeric and non-scalar values become zero.
pub fn coerce_delay(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| clamp_millis(n.as_f64())),
        Value::String(s) => parse_delay(s),
        _ => 0,
    }
}

/// Coerce a stored flag using truthiness: `true`, non-zero numbers and
/// non-empty strings are true.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

fn parse_delay(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    clamp_millis(trimmed.parse::<f64>().ok())
}

fn clamp_millis(value: Option<f64>) -> u64 {
    match value {
        // `as` saturates at u64::MAX for out-of-range floats
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    struct MapSource(HashMap<String, Value>);

    impl SettingsSource for MapSource {
        fn get(&self, key: &str) -> Option<Value> {
            self.0.get(key).cloned()
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let settings = RequestSettings::load(&MapSource(HashMap::new()));
        assert_eq!(settings, RequestSettings::default());
        assert_eq!(settings.delay_ms, 0);
        assert!(!settings.should_defer);
        assert_eq!(settings.mode(), LoadMode::Await);
    }

    #[test]
    fn test_load_from_store() {
        let mut map = HashMap::new();
        map.insert(DELAY_KEY.to_string(), json!(250));
        map.insert(DEFER_KEY.to_string(), json!(true));
        let settings = RequestSettings::load(&MapSource(map));
        assert_eq!(settings, RequestSettings::new(250, true));
        assert_eq!(settings.delay(), Duration::from_millis(250));
        assert_eq!(settings.mode(), LoadMode::Defer);
    }

    #[test]
    fn test_delay_coercion() {
        assert_eq!(coerce_delay(&json!(100)), 100);
        assert_eq!(coerce_delay(&json!(12.9)), 12);
        assert_eq!(coerce_delay(&json!("300")), 300);
        assert_eq!(coerce_delay(&json!(" 40 ")), 40);
        assert_eq!(coerce_delay(&json!(-5)), 0);
        assert_eq!(coerce_delay(&json!("-5")), 0);
        assert_eq!(coerce_delay(&json!("abc")), 0);
        assert_eq!(coerce_delay(&json!("NaN")), 0);
        assert_eq!(coerce_delay(&json!(null)), 0);
        assert_eq!(coerce_delay(&json!(true)), 0);
        assert_eq!(coerce_delay(&json!([1])), 0);
        assert_eq!(coerce_delay(&json!("1e30")), u64::MAX);
    }

    #[test]
    fn test_flag_coercion() {
        assert!(coerce_flag(&json!(true)));
        assert!(!coerce_flag(&json!(false)));
        assert!(coerce_flag(&json!(1)));
        assert!(!coerce_flag(&json!(0)));
        assert!(coerce_flag(&json!("1")));
        assert!(!coerce_flag(&json!("")));
        assert!(!coerce_flag(&json!(null)));
    }

    #[test]
    fn test_from_form() {
        assert_eq!(
            RequestSettings::from_form(Some("500"), Some("1")),
            RequestSettings::new(500, true)
        );
        assert_eq!(
            RequestSettings::from_form(Some("oops"), Some("")),
            RequestSettings::new(0, false)
        );
        assert_eq!(
            RequestSettings::from_form(None, None),
            RequestSettings::default()
        );
    }
}
