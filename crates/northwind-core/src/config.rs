//! Route table description.

use serde::{Deserialize, Serialize};

/// Configuration for a single route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Route pattern (e.g., "/customer/:id").
    pub pattern: String,
    /// Human readable page name.
    pub page: String,
    /// Names of the result entries the page loads.
    #[serde(default)]
    pub entries: Vec<String>,
    /// HTTP methods this route accepts.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

impl RouteConfig {
    /// Create a new route configuration.
    pub fn new(pattern: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            page: page.into(),
            entries: Vec::new(),
            methods: default_methods(),
        }
    }

    /// Declare an entry loaded by this route.
    pub fn with_entry(mut self, name: impl Into<String>) -> Self {
        self.entries.push(name.into());
        self
    }

    /// Set allowed HTTP methods.
    pub fn with_methods(mut self, methods: Vec<&str>) -> Self {
        self.methods = methods.into_iter().map(String::from).collect();
        self
    }

    /// Match a concrete path against this pattern, returning named params.
    ///
    /// Segments starting with `:` capture one path segment.
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let pattern: Vec<&str> = self.pattern.split('/').filter(|s| !s.is_empty()).collect();
        let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = Vec::new();
        for (p, a) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = p.strip_prefix(':') {
                params.push((name.to_string(), a.to_string()));
            } else if p != a {
                return None;
            }
        }
        Some(params)
    }
}

/// Application manifest: the full route table of a deployable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppManifest {
    /// Unique name for this application.
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// Routes this application handles.
    pub routes: Vec<RouteConfig>,
}

impl AppManifest {
    /// Create a new manifest.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            routes: Vec::new(),
        }
    }

    /// Add a route.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_static_path() {
        let route = RouteConfig::new("/customers", "Customers");
        assert_eq!(route.match_path("/customers"), Some(vec![]));
        assert_eq!(route.match_path("/customers/"), Some(vec![]));
        assert!(route.match_path("/customer").is_none());
    }

    #[test]
    fn test_match_param_path() {
        let route = RouteConfig::new("/customer/:id", "Customer");
        let params = route.match_path("/customer/ALFKI").unwrap();
        assert_eq!(params, vec![("id".to_string(), "ALFKI".to_string())]);
        assert!(route.match_path("/customer").is_none());
        assert!(route.match_path("/customer/ALFKI/orders").is_none());
    }

    #[test]
    fn test_root_matches_only_root() {
        let route = RouteConfig::new("/", "Home");
        assert_eq!(route.match_path("/"), Some(vec![]));
        assert!(route.match_path("/dash").is_none());
    }

    #[test]
    fn test_manifest_builder() {
        let manifest = AppManifest::new("northwind", "0.1.0")
            .with_route(RouteConfig::new("/orders", "Orders").with_entry("orders"));
        assert_eq!(manifest.routes.len(), 1);
        assert_eq!(manifest.routes[0].entries, vec!["orders".to_string()]);
        assert_eq!(manifest.routes[0].methods, vec!["GET".to_string()]);
    }
}
