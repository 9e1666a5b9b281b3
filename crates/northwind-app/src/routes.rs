//! The route table.

use northwind_core::{AppManifest, QueryParams, RouteConfig};

use crate::models::SearchTable;

/// A resolved page route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Dash,
    Customers,
    Customer(String),
    Products,
    Product(String),
    Suppliers,
    Supplier(String),
    Employees,
    Employee(String),
    Orders,
    Order(String),
    Search {
        query: Option<String>,
        table: SearchTable,
    },
    NotFound,
}

/// The full route table, as served by the component.
pub fn manifest() -> AppManifest {
    AppManifest::new("northwind", env!("CARGO_PKG_VERSION"))
        .with_route(RouteConfig::new("/", "Home"))
        .with_route(RouteConfig::new("/dash", "Dash"))
        .with_route(RouteConfig::new("/customers", "Customers").with_entry("customers"))
        .with_route(RouteConfig::new("/customer/:id", "Customer").with_entry("customer"))
        .with_route(RouteConfig::new("/products", "Products").with_entry("products"))
        .with_route(RouteConfig::new("/product/:id", "Product").with_entry("product"))
        .with_route(RouteConfig::new("/suppliers", "Suppliers").with_entry("suppliers"))
        .with_route(RouteConfig::new("/supplier/:id", "Supplier").with_entry("supplier"))
        .with_route(RouteConfig::new("/employees", "Employees").with_entry("employees"))
        .with_route(RouteConfig::new("/employee/:id", "Employee").with_entry("employee"))
        .with_route(RouteConfig::new("/orders", "Orders").with_entry("orders"))
        .with_route(RouteConfig::new("/order/:id", "Order").with_entry("order"))
        .with_route(RouteConfig::new("/search", "Search").with_entry("search"))
        .with_route(RouteConfig::new("/*", "Settings").with_methods(vec!["POST"]))
}

impl Route {
    /// Match a GET path against the route table.
    pub fn resolve(path: &str, query: &QueryParams) -> Self {
        let manifest = manifest();
        let matched = manifest
            .routes
            .iter()
            .filter(|r| r.methods.iter().any(|m| m == "GET"))
            .find_map(|r| r.match_path(path).map(|params| (r.page.as_str(), params)));

        let Some((page, params)) = matched else {
            return Self::NotFound;
        };
        let id = || {
            params
                .iter()
                .find(|(name, _)| name == "id")
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };

        match page {
            "Home" => Self::Home,
            "Dash" => Self::Dash,
            "Customers" => Self::Customers,
            "Customer" => Self::Customer(id()),
            "Products" => Self::Products,
            "Product" => Self::Product(id()),
            "Suppliers" => Self::Suppliers,
            "Supplier" => Self::Supplier(id()),
            "Employees" => Self::Employees,
            "Employee" => Self::Employee(id()),
            "Orders" => Self::Orders,
            "Order" => Self::Order(id()),
            "Search" => Self::Search {
                query: query.get("q").filter(|q| !q.is_empty()).cloned(),
                table: SearchTable::parse(query.get("t").map(String::as_str)),
            },
            _ => Self::NotFound,
        }
    }

    /// Name of the result entry this page loads, if any.
    pub fn entry_name(&self) -> Option<&'static str> {
        match self {
            Self::Home | Self::Dash | Self::NotFound => None,
            Self::Customers => Some("customers"),
            Self::Customer(_) => Some("customer"),
            Self::Products => Some("products"),
            Self::Product(_) => Some("product"),
            Self::Suppliers => Some("suppliers"),
            Self::Supplier(_) => Some("supplier"),
            Self::Employees => Some("employees"),
            Self::Employee(_) => Some("employee"),
            Self::Orders => Some("orders"),
            Self::Order(_) => Some("order"),
            Self::Search { .. } => Some("search"),
        }
    }

    /// The route pattern, used as the log and metrics route label.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Dash => "/dash",
            Self::Customers => "/customers",
            Self::Customer(_) => "/customer/:id",
            Self::Products => "/products",
            Self::Product(_) => "/product/:id",
            Self::Suppliers => "/suppliers",
            Self::Supplier(_) => "/supplier/:id",
            Self::Employees => "/employees",
            Self::Employee(_) => "/employee/:id",
            Self::Orders => "/orders",
            Self::Order(_) => "/order/:id",
            Self::Search { .. } => "/search",
            Self::NotFound => "*",
        }
    }

    /// Sidebar link highlighted for this page. Detail pages light up
    /// their list.
    pub fn nav_path(&self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::Dash => Some("/dash"),
            Self::Customers | Self::Customer(_) => Some("/customers"),
            Self::Products | Self::Product(_) => Some("/products"),
            Self::Suppliers | Self::Supplier(_) => Some("/suppliers"),
            Self::Employees | Self::Employee(_) => Some("/employees"),
            Self::Orders | Self::Order(_) => Some("/orders"),
            Self::Search { .. } => Some("/search"),
            Self::NotFound => None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            _ => 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Route {
        Route::resolve(path, &QueryParams::new())
    }

    #[test]
    fn test_static_and_detail_routes() {
        assert_eq!(resolve("/"), Route::Home);
        assert_eq!(resolve("/dash"), Route::Dash);
        assert_eq!(resolve("/orders"), Route::Orders);
        assert_eq!(resolve("/customer/ALFKI"), Route::Customer("ALFKI".to_string()));
        assert_eq!(resolve("/order/10248"), Route::Order("10248".to_string()));
        assert_eq!(resolve("/employee/3/"), Route::Employee("3".to_string()));
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(resolve("/customer"), Route::NotFound);
        assert_eq!(resolve("/categories"), Route::NotFound);
        assert_eq!(resolve("/order/1/lines"), Route::NotFound);
        assert_eq!(Route::NotFound.status(), 404);
    }

    #[test]
    fn test_search_params() {
        let mut query = QueryParams::new();
        assert_eq!(
            Route::resolve("/search", &query),
            Route::Search {
                query: None,
                table: SearchTable::Products
            }
        );

        query.insert("q".to_string(), "chai".to_string());
        query.insert("t".to_string(), "customers".to_string());
        assert_eq!(
            Route::resolve("/search", &query),
            Route::Search {
                query: Some("chai".to_string()),
                table: SearchTable::Customers
            }
        );

        query.insert("t".to_string(), "suppliers".to_string());
        assert!(matches!(
            Route::resolve("/search", &query),
            Route::Search {
                table: SearchTable::Customers,
                ..
            }
        ));

        query.insert("q".to_string(), String::new());
        assert!(matches!(
            Route::resolve("/search", &query),
            Route::Search { query: None, .. }
        ));
    }

    #[test]
    fn test_manifest_entries_match_routes() {
        for route in manifest().routes.iter().filter(|r| r.methods == ["GET"]) {
            let path = route.pattern.replace(":id", "1");
            let resolved = resolve(&path);
            assert_eq!(resolved.pattern(), route.pattern);
            assert_eq!(
                resolved.entry_name().map(String::from).into_iter().collect::<Vec<_>>(),
                route.entries
            );
        }
    }

    #[test]
    fn test_detail_pages_highlight_list() {
        assert_eq!(Route::Product("1".into()).nav_path(), Some("/products"));
        assert_eq!(Route::NotFound.nav_path(), None);
    }
}
