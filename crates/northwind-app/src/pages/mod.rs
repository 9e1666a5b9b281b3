//! Page loaders and renderers.
//!
//! Each route resolves to a [`Page`]: static markup rendered with the shell,
//! at most one region, and the result set that fills it. Queries run inside
//! pending entries so the orchestrator decides when they are awaited.

pub mod customers;
pub mod employees;
pub mod home;
pub mod orders;
pub mod products;
pub mod search;
pub mod suppliers;

use std::cell::RefCell;
use std::time::Instant;

use northwind_core::GeoInfo;
use northwind_db::{Db, DbError};
use northwind_defer::{Entry, ResultSet};
use northwind_observability::MetricsCollector;
use northwind_streaming::{loading_card, Region};

use crate::config::QueryConfig;
use crate::models::*;
use crate::queries;
use crate::routes::Route;
use crate::views::error_card;

/// Payload of a page entry. Every route loads exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    Customers(Vec<Customer>),
    Customer(Option<Customer>),
    Products(Vec<Product>),
    Product(Option<ProductDetail>),
    Suppliers(Vec<Supplier>),
    Supplier(Option<Supplier>),
    Employees(Vec<Employee>),
    Employee(Option<EmployeeDetail>),
    Orders(Vec<OrderSummary>),
    Order(Option<OrderDetail>),
    Search(Option<SearchResults>),
}

impl PageData {
    /// Number of rows loaded, for query metrics.
    pub fn rows(&self) -> Option<usize> {
        Some(match self {
            Self::Customers(rows) => rows.len(),
            Self::Products(rows) => rows.len(),
            Self::Suppliers(rows) => rows.len(),
            Self::Employees(rows) => rows.len(),
            Self::Orders(rows) => rows.len(),
            Self::Customer(row) => usize::from(row.is_some()),
            Self::Product(row) => usize::from(row.is_some()),
            Self::Supplier(row) => usize::from(row.is_some()),
            Self::Employee(row) => usize::from(row.is_some()),
            Self::Order(detail) => detail.as_ref().map_or(0, |d| d.products.len() + 1),
            Self::Search(results) => return results.as_ref().map(SearchResults::len),
        })
    }

    pub fn render(&self) -> String {
        match self {
            Self::Customers(rows) => customers::render_list(rows),
            Self::Customer(row) => customers::render_detail(row.as_ref()),
            Self::Products(rows) => products::render_list(rows),
            Self::Product(row) => products::render_detail(row.as_ref()),
            Self::Suppliers(rows) => suppliers::render_list(rows),
            Self::Supplier(row) => suppliers::render_detail(row.as_ref()),
            Self::Employees(rows) => employees::render_list(rows),
            Self::Employee(row) => employees::render_detail(row.as_ref()),
            Self::Orders(rows) => orders::render_list(rows),
            Self::Order(detail) => orders::render_detail(detail.as_ref()),
            Self::Search(results) => search::render_results(results.as_ref()),
        }
    }
}

/// Render a settled entry, or the error card for a failed one.
pub fn render_entry(name: &str, result: &Result<PageData, DbError>) -> String {
    match result {
        Ok(data) => data.render(),
        Err(_) => error_card(name),
    }
}

/// Everything needed to stream one page.
pub struct Page<'a> {
    /// Markup sent with the shell, ahead of the region.
    pub before: String,
    pub region: Option<Region>,
    pub results: ResultSet<'a, PageData, DbError>,
}

impl<'a> Page<'a> {
    fn fixed(html: String) -> Self {
        Self {
            before: html,
            region: None,
            results: ResultSet::new(),
        }
    }

    /// Build the page for a route. No query runs until the entries are
    /// polled.
    pub fn load(
        route: &Route,
        geo: &GeoInfo,
        db: &'a Db,
        limits: QueryConfig,
        metrics: &'a RefCell<MetricsCollector>,
    ) -> Self {
        let list = limits.list_limit;
        let (before, entry) = match route.clone() {
            Route::Home => return Self::fixed(home::render_home()),
            Route::Dash => return Self::fixed(home::render_dash(geo)),
            Route::NotFound => return Self::fixed(home::render_not_found()),
            Route::Customers => (
                String::new(),
                query("customers", metrics, move || {
                    queries::customers(db, list).map(PageData::Customers)
                }),
            ),
            Route::Customer(id) => (
                String::new(),
                query("customer", metrics, move || {
                    queries::customer(db, &id).map(PageData::Customer)
                }),
            ),
            Route::Products => (
                String::new(),
                query("products", metrics, move || {
                    queries::products(db, list).map(PageData::Products)
                }),
            ),
            Route::Product(id) => (
                String::new(),
                query("product", metrics, move || {
                    queries::product(db, &id).map(PageData::Product)
                }),
            ),
            Route::Suppliers => (
                String::new(),
                query("suppliers", metrics, move || {
                    queries::suppliers(db, list).map(PageData::Suppliers)
                }),
            ),
            Route::Supplier(id) => (
                String::new(),
                query("supplier", metrics, move || {
                    queries::supplier(db, &id).map(PageData::Supplier)
                }),
            ),
            Route::Employees => (
                String::new(),
                query("employees", metrics, move || {
                    queries::employees(db, list).map(PageData::Employees)
                }),
            ),
            Route::Employee(id) => (
                String::new(),
                query("employee", metrics, move || {
                    queries::employee(db, &id).map(PageData::Employee)
                }),
            ),
            Route::Orders => (
                String::new(),
                query("orders", metrics, move || {
                    queries::orders(db, list).map(PageData::Orders)
                }),
            ),
            Route::Order(id) => (
                String::new(),
                query("order", metrics, move || {
                    queries::order(db, &id).map(PageData::Order)
                }),
            ),
            Route::Search { query: None, table } => (
                search::render_form(None, table),
                Entry::Ready(PageData::Search(None)),
            ),
            Route::Search {
                query: Some(q),
                table,
            } => {
                let limit = limits.search_limit;
                let form = search::render_form(Some(&q), table);
                (
                    form,
                    query("search", metrics, move || {
                        queries::search(db, Some(&q), table, limit).map(PageData::Search)
                    }),
                )
            }
        };

        let Some(name) = route.entry_name() else {
            return Self::fixed(before);
        };
        Self {
            before,
            region: Some(region_for(name)),
            results: ResultSet::new().with(name, entry),
        }
    }
}

fn region_for(name: &str) -> Region {
    let region = Region::new(name);
    match name {
        "search" => region.with_fallback(loading_card("Loading...")),
        _ => region,
    }
}

/// A pending entry that runs `run` when first polled and records its
/// timing and outcome.
fn query<'a, F>(
    name: &'static str,
    metrics: &'a RefCell<MetricsCollector>,
    run: F,
) -> Entry<'a, PageData, DbError>
where
    F: FnOnce() -> Result<PageData, DbError> + 'a,
{
    Entry::pending(async move {
        let started = Instant::now();
        let result = run();
        metrics.borrow_mut().record_query(
            name,
            started.elapsed(),
            result.as_ref().ok().and_then(PageData::rows),
            result.as_ref().err().map(ToString::to_string),
        );
        result
    })
}
