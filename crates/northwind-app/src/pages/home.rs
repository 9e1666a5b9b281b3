//! Static pages: welcome, dashboard and not found.

use northwind_core::GeoInfo;

use crate::views::*;

pub fn render_home() -> String {
    r#"<div class="card mb-6"><div class="card-content"><h1 class="title">Welcome to Northwind Traders</h1><p>This is a demo of a database-backed application running at the edge. Every page issues plain SQL against a SQLite copy of the Northwind sample database and renders the rows on the server.</p><p>Use the settings in the sidebar to add an artificial delay and to switch between waiting for all data before responding (await) and streaming the page shell first with each section filled in as its data arrives (defer).</p><p>Browse suppliers, products, orders, employees and customers from the sidebar, or search products and customers by keyword.</p></div></div>"#
        .to_string()
}

/// Where the request was served from, as reported by the edge headers.
pub fn render_dash(geo: &GeoInfo) -> String {
    let colo = geo.colo.as_deref().unwrap_or("unknown");
    let country = geo.country.as_deref().unwrap_or("country");
    detail_card(
        "display_settings",
        "Worker",
        &[field("Colo", colo)],
        &[field("Country", country)],
        "",
    )
}

pub fn render_not_found() -> String {
    format!("{}{}", message("Page not found"), go_back("/"))
}
