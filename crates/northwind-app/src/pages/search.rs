//! Full-text-ish search over products and customers.

use northwind_streaming::escape_html;

use crate::models::{SearchResults, SearchTable};
use crate::views::*;

/// The search form. Rendered with the shell so it stays usable while
/// results load.
pub fn render_form(query: Option<&str>, table: SearchTable) -> String {
    let radio = |value: SearchTable, label: &str| {
        format!(
            r#"<label class="radio"><input type="radio" name="t" value="{}"{}><span class="check"></span><span class="control-label">{}</span></label>"#,
            value.as_str(),
            if value == table { " checked" } else { "" },
            label
        )
    };

    format!(
        r#"<div class="card mb-6"><header class="card-header"><p class="card-header-title"><span class="icon material-icons">search</span><span class="ml-2">Search Database</span></p></header><div class="card-content"><form method="GET" action="/search"><div class="field"><div class="control icons-left"><input class="input" type="text" name="q" placeholder="Enter keyword..." value="{}"></div></div><div class="field"><label class="label">Tables</label><div class="field-body"><div class="field grouped multiline">{}{}</div></div></div></form></div></div><p class="search-title">Search results</p>"#,
        escape_html(query.unwrap_or("")),
        radio(SearchTable::Products, "Products"),
        radio(SearchTable::Customers, "Customers"),
    )
}

/// Result rows, or "No results" when there was no query or no match.
pub fn render_results(results: Option<&SearchResults>) -> String {
    let rows: Vec<String> = match results {
        Some(SearchResults::Products(products)) => products
            .iter()
            .enumerate()
            .map(|(n, p)| {
                result_row(
                    &link(&format!("/product/{}", p.id), &p.product_name),
                    &format!(
                        "#{}, Quantity Per Unit: {}, Price: {}, Stock: {}",
                        n + 1,
                        p.quantity_per_unit,
                        money(p.unit_price),
                        p.units_in_stock
                    ),
                )
            })
            .collect(),
        Some(SearchResults::Customers(customers)) => customers
            .iter()
            .enumerate()
            .map(|(n, c)| {
                result_row(
                    &link(&format!("/customer/{}", c.id), &c.company_name),
                    &format!(
                        "#{}, Contact: {}, Title: {}, Phone: {}",
                        n + 1,
                        c.contact_name,
                        c.contact_title,
                        c.phone
                    ),
                )
            })
            .collect(),
        None => Vec::new(),
    };

    if rows.is_empty() {
        return message("No results");
    }
    rows.concat()
}

fn result_row(title_html: &str, details: &str) -> String {
    format!(
        r#"<div class="search-result"><p class="search-result-title">{}</p><p class="search-result-details">{}</p></div>"#,
        title_html,
        escape_html(details)
    )
}
