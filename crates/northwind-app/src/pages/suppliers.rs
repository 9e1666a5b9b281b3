//! Supplier list and detail.

use crate::models::Supplier;
use crate::views::*;

pub fn render_list(suppliers: &[Supplier]) -> String {
    if suppliers.is_empty() {
        return message("No suppliers...");
    }

    let rows: Vec<String> = suppliers
        .iter()
        .map(|s| {
            [
                avatar(&s.contact_name),
                cell("Company", &link(&format!("/supplier/{}", s.id), &s.company_name)),
                text_cell("Contact", &s.contact_name),
                text_cell("Title", &s.contact_title),
                text_cell("City", &s.city),
                text_cell("Country", &s.country),
            ]
            .concat()
        })
        .collect();

    table_card(
        "Suppliers",
        &["", "Company", "Contact", "Title", "City", "Country"],
        &rows,
    )
}

pub fn render_detail(supplier: Option<&Supplier>) -> String {
    let Some(s) = supplier else {
        return message("Supplier not found");
    };

    let mut right = vec![
        field("Region", opt(&s.region)),
        field("Postal Code", opt(&s.postal_code)),
        field("Country", &s.country),
        field("Phone", &s.phone),
    ];
    if let Some(fax) = &s.fax {
        right.push(field("Fax", fax));
    }
    if let Some(home_page) = &s.home_page {
        right.push(field("Home Page", home_page));
    }

    detail_card(
        "ballot",
        "Supplier information",
        &[
            field("Company Name", &s.company_name),
            field("Contact Name", &s.contact_name),
            field("Contact Title", &s.contact_title),
            field("Address", &s.address),
            field("City", &s.city),
        ],
        &right,
        &go_back("/suppliers"),
    )
}
