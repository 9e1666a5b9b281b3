//! Customer list and detail.

use crate::models::Customer;
use crate::views::*;

pub fn render_list(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return message("No customers...");
    }

    let rows: Vec<String> = customers
        .iter()
        .map(|c| {
            [
                avatar(&c.contact_name),
                cell("Company", &link(&format!("/customer/{}", c.id), &c.company_name)),
                text_cell("Contact", &c.contact_name),
                text_cell("Title", &c.contact_title),
                text_cell("City", &c.city),
                text_cell("Country", &c.country),
            ]
            .concat()
        })
        .collect();

    table_card(
        "Customers",
        &["", "Company", "Contact", "Title", "City", "Country"],
        &rows,
    )
}

pub fn render_detail(customer: Option<&Customer>) -> String {
    let Some(c) = customer else {
        return message("Customer not found");
    };

    detail_card(
        "ballot",
        "Customer information",
        &[
            field("Company Name", &c.company_name),
            field("Contact Name", &c.contact_name),
            field("Contact Title", &c.contact_title),
            field("Address", &c.address),
            field("City", &c.city),
        ],
        &[
            field("Postal Code", opt(&c.postal_code)),
            field("Region", opt(&c.region)),
            field("Country", &c.country),
            field("Phone", &c.phone),
            field("Fax", opt(&c.fax)),
        ],
        &go_back("/customers"),
    )
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::{fixture, queries};

    #[test]
    fn test_list_links_to_detail() {
        let customers = queries::customers(&fixture::test_db(), 20).unwrap();
        let html = render_list(&customers);
        assert!(html.contains(r#"<a class="link" href="/customer/ALFKI">Alfreds Futterkiste</a>"#));
        assert!(html.contains("initials/Maria-Anders.svg"));
        assert_eq!(html.matches("<tr>").count(), customers.len() + 1);
    }

    #[test]
    fn test_empty_and_missing_differ() {
        assert!(render_list(&[]).contains("No customers..."));
        assert!(render_detail(None).contains("Customer not found"));
    }

    #[test]
    fn test_detail_fields() {
        let customer = queries::customer(&fixture::test_db(), "VINET").unwrap();
        let html = render_detail(customer.as_ref());
        assert!(html.contains("Customer information"));
        assert!(html.contains("59 rue de l&#x27;Abbaye"));
        assert!(html.contains(r#"href="/customers">Go back"#));
    }
}
