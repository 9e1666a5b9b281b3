//! Product list and detail.

use crate::models::{Product, ProductDetail};
use crate::views::*;

pub fn render_list(products: &[Product]) -> String {
    if products.is_empty() {
        return message("No products...");
    }

    let rows: Vec<String> = products
        .iter()
        .map(|p| {
            [
                cell("Name", &link(&format!("/product/{}", p.id), &p.product_name)),
                text_cell("Qt per unit", &p.quantity_per_unit),
                text_cell("Price", &money(p.unit_price)),
                text_cell("Stock", &p.units_in_stock.to_string()),
                text_cell("Orders", &p.units_on_order.to_string()),
            ]
            .concat()
        })
        .collect();

    table_card(
        "Products",
        &["Name", "Qt per unit", "Price", "Stock", "Orders"],
        &rows,
    )
}

pub fn render_detail(detail: Option<&ProductDetail>) -> String {
    let Some(detail) = detail else {
        return message("Product not found");
    };
    let p = &detail.product;

    detail_card(
        "ballot",
        "Product information",
        &[
            field("Product Name", &p.product_name),
            field_link(
                "Supplier",
                &format!("/supplier/{}", p.supplier_id),
                &detail.supplier_name,
            ),
            field("Quantity Per Unit", &p.quantity_per_unit),
            field("Unit Price", &money(p.unit_price)),
        ],
        &[
            field("Units In Stock", &p.units_in_stock.to_string()),
            field("Units In Order", &p.units_on_order.to_string()),
            field("Reorder Level", &p.reorder_level.to_string()),
            field("Discontinued", &p.discontinued.to_string()),
        ],
        &go_back("/products"),
    )
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::{fixture, queries};

    #[test]
    fn test_list_formats_prices() {
        let products = queries::products(&fixture::test_db(), 20).unwrap();
        let html = render_list(&products);
        assert!(html.contains(r#"href="/product/1">Chai</a>"#));
        assert!(html.contains("$21.35"));
        assert!(html.contains("$18.00"));
    }

    #[test]
    fn test_detail_links_supplier() {
        let chai = queries::product(&fixture::test_db(), "1").unwrap();
        let html = render_detail(chai.as_ref());
        assert!(html.contains(r#"<a class="link" href="/supplier/1">Exotic Liquids</a>"#));
        assert!(html.contains(r#"href="/products">Go back"#));
        assert!(render_detail(None).contains("Product not found"));
        assert!(render_list(&[]).contains("No products..."));
    }
}
