//! Order list and detail.

use crate::models::{OrderDetail, OrderSummary};
use crate::views::*;

pub fn render_list(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return message("No orders...");
    }

    let rows: Vec<String> = orders
        .iter()
        .map(|o| {
            [
                cell("Id", &link(&format!("/order/{}", o.id), &o.id.to_string())),
                text_cell("Price", &money(o.total_products_price)),
                text_cell("Products", &o.total_products.to_string()),
                text_cell("Quantity", &o.total_products_items.to_string()),
                text_cell("Date", opt(&o.order_date)),
                text_cell("Name", &o.ship_name),
                text_cell("City", &o.ship_city),
                text_cell("Country", &o.ship_country),
            ]
            .concat()
        })
        .collect();

    table_card(
        "Orders",
        &["Id", "Total Price", "Products", "Quantity", "Shipped", "Ship Name", "City", "Country"],
        &rows,
    )
}

pub fn render_detail(detail: Option<&OrderDetail>) -> String {
    let Some(detail) = detail else {
        return message("Order not found");
    };
    let o = &detail.order.summary;

    let info = detail_card(
        "ballot",
        "Order information",
        &[
            field_link("Customer Id", &format!("/customer/{}", o.customer_id), &o.customer_id),
            field("Ship Name", &o.ship_name),
            field("Total Products", &o.total_products.to_string()),
            field("Total Quantity", &o.total_products_items.to_string()),
            field("Total Price", &money(o.total_products_price)),
            field("Total Discount", &money(o.total_products_discount)),
            field("Ship Via", &detail.order.ship_via_company_name),
            field("Freight", &money(o.freight)),
        ],
        &[
            field("Order Date", opt(&o.order_date)),
            field("Required Date", opt(&o.required_date)),
            field("Shipped Date", opt(&o.shipped_date)),
            field("Ship City", &o.ship_city),
            field("Ship Region", opt(&o.ship_region)),
            field("Ship Postal Code", opt(&o.ship_postal_code)),
            field("Ship Country", &o.ship_country),
        ],
        "",
    );

    let lines: Vec<String> = detail
        .products
        .iter()
        .map(|line| {
            [
                cell("Product", &link(&format!("/product/{}", line.id), &line.product_name)),
                text_cell("Quantity", &line.quantity.to_string()),
                text_cell("Order Price", &money(line.order_unit_price)),
                text_cell("Total Price", &money(line.total_price())),
                text_cell("Discount", &percent(line.discount)),
            ]
            .concat()
        })
        .collect();
    let products = table_card(
        "Products in Order",
        &["Product", "Quantity", "Order Price", "Total Price", "Discount"],
        &lines,
    );

    format!("{}{}{}", info, products, go_back("/orders"))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::{fixture, queries};

    #[test]
    fn test_list_totals() {
        let orders = queries::orders(&fixture::test_db(), 20).unwrap();
        let html = render_list(&orders);
        assert!(html.contains(r#"href="/order/10248">10248</a>"#));
        assert!(html.contains("$440.00"));
        assert!(render_list(&[]).contains("No orders..."));
    }

    #[test]
    fn test_detail_lines() {
        let order = queries::order(&fixture::test_db(), "10250").unwrap();
        let html = render_detail(order.as_ref());
        assert!(html.contains(r#"href="/customer/HANAR">HANAR</a>"#));
        assert!(html.contains("United Package"));
        assert!(html.contains("Products in Order"));
        assert!(html.contains("$1484.00"));
        assert!(html.contains("15%"));
        assert!(html.contains("$260.40"));
    }

    #[test]
    fn test_missing_order() {
        let order = queries::order(&fixture::test_db(), "42").unwrap();
        assert_eq!(render_detail(order.as_ref()), message("Order not found"));
    }
}
