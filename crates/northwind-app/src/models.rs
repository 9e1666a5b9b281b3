//! Row types for the Northwind tables.
//!
//! Field names follow the column names, so every struct deserializes
//! straight from a [`northwind_db::Row`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub id: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: String,
    pub fax: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Supplier {
    pub id: i64,
    pub company_name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: String,
    pub fax: Option<String>,
    pub home_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub supplier_id: i64,
    pub category_id: i64,
    pub quantity_per_unit: String,
    pub unit_price: f64,
    pub units_in_stock: i64,
    pub units_on_order: i64,
    pub reorder_level: i64,
    pub discontinued: i64,
}

/// A product with its supplier's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub supplier_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub title: String,
    pub title_of_courtesy: String,
    pub birth_date: String,
    pub hire_date: String,
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub home_phone: String,
    pub extension: String,
    pub notes: Option<String>,
    pub reports_to: Option<i64>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Initials used to seed the avatar, e.g. `N-D`.
    pub fn initials(&self) -> String {
        let first = |s: &str| s.chars().next().map(String::from).unwrap_or_default();
        format!("{}-{}", first(&self.first_name), first(&self.last_name))
    }
}

/// An employee with the name of the person they report to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub report_id: Option<i64>,
    pub report_first_name: Option<String>,
    pub report_last_name: Option<String>,
}

impl EmployeeDetail {
    /// Manager id and full name, when the employee reports to someone.
    pub fn manager(&self) -> Option<(i64, String)> {
        let id = self.report_id?;
        let name = match (&self.report_first_name, &self.report_last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => id.to_string(),
        };
        Some((id, name))
    }
}

/// An order with totals aggregated over its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: String,
    pub employee_id: i64,
    pub order_date: Option<String>,
    pub required_date: Option<String>,
    pub shipped_date: Option<String>,
    pub ship_via: i64,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: String,
    pub total_products_discount: f64,
    pub total_products_price: f64,
    pub total_products_items: i64,
    pub total_products: i64,
}

/// Order summary plus the shipper's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderInfo {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub ship_via_company_name: String,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderLine {
    pub order_id: i64,
    pub quantity: i64,
    pub order_unit_price: f64,
    pub discount: f64,
    /// Product id.
    pub id: i64,
    pub product_name: String,
    pub quantity_per_unit: String,
    pub product_unit_price: f64,
}

impl OrderLine {
    pub fn total_price(&self) -> f64 {
        self.order_unit_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: OrderInfo,
    pub products: Vec<OrderLine>,
}

/// Which table a search runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTable {
    #[default]
    Products,
    Customers,
}

impl SearchTable {
    /// Parse the `t` query parameter. Missing or empty means products;
    /// any other value than `products` searches customers.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("products") => Self::Products,
            Some(_) => Self::Customers,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchResults {
    Products(Vec<Product>),
    Customers(Vec<Customer>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            Self::Products(rows) => rows.len(),
            Self::Customers(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn employee_json() -> serde_json::Value {
        json!({
            "Id": 1, "LastName": "Davolio", "FirstName": "Nancy",
            "Title": "Sales Representative", "TitleOfCourtesy": "Ms.",
            "BirthDate": "1948-12-08", "HireDate": "1992-05-01",
            "Address": "507 - 20th Ave. E.", "City": "Seattle", "Region": "WA",
            "PostalCode": "98122", "Country": "USA", "HomePhone": "(206) 555-9857",
            "Extension": "5467", "Notes": null, "ReportsTo": 2, "PhotoPath": null,
            "ReportId": 2, "ReportFirstName": "Andrew", "ReportLastName": "Fuller"
        })
    }

    #[test]
    fn test_employee_detail_flattens() {
        let detail: EmployeeDetail = serde_json::from_value(employee_json()).unwrap();
        assert_eq!(detail.employee.full_name(), "Nancy Davolio");
        assert_eq!(detail.employee.initials(), "N-D");
        assert_eq!(detail.manager(), Some((2, "Andrew Fuller".to_string())));
    }

    #[test]
    fn test_employee_without_manager() {
        let mut value = employee_json();
        value["ReportId"] = json!(null);
        value["ReportFirstName"] = json!(null);
        value["ReportLastName"] = json!(null);
        let detail: EmployeeDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.manager(), None);
    }

    #[test]
    fn test_integer_prices_deserialize_as_float() {
        let product: Product = serde_json::from_value(json!({
            "Id": 1, "ProductName": "Chai", "SupplierId": 1, "CategoryId": 1,
            "QuantityPerUnit": "10 boxes x 20 bags", "UnitPrice": 18,
            "UnitsInStock": 39, "UnitsOnOrder": 0, "ReorderLevel": 10, "Discontinued": 0
        }))
        .unwrap();
        assert_eq!(product.unit_price, 18.0);
    }

    #[test]
    fn test_search_table_parse() {
        assert_eq!(SearchTable::parse(None), SearchTable::Products);
        assert_eq!(SearchTable::parse(Some("customers")), SearchTable::Customers);
        assert_eq!(SearchTable::parse(Some("")), SearchTable::Products);
        assert_eq!(SearchTable::parse(Some("products")), SearchTable::Products);
        assert_eq!(SearchTable::parse(Some("orders")), SearchTable::Customers);
        assert!(SearchResults::Customers(vec![]).is_empty());
    }
}
