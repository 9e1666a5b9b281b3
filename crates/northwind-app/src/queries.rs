//! Fixed, parameterized queries behind each page.
//!
//! List queries bind `?1` to the fetch limit and `?2` to a zero offset.
//! Detail queries bind `?1` to the id taken from the path.

use northwind_db::{params, Db, DbError, Value};

use crate::models::*;

pub const CUSTOMERS: &str = "SELECT Id, CompanyName, ContactName, ContactTitle, Address, City, Region, PostalCode, Country, Phone, Fax \
     FROM Customer LIMIT ?1 OFFSET ?2";

pub const CUSTOMER: &str = "SELECT Id, CompanyName, ContactName, ContactTitle, Address, City, Region, PostalCode, Country, Phone, Fax \
     FROM Customer WHERE Id = ?1";

pub const PRODUCTS: &str = "SELECT Id, ProductName, SupplierId, CategoryId, QuantityPerUnit, UnitPrice, UnitsInStock, UnitsOnOrder, ReorderLevel, Discontinued \
     FROM Product LIMIT ?1 OFFSET ?2";

pub const PRODUCT: &str = "SELECT Product.Id, ProductName, SupplierId, CategoryId, QuantityPerUnit, UnitPrice, UnitsInStock, UnitsOnOrder, ReorderLevel, Discontinued, Supplier.CompanyName AS SupplierName \
     FROM Product, Supplier WHERE Product.Id = ?1 AND Supplier.Id = Product.SupplierId";

pub const SUPPLIERS: &str = "SELECT Id, CompanyName, ContactName, ContactTitle, Address, City, Region, PostalCode, Country, Phone, Fax, HomePage \
     FROM Supplier LIMIT ?1 OFFSET ?2";

pub const SUPPLIER: &str = "SELECT Id, CompanyName, ContactName, ContactTitle, Address, City, Region, PostalCode, Country, Phone, Fax, HomePage \
     FROM Supplier WHERE Id = ?1";

pub const EMPLOYEES: &str = "SELECT Id, LastName, FirstName, Title, TitleOfCourtesy, BirthDate, HireDate, Address, City, Region, PostalCode, Country, HomePhone, Extension, Photo, Notes, ReportsTo, PhotoPath \
     FROM Employee LIMIT ?1 OFFSET ?2";

pub const EMPLOYEE: &str = "SELECT Report.Id AS ReportId, Report.FirstName AS ReportFirstName, Report.LastName AS ReportLastName, \
     Employee.Id, Employee.LastName, Employee.FirstName, Employee.Title, Employee.TitleOfCourtesy, Employee.BirthDate, Employee.HireDate, \
     Employee.Address, Employee.City, Employee.Region, Employee.PostalCode, Employee.Country, Employee.HomePhone, Employee.Extension, \
     Employee.Photo, Employee.Notes, Employee.ReportsTo, Employee.PhotoPath \
     FROM Employee LEFT JOIN Employee AS Report ON Report.Id = Employee.ReportsTo WHERE Employee.Id = ?1";

pub const ORDERS: &str = "SELECT SUM(OrderDetail.UnitPrice * OrderDetail.Discount * OrderDetail.Quantity) AS TotalProductsDiscount, \
     SUM(OrderDetail.UnitPrice * OrderDetail.Quantity) AS TotalProductsPrice, SUM(OrderDetail.Quantity) AS TotalProductsItems, \
     COUNT(OrderDetail.OrderId) AS TotalProducts, \"Order\".Id, CustomerId, EmployeeId, OrderDate, RequiredDate, ShippedDate, ShipVia, \
     Freight, ShipName, ShipAddress, ShipCity, ShipRegion, ShipPostalCode, ShipCountry, ProductId \
     FROM \"Order\", OrderDetail WHERE OrderDetail.OrderId = \"Order\".Id \
     GROUP BY \"Order\".Id LIMIT ?1 OFFSET ?2";

pub const ORDER: &str = "SELECT Shipper.CompanyName AS ShipViaCompanyName, \
     SUM(OrderDetail.UnitPrice * OrderDetail.Discount * OrderDetail.Quantity) AS TotalProductsDiscount, \
     SUM(OrderDetail.UnitPrice * OrderDetail.Quantity) AS TotalProductsPrice, SUM(OrderDetail.Quantity) AS TotalProductsItems, \
     COUNT(OrderDetail.OrderId) AS TotalProducts, \"Order\".Id, CustomerId, EmployeeId, OrderDate, RequiredDate, ShippedDate, ShipVia, \
     Freight, ShipName, ShipAddress, ShipCity, ShipRegion, ShipPostalCode, ShipCountry, ProductId \
     FROM \"Order\", OrderDetail, Shipper \
     WHERE OrderDetail.OrderId = \"Order\".Id AND \"Order\".Id = ?1 AND \"Order\".ShipVia = Shipper.Id \
     GROUP BY \"Order\".Id";

pub const ORDER_PRODUCTS: &str = "SELECT OrderDetail.OrderId, OrderDetail.Quantity, OrderDetail.UnitPrice AS OrderUnitPrice, OrderDetail.Discount, \
     Product.Id, ProductName, SupplierId, CategoryId, QuantityPerUnit, Product.UnitPrice AS ProductUnitPrice, \
     UnitsInStock, UnitsOnOrder, ReorderLevel, Discontinued \
     FROM Product, OrderDetail WHERE OrderDetail.OrderId = ?1 AND OrderDetail.ProductId = Product.Id";

pub const SEARCH_PRODUCTS: &str = "SELECT Id, ProductName, SupplierId, CategoryId, QuantityPerUnit, UnitPrice, UnitsInStock, UnitsOnOrder, ReorderLevel, Discontinued \
     FROM Product WHERE ProductName LIKE ?2 LIMIT ?1";

pub const SEARCH_CUSTOMERS: &str = "SELECT Id, CompanyName, ContactName, ContactTitle, Address, City, Region, PostalCode, Country, Phone, Fax \
     FROM Customer WHERE CompanyName LIKE ?2 OR ContactName LIKE ?2 OR ContactTitle LIKE ?2 OR Address LIKE ?2 LIMIT ?1";

pub fn customers(db: &Db, limit: u32) -> Result<Vec<Customer>, DbError> {
    db.query_as(CUSTOMERS, params![limit, 0])
}

pub fn customer(db: &Db, id: &str) -> Result<Option<Customer>, DbError> {
    db.query_optional(CUSTOMER, params![id])
}

pub fn products(db: &Db, limit: u32) -> Result<Vec<Product>, DbError> {
    db.query_as(PRODUCTS, params![limit, 0])
}

pub fn product(db: &Db, id: &str) -> Result<Option<ProductDetail>, DbError> {
    db.query_optional(PRODUCT, params![id])
}

pub fn suppliers(db: &Db, limit: u32) -> Result<Vec<Supplier>, DbError> {
    db.query_as(SUPPLIERS, params![limit, 0])
}

pub fn supplier(db: &Db, id: &str) -> Result<Option<Supplier>, DbError> {
    db.query_optional(SUPPLIER, params![id])
}

pub fn employees(db: &Db, limit: u32) -> Result<Vec<Employee>, DbError> {
    db.query_as(EMPLOYEES, params![limit, 0])
}

pub fn employee(db: &Db, id: &str) -> Result<Option<EmployeeDetail>, DbError> {
    db.query_optional(EMPLOYEE, params![id])
}

pub fn orders(db: &Db, limit: u32) -> Result<Vec<OrderSummary>, DbError> {
    db.query_as(ORDERS, params![limit, 0])
}

/// Order summary and its product lines, fetched as one batch.
///
/// `None` when the summary query finds no order.
pub fn order(db: &Db, id: &str) -> Result<Option<OrderDetail>, DbError> {
    let by_id: &[Value] = params![id];
    let results = db.batch(&[(ORDER, by_id), (ORDER_PRODUCTS, by_id)])?;
    let (summary, lines) = match results.as_slice() {
        [summary, lines] => (summary, lines),
        _ => return Err(DbError::QueryError("order batch returned a partial result".to_string())),
    };

    let Some(order) = summary.deserialize_first::<OrderInfo>()? else {
        return Ok(None);
    };
    Ok(Some(OrderDetail {
        order,
        products: lines.deserialize_all()?,
    }))
}

/// Run a search, or return `None` without touching the database when the
/// query is empty.
pub fn search(
    db: &Db,
    query: Option<&str>,
    table: SearchTable,
    limit: u32,
) -> Result<Option<SearchResults>, DbError> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Ok(None);
    };
    let pattern = format!("%{}%", query);
    let results = match table {
        SearchTable::Products => {
            SearchResults::Products(db.query_as(SEARCH_PRODUCTS, params![limit, pattern])?)
        }
        SearchTable::Customers => {
            SearchResults::Customers(db.query_as(SEARCH_CUSTOMERS, params![limit, pattern])?)
        }
    };
    Ok(Some(results))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_list_queries_respect_limit() {
        let db = fixture::test_db();
        assert_eq!(customers(&db, 20).unwrap().len(), fixture::CUSTOMER_COUNT);
        assert_eq!(customers(&db, 3).unwrap().len(), 3);
        assert_eq!(products(&db, 20).unwrap().len(), fixture::PRODUCT_COUNT);
        assert_eq!(suppliers(&db, 20).unwrap().len(), fixture::SUPPLIER_COUNT);
        assert_eq!(employees(&db, 20).unwrap().len(), fixture::EMPLOYEE_COUNT);
        assert_eq!(orders(&db, 20).unwrap().len(), fixture::ORDER_COUNT);
    }

    #[test]
    fn test_customer_lookup() {
        let db = fixture::test_db();
        let alfki = customer(&db, "ALFKI").unwrap().unwrap();
        assert_eq!(alfki.company_name, "Alfreds Futterkiste");
        assert_eq!(alfki.region, None);
        assert!(customer(&db, "NOPE").unwrap().is_none());
    }

    #[test]
    fn test_product_joins_supplier() {
        let db = fixture::test_db();
        let chai = product(&db, "1").unwrap().unwrap();
        assert_eq!(chai.product.product_name, "Chai");
        assert_eq!(chai.supplier_name, "Exotic Liquids");
        assert!(product(&db, "999").unwrap().is_none());
    }

    #[test]
    fn test_employee_reports_to() {
        let db = fixture::test_db();
        let nancy = employee(&db, "1").unwrap().unwrap();
        assert_eq!(nancy.manager(), Some((2, "Andrew Fuller".to_string())));

        let andrew = employee(&db, "2").unwrap().unwrap();
        assert_eq!(andrew.manager(), None);
    }

    #[test]
    fn test_orders_are_aggregated() {
        let db = fixture::test_db();
        let orders = orders(&db, 20).unwrap();
        let first = orders.iter().find(|o| o.id == 10248).unwrap();
        assert_eq!(first.total_products, 3);
        assert_eq!(first.total_products_items, 27);
        assert!((first.total_products_price - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_detail_batch() {
        let db = fixture::test_db();
        let detail = order(&db, "10250").unwrap().unwrap();
        assert_eq!(detail.order.ship_via_company_name, "United Package");
        assert_eq!(detail.products.len(), 3);
        assert!((detail.order.summary.total_products_price - 1813.0).abs() < 1e-9);
        assert!((detail.order.summary.total_products_discount - 260.4).abs() < 1e-9);

        assert!(order(&db, "1").unwrap().is_none());
    }

    #[test]
    fn test_search() {
        let db = fixture::test_db();
        assert_eq!(search(&db, None, SearchTable::Products, 50).unwrap(), None);
        assert_eq!(search(&db, Some(""), SearchTable::Products, 50).unwrap(), None);

        let found = search(&db, Some("ch"), SearchTable::Products, 50).unwrap().unwrap();
        assert_eq!(found.len(), 4);

        let customers = search(&db, Some("owner"), SearchTable::Customers, 50).unwrap().unwrap();
        assert!(matches!(customers, SearchResults::Customers(ref rows) if rows.len() == 2));

        let none = search(&db, Some("zzz"), SearchTable::Customers, 50).unwrap().unwrap();
        assert!(none.is_empty());
    }
}
