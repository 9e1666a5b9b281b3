//! A small Northwind dataset.
//!
//! Used by the CLI's `seed` command and by tests. Statements avoid `;`
//! inside literals so they also run through the Spin backend's batch split.

use northwind_db::{Db, DbError};

pub const CUSTOMER_COUNT: usize = 8;
pub const SUPPLIER_COUNT: usize = 4;
pub const PRODUCT_COUNT: usize = 8;
pub const EMPLOYEE_COUNT: usize = 5;
pub const ORDER_COUNT: usize = 4;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Customer (
    Id TEXT PRIMARY KEY, CompanyName TEXT, ContactName TEXT, ContactTitle TEXT,
    Address TEXT, City TEXT, Region TEXT, PostalCode TEXT, Country TEXT, Phone TEXT, Fax TEXT
);
CREATE TABLE IF NOT EXISTS Supplier (
    Id INTEGER PRIMARY KEY, CompanyName TEXT, ContactName TEXT, ContactTitle TEXT,
    Address TEXT, City TEXT, Region TEXT, PostalCode TEXT, Country TEXT, Phone TEXT, Fax TEXT, HomePage TEXT
);
CREATE TABLE IF NOT EXISTS Product (
    Id INTEGER PRIMARY KEY, ProductName TEXT, SupplierId INTEGER, CategoryId INTEGER,
    QuantityPerUnit TEXT, UnitPrice DECIMAL, UnitsInStock INTEGER, UnitsOnOrder INTEGER,
    ReorderLevel INTEGER, Discontinued INTEGER
);
CREATE TABLE IF NOT EXISTS Employee (
    Id INTEGER PRIMARY KEY, LastName TEXT, FirstName TEXT, Title TEXT, TitleOfCourtesy TEXT,
    BirthDate TEXT, HireDate TEXT, Address TEXT, City TEXT, Region TEXT, PostalCode TEXT,
    Country TEXT, HomePhone TEXT, Extension TEXT, Photo BLOB, Notes TEXT, ReportsTo INTEGER, PhotoPath TEXT
);
CREATE TABLE IF NOT EXISTS Shipper (
    Id INTEGER PRIMARY KEY, CompanyName TEXT, Phone TEXT
);
CREATE TABLE IF NOT EXISTS "Order" (
    Id INTEGER PRIMARY KEY, CustomerId TEXT, EmployeeId INTEGER, OrderDate TEXT, RequiredDate TEXT,
    ShippedDate TEXT, ShipVia INTEGER, Freight DECIMAL, ShipName TEXT, ShipAddress TEXT,
    ShipCity TEXT, ShipRegion TEXT, ShipPostalCode TEXT, ShipCountry TEXT
);
CREATE TABLE IF NOT EXISTS OrderDetail (
    Id TEXT PRIMARY KEY, OrderId INTEGER, ProductId INTEGER, UnitPrice DECIMAL,
    Quantity INTEGER, Discount DOUBLE
);
"#;

pub const DATA: &str = r#"
INSERT INTO Customer VALUES ('ALFKI', 'Alfreds Futterkiste', 'Maria Anders', 'Sales Representative', 'Obere Str. 57', 'Berlin', NULL, '12209', 'Germany', '030-0074321', '030-0076545');
INSERT INTO Customer VALUES ('ANATR', 'Ana Trujillo Emparedados y helados', 'Ana Trujillo', 'Owner', 'Avda. de la Constitución 2222', 'México D.F.', NULL, '05021', 'Mexico', '(5) 555-4729', '(5) 555-3745');
INSERT INTO Customer VALUES ('ANTON', 'Antonio Moreno Taquería', 'Antonio Moreno', 'Owner', 'Mataderos 2312', 'México D.F.', NULL, '05023', 'Mexico', '(5) 555-3932', NULL);
INSERT INTO Customer VALUES ('AROUT', 'Around the Horn', 'Thomas Hardy', 'Sales Representative', '120 Hanover Sq.', 'London', NULL, 'WA1 1DP', 'UK', '(171) 555-7788', '(171) 555-6750');
INSERT INTO Customer VALUES ('BERGS', 'Berglunds snabbköp', 'Christina Berglund', 'Order Administrator', 'Berguvsvägen 8', 'Luleå', NULL, 'S-958 22', 'Sweden', '0921-12 34 65', '0921-12 34 67');
INSERT INTO Customer VALUES ('HANAR', 'Hanari Carnes', 'Mario Pontes', 'Accounting Manager', 'Rua do Paço 67', 'Rio de Janeiro', 'RJ', '05454-876', 'Brazil', '(21) 555-0091', '(21) 555-8765');
INSERT INTO Customer VALUES ('TOMSP', 'Toms Spezialitäten', 'Karin Josephs', 'Marketing Manager', 'Luisenstr. 48', 'Münster', NULL, '44087', 'Germany', '0251-031259', '0251-035695');
INSERT INTO Customer VALUES ('VINET', 'Vins et alcools Chevalier', 'Paul Henriot', 'Accounting Manager', '59 rue de l''Abbaye', 'Reims', NULL, '51100', 'France', '26.47.15.10', '26.47.15.11');

INSERT INTO Supplier VALUES (1, 'Exotic Liquids', 'Charlotte Cooper', 'Purchasing Manager', '49 Gilbert St.', 'London', NULL, 'EC1 4SD', 'UK', '(171) 555-2222', NULL, NULL);
INSERT INTO Supplier VALUES (2, 'New Orleans Cajun Delights', 'Shelley Burke', 'Order Administrator', 'P.O. Box 78934', 'New Orleans', 'LA', '70117', 'USA', '(100) 555-4822', NULL, '#CAJUN.HTM#');
INSERT INTO Supplier VALUES (3, 'Grandma Kelly''s Homestead', 'Regina Murphy', 'Sales Representative', '707 Oxford Rd.', 'Ann Arbor', 'MI', '48104', 'USA', '(313) 555-5735', '(313) 555-3349', NULL);
INSERT INTO Supplier VALUES (4, 'Tokyo Traders', 'Yoshi Nagase', 'Marketing Manager', '9-8 Sekimai Musashino-shi', 'Tokyo', NULL, '100', 'Japan', '(03) 3555-5011', NULL, NULL);

INSERT INTO Product VALUES (1, 'Chai', 1, 1, '10 boxes x 20 bags', 18, 39, 0, 10, 0);
INSERT INTO Product VALUES (2, 'Chang', 1, 1, '24 - 12 oz bottles', 19, 17, 40, 25, 0);
INSERT INTO Product VALUES (3, 'Aniseed Syrup', 1, 2, '12 - 550 ml bottles', 10, 13, 70, 25, 0);
INSERT INTO Product VALUES (4, 'Chef Anton''s Cajun Seasoning', 2, 2, '48 - 6 oz jars', 22, 53, 0, 0, 0);
INSERT INTO Product VALUES (5, 'Chef Anton''s Gumbo Mix', 2, 2, '36 boxes', 21.35, 0, 0, 0, 1);
INSERT INTO Product VALUES (6, 'Grandma''s Boysenberry Spread', 3, 2, '12 - 8 oz jars', 25, 120, 0, 25, 0);
INSERT INTO Product VALUES (9, 'Mishi Kobe Niku', 4, 6, '18 - 500 g pkgs.', 97, 29, 0, 0, 1);
INSERT INTO Product VALUES (10, 'Ikura', 4, 8, '12 - 200 ml jars', 31, 31, 0, 0, 0);

INSERT INTO Employee VALUES (1, 'Davolio', 'Nancy', 'Sales Representative', 'Ms.', '1948-12-08', '1992-05-01', '507 - 20th Ave. E. Apt. 2A', 'Seattle', 'WA', '98122', 'USA', '(206) 555-9857', '5467', NULL, 'Education includes a BA in psychology from Colorado State University.', 2, 'http://accweb/emmployees/davolio.bmp');
INSERT INTO Employee VALUES (2, 'Fuller', 'Andrew', 'Vice President, Sales', 'Dr.', '1952-02-19', '1992-08-14', '908 W. Capital Way', 'Tacoma', 'WA', '98401', 'USA', '(206) 555-9482', '3457', NULL, 'Andrew received his BTS commercial and a Ph.D. in international marketing.', NULL, 'http://accweb/emmployees/fuller.bmp');
INSERT INTO Employee VALUES (3, 'Leverling', 'Janet', 'Sales Representative', 'Ms.', '1963-08-30', '1992-04-01', '722 Moss Bay Blvd.', 'Kirkland', 'WA', '98033', 'USA', '(206) 555-3412', '3355', NULL, 'Janet has a BS degree in chemistry from Boston College.', 2, 'http://accweb/emmployees/leverling.bmp');
INSERT INTO Employee VALUES (4, 'Peacock', 'Margaret', 'Sales Representative', 'Mrs.', '1937-09-19', '1993-05-03', '4110 Old Redmond Rd.', 'Redmond', 'WA', '98052', 'USA', '(206) 555-8122', '5176', NULL, 'Margaret holds a BA in English literature from Concordia College.', 2, 'http://accweb/emmployees/peacock.bmp');
INSERT INTO Employee VALUES (5, 'Buchanan', 'Steven', 'Sales Manager', 'Mr.', '1955-03-04', '1993-10-17', '14 Garrett Hill', 'London', NULL, 'SW1 8JR', 'UK', '(71) 555-4848', '3453', NULL, NULL, 2, 'http://accweb/emmployees/buchanan.bmp');

INSERT INTO Shipper VALUES (1, 'Speedy Express', '(503) 555-9831');
INSERT INTO Shipper VALUES (2, 'United Package', '(503) 555-3199');
INSERT INTO Shipper VALUES (3, 'Federal Shipping', '(503) 555-9931');

INSERT INTO "Order" VALUES (10248, 'VINET', 5, '1996-07-04', '1996-08-01', '1996-07-16', 3, 32.38, 'Vins et alcools Chevalier', '59 rue de l''Abbaye', 'Reims', NULL, '51100', 'France');
INSERT INTO "Order" VALUES (10249, 'TOMSP', 1, '1996-07-05', '1996-08-16', '1996-07-10', 1, 11.61, 'Toms Spezialitäten', 'Luisenstr. 48', 'Münster', NULL, '44087', 'Germany');
INSERT INTO "Order" VALUES (10250, 'HANAR', 4, '1996-07-08', '1996-08-05', '1996-07-12', 2, 65.83, 'Hanari Carnes', 'Rua do Paço 67', 'Rio de Janeiro', 'RJ', '05454-876', 'Brazil');
INSERT INTO "Order" VALUES (10251, 'ALFKI', 3, '1996-07-08', '1996-08-05', NULL, 1, 41.34, 'Alfreds Futterkiste', 'Obere Str. 57', 'Berlin', NULL, '12209', 'Germany');

INSERT INTO OrderDetail VALUES ('10248/1', 10248, 1, 14, 12, 0);
INSERT INTO OrderDetail VALUES ('10248/2', 10248, 2, 9.8, 10, 0);
INSERT INTO OrderDetail VALUES ('10248/10', 10248, 10, 34.8, 5, 0);
INSERT INTO OrderDetail VALUES ('10249/9', 10249, 9, 18.6, 9, 0);
INSERT INTO OrderDetail VALUES ('10249/3', 10249, 3, 42.4, 40, 0);
INSERT INTO OrderDetail VALUES ('10250/4', 10250, 4, 7.7, 10, 0);
INSERT INTO OrderDetail VALUES ('10250/6', 10250, 6, 42.4, 35, 0.15);
INSERT INTO OrderDetail VALUES ('10250/5', 10250, 5, 16.8, 15, 0.15);
INSERT INTO OrderDetail VALUES ('10251/1', 10251, 1, 16.8, 6, 0.05);
INSERT INTO OrderDetail VALUES ('10251/3', 10251, 3, 15.6, 15, 0.05);
"#;

const DROP: &str = r#"
DROP TABLE IF EXISTS OrderDetail;
DROP TABLE IF EXISTS "Order";
DROP TABLE IF EXISTS Shipper;
DROP TABLE IF EXISTS Employee;
DROP TABLE IF EXISTS Product;
DROP TABLE IF EXISTS Supplier;
DROP TABLE IF EXISTS Customer;
"#;

/// Create the tables and load the sample rows.
pub fn seed(db: &Db) -> Result<(), DbError> {
    db.execute_batch(SCHEMA)?;
    db.execute_batch(DATA)
}

/// Drop every Northwind table, then seed again.
pub fn reset(db: &Db) -> Result<(), DbError> {
    db.execute_batch(DROP)?;
    seed(db)
}

/// Whether the database already holds Northwind data.
pub fn is_seeded(db: &Db) -> Result<bool, DbError> {
    let tables = db.query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'Customer'",
        &[],
    )?;
    Ok(!tables.is_empty())
}

/// In-memory database holding the sample rows.
#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) fn test_db() -> Db {
    let db = Db::open_in_memory().expect("open in-memory database");
    seed(&db).expect("seed fixture");
    db
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_seed_then_reset() {
        let db = Db::open_in_memory().unwrap();
        assert!(!is_seeded(&db).unwrap());

        seed(&db).unwrap();
        assert!(is_seeded(&db).unwrap());
        // Seeding twice collides on primary keys.
        assert!(seed(&db).is_err());

        reset(&db).unwrap();
        let count = db.query("SELECT COUNT(*) AS n FROM Customer", &[]).unwrap();
        assert_eq!(
            count.first().and_then(|r| r.get("n")).and_then(|v| v.as_integer()),
            Some(CUSTOMER_COUNT as i64)
        );
    }
}
