//! Create the sample database.

use anyhow::{bail, Context as _, Result};
use northwind_app::fixture;
use northwind_db::Db;

use super::SeedArgs;
use crate::context::Context;

pub fn run(args: SeedArgs, ctx: &Context) -> Result<()> {
    let path = ctx.db_path(args.db.as_deref());
    ctx.output.debug(&format!("Database: {}", path.display()));

    let db = Db::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let seeded = fixture::is_seeded(&db)?;
    if seeded && !args.force {
        bail!(
            "{} already holds Northwind data. Use --force to recreate it.",
            path.display()
        );
    }

    let spinner = ctx.output.spinner("Seeding Northwind tables...");
    let result = if seeded {
        fixture::reset(&db)
    } else {
        fixture::seed(&db)
    };
    spinner.finish_and_clear();
    result.context("Failed to seed database")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "path": path.display().to_string(),
            "customers": fixture::CUSTOMER_COUNT,
            "suppliers": fixture::SUPPLIER_COUNT,
            "products": fixture::PRODUCT_COUNT,
            "employees": fixture::EMPLOYEE_COUNT,
            "orders": fixture::ORDER_COUNT,
        }));
        return Ok(());
    }

    ctx.output.success(&format!("Seeded {}", path.display()));
    ctx.output.kv("customers", &fixture::CUSTOMER_COUNT.to_string());
    ctx.output.kv("suppliers", &fixture::SUPPLIER_COUNT.to_string());
    ctx.output.kv("products", &fixture::PRODUCT_COUNT.to_string());
    ctx.output.kv("employees", &fixture::EMPLOYEE_COUNT.to_string());
    ctx.output.kv("orders", &fixture::ORDER_COUNT.to_string());
    Ok(())
}
