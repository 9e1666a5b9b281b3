//! Print the route table.

use anyhow::Result;
use northwind_app::manifest;

use crate::context::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let manifest = manifest();

    if ctx.output.is_json() {
        ctx.output.json(&manifest);
        return Ok(());
    }

    ctx.output.header(&format!("{} {}", manifest.name, manifest.version));
    let widths = [8, 16, 12, 10];
    ctx.output.table_row(&["METHOD", "PATH", "PAGE", "ENTRY"], &widths);
    for route in &manifest.routes {
        let methods = route.methods.join(",");
        let entries = if route.entries.is_empty() {
            "-".to_string()
        } else {
            route.entries.join(",")
        };
        ctx.output
            .table_row(&[&methods, &route.pattern, &route.page, &entries], &widths);
    }
    Ok(())
}
