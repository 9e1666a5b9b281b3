//! Render a page locally and show how it streams.

use std::time::Instant;

use anyhow::{bail, Context as _, Result};
use futures::channel::mpsc;
use futures::StreamExt;
use northwind_app::{App, Reply};
use northwind_core::{Method, RequestContext, TimingContext};
use northwind_db::Db;
use northwind_defer::{RequestSettings, TokioTimer};
use northwind_session::Cache;
use northwind_streaming::StreamingSink;

use super::RenderArgs;
use crate::context::Context;
use crate::output::format_bytes;

pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let db_path = ctx.db_path(args.db.as_deref());
    if !db_path.is_file() {
        bail!(
            "Database not found: {}. Run `northwind seed` first.",
            db_path.display()
        );
    }
    let db = Db::open(&db_path).with_context(|| format!("Failed to open {}", db_path.display()))?;

    let app = App::new(ctx.config.clone(), db, Cache::in_memory());
    let request_ctx = RequestContext::new(Method::Get, &args.path);
    let logger = app.logger(&request_ctx);

    let Reply::Page { mut request, .. } = app.handle(&request_ctx, &logger)? else {
        bail!("{} did not resolve to a page", args.path);
    };
    request.settings = RequestSettings::new(args.delay, args.defer);
    if request.status() == 404 {
        ctx.output.warn(&format!("No route matches {}", args.path));
    }

    ctx.output.debug(&format!("Database: {}", db_path.display()));
    ctx.output.info(&format!(
        "Rendering {} ({}, delay {}ms)",
        args.path,
        request.settings.mode().as_str(),
        request.settings.delay_ms
    ));

    let (tx, mut rx) = mpsc::unbounded::<Vec<u8>>();
    let started = Instant::now();

    // The sink is owned by this future so the channel closes when rendering ends.
    let render = async {
        let mut sink = StreamingSink::new(tx, TimingContext::new());
        app.stream(&request_ctx, &request, &mut sink, &TokioTimer, &logger)
            .await
    };
    let print = async {
        let mut chunks = 0usize;
        let mut bytes = 0usize;
        while let Some(chunk) = rx.next().await {
            ctx.output
                .chunk(chunks, started.elapsed(), &String::from_utf8_lossy(&chunk));
            chunks += 1;
            bytes += chunk.len();
        }
        (chunks, bytes)
    };

    let (result, (chunks, bytes)) = futures::join!(render, print);
    let metrics = result.context("Render failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&metrics);
        return Ok(());
    }

    ctx.output.success(&format!(
        "{} chunks, {} in {}ms",
        chunks,
        format_bytes(bytes as u64),
        started.elapsed().as_millis()
    ));
    ctx.output.header("Metrics");
    println!("{}", metrics.to_summary());
    Ok(())
}
