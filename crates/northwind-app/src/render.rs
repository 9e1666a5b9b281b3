//! Streams a page: shell first, then regions in await or defer order.

use std::cell::RefCell;

use futures::{Sink, StreamExt};
use northwind_core::{GeoInfo, PageError};
use northwind_db::{Db, DbError};
use northwind_defer::{maybe_defer, settle_in_order, RequestSettings, ResultSet, Timer};
use northwind_observability::{MetricsCollector, StructuredLogger};
use northwind_streaming::{Region, RegionDelivery, StreamingSink};

use crate::config::QueryConfig;
use crate::pages::{render_entry, Page, PageData};
use crate::routes::Route;
use crate::views;

/// What to render for one page request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub route: Route,
    pub settings: RequestSettings,
    pub geo: GeoInfo,
    pub title: String,
    pub limits: QueryConfig,
}

impl PageRequest {
    pub fn status(&self) -> u16 {
        self.route.status()
    }

    fn delivery(&self) -> RegionDelivery {
        if self.settings.should_defer {
            RegionDelivery::OutOfOrder
        } else {
            RegionDelivery::InPlace
        }
    }
}

/// Render `request` into `sink`.
///
/// In await mode nothing is written until every entry has settled and the
/// delay has passed. In defer mode the shell goes out at once with a
/// placeholder per region, and each region follows as its entry settles.
pub async fn stream_page<S, E, Tm>(
    request: &PageRequest,
    db: &Db,
    sink: &mut StreamingSink<S, E>,
    timer: &Tm,
    logger: &StructuredLogger,
    metrics: &RefCell<MetricsCollector>,
) -> Result<(), PageError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: std::fmt::Display,
    Tm: Timer,
    Tm::Sleep: 'static,
{
    let settings = request.settings;
    let mode = settings.mode();
    {
        let mut metrics = metrics.borrow_mut();
        metrics.set_route(request.route.pattern());
        metrics.set_settings(mode.as_str(), settings.delay_ms);
    }
    logger
        .info_builder("page render started")
        .field("route", request.route.pattern())
        .field("mode", mode.as_str())
        .field_u64("delay_ms", settings.delay_ms)
        .emit();

    let page = Page::load(&request.route, &request.geo, db, request.limits, metrics);
    let delivery = request.delivery();
    let shell = views::shell(&request.title, &request.route, &settings, delivery);
    let regions: Vec<Region> = page.region.into_iter().collect();

    // Pages without a region load nothing, so the delay does not apply.
    let results = if regions.is_empty() {
        page.results
    } else {
        maybe_defer(settings, page.results, timer).await
    };

    let mut opening = shell.render_opening();
    opening.push_str(&page.before);
    if delivery == RegionDelivery::OutOfOrder {
        for region in &regions {
            opening.push_str(&region.render_placeholder());
        }
    }
    sink.send_shell(&opening).await?;
    metrics.borrow_mut().record_shell_sent();
    logger.debug("shell sent");

    match delivery {
        RegionDelivery::InPlace => {
            send_in_place(results, &regions, sink, logger, metrics).await?
        }
        RegionDelivery::OutOfOrder => {
            for region in &regions {
                metrics.borrow_mut().record_region_start(&region.name, true);
            }
            send_out_of_order(results, &regions, sink, logger, metrics).await?
        }
    }

    sink.finish(&shell.render_closing()).await?;
    logger
        .info_builder("page render complete")
        .field_u64("bytes", sink.bytes_sent() as u64)
        .field_u64("regions", sink.regions_sent().len() as u64)
        .duration_ms("duration_ms", sink.timing().elapsed())
        .emit();
    Ok(())
}

async fn send_in_place<S, E>(
    mut results: ResultSet<'_, PageData, DbError>,
    regions: &[Region],
    sink: &mut StreamingSink<S, E>,
    logger: &StructuredLogger,
    metrics: &RefCell<MetricsCollector>,
) -> Result<(), PageError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: std::fmt::Display,
{
    for region in regions {
        let Some(result) = results
            .take(&region.name)
            .and_then(|entry| entry.into_settled())
        else {
            logger
                .warn_builder("region has no settled entry")
                .field("region", region.name.as_str())
                .emit();
            continue;
        };
        log_settled(logger, &region.name, &result);

        metrics.borrow_mut().record_region_start(&region.name, false);
        let html = region.render_in_place(&render_entry(&region.name, &result));
        sink.send_region(&region.name, &html).await?;
        metrics.borrow_mut().record_region_sent(&region.name, html.len());
    }
    Ok(())
}

async fn send_out_of_order<S, E>(
    results: ResultSet<'_, PageData, DbError>,
    regions: &[Region],
    sink: &mut StreamingSink<S, E>,
    logger: &StructuredLogger,
    metrics: &RefCell<MetricsCollector>,
) -> Result<(), PageError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: std::fmt::Display,
{
    let mut settled = settle_in_order(results);
    while let Some((name, result)) = settled.next().await {
        log_settled(logger, &name, &result);
        let Some(region) = regions.iter().find(|r| r.name == name) else {
            continue;
        };

        let html = region.render_deferred(&render_entry(&name, &result));
        sink.send_region(&name, &html).await?;
        metrics.borrow_mut().record_region_sent(&name, html.len());
    }
    Ok(())
}

fn log_settled(logger: &StructuredLogger, name: &str, result: &Result<PageData, DbError>) {
    match result {
        Ok(data) => {
            let mut entry = logger.debug_builder("entry settled").field("entry", name);
            if let Some(rows) = data.rows() {
                entry = entry.field_u64("rows", rows as u64);
            }
            entry.emit();
        }
        Err(error) => logger
            .error_builder("entry failed")
            .field("entry", name)
            .field("error", error.to_string())
            .emit(),
    }
}
