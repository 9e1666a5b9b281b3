//! Per-request timing metrics.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use northwind_core::RequestId;
use serde::{Deserialize, Serialize};

/// Metrics for a single page request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Load mode the request ran in ("await" or "defer").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Artificial delay applied to the request.
    pub delay_ms: u64,
    /// Time to shell flush (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_shell_us: Option<u64>,
    /// Time to first region (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_region_us: Option<u64>,
    /// Total request duration (microseconds).
    pub total_duration_us: u64,
    pub regions: BTreeMap<String, RegionMetrics>,
    pub queries: BTreeMap<String, QueryMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Metrics for one rendered region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub name: String,
    /// Time from request start to region start (microseconds).
    pub start_us: u64,
    /// Time from request start to region sent (microseconds).
    pub sent_us: u64,
    pub duration_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// Whether the region was first sent as a loading placeholder.
    pub used_fallback: bool,
}

/// Metrics for one query behind a result entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// Result entry the query feeds.
    pub entry: String,
    pub duration_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Collector for request metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    request_id: RequestId,
    route: Option<String>,
    mode: Option<String>,
    delay_ms: u64,
    start: Instant,
    shell_sent: Option<Instant>,
    first_region_sent: Option<Instant>,
    regions: BTreeMap<String, RegionBuilder>,
    queries: BTreeMap<String, QueryMetrics>,
}

#[derive(Debug)]
struct RegionBuilder {
    start: Instant,
    sent: Option<Instant>,
    bytes: Option<usize>,
    used_fallback: bool,
}

fn micros(d: Duration) -> u64 {
    d.as_micros() as u64
}

impl MetricsCollector {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            mode: None,
            delay_ms: 0,
            start: Instant::now(),
            shell_sent: None,
            first_region_sent: None,
            regions: BTreeMap::new(),
            queries: BTreeMap::new(),
        }
    }

    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Record the settings the request ran with.
    pub fn set_settings(&mut self, mode: impl Into<String>, delay_ms: u64) {
        self.mode = Some(mode.into());
        self.delay_ms = delay_ms;
    }

    pub fn record_shell_sent(&mut self) {
        self.shell_sent = Some(Instant::now());
    }

    /// Record that a region started rendering (or was sent as a placeholder).
    pub fn record_region_start(&mut self, name: &str, used_fallback: bool) {
        self.regions.insert(
            name.to_string(),
            RegionBuilder {
                start: Instant::now(),
                sent: None,
                bytes: None,
                used_fallback,
            },
        );
    }

    /// Record that a region's final content was sent.
    pub fn record_region_sent(&mut self, name: &str, bytes: usize) {
        let now = Instant::now();
        self.first_region_sent.get_or_insert(now);

        let region = self
            .regions
            .entry(name.to_string())
            .or_insert(RegionBuilder {
                start: now,
                sent: None,
                bytes: None,
                used_fallback: false,
            });
        region.sent = Some(now);
        region.bytes = Some(bytes);
    }

    /// Record a query outcome.
    pub fn record_query(
        &mut self,
        entry: &str,
        duration: Duration,
        rows: Option<usize>,
        error: Option<String>,
    ) {
        self.queries.insert(
            entry.to_string(),
            QueryMetrics {
                entry: entry.to_string(),
                duration_us: micros(duration),
                rows,
                success: error.is_none(),
                error,
            },
        );
    }

    /// Finalize and return the metrics.
    pub fn finalize(self, status_code: Option<u16>) -> RequestMetrics {
        let now = Instant::now();
        let start = self.start;

        let regions = self
            .regions
            .into_iter()
            .map(|(name, builder)| {
                let sent = builder.sent.unwrap_or(now);
                let metrics = RegionMetrics {
                    name: name.clone(),
                    start_us: micros(builder.start.duration_since(start)),
                    sent_us: micros(sent.duration_since(start)),
                    duration_us: micros(sent.duration_since(builder.start)),
                    bytes: builder.bytes,
                    used_fallback: builder.used_fallback,
                };
                (name, metrics)
            })
            .collect();

        RequestMetrics {
            request_id: self.request_id.to_string(),
            route: self.route,
            mode: self.mode,
            delay_ms: self.delay_ms,
            time_to_shell_us: self.shell_sent.map(|t| micros(t.duration_since(start))),
            time_to_first_region_us: self
                .first_region_sent
                .map(|t| micros(t.duration_since(start))),
            total_duration_us: micros(now.duration_since(start)),
            regions,
            queries: self.queries,
            status_code,
        }
    }

    pub fn time_to_shell(&self) -> Option<Duration> {
        self.shell_sent.map(|t| t.duration_since(self.start))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl RequestMetrics {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let ms = |us: u64| us as f64 / 1000.0;
        let mut lines = Vec::new();

        lines.push(format!("Request: {}", self.request_id));
        if let Some(route) = &self.route {
            lines.push(format!("  Route: {}", route));
        }
        if let Some(mode) = &self.mode {
            lines.push(format!("  Mode: {} (delay {}ms)", mode, self.delay_ms));
        }
        if let Some(tts) = self.time_to_shell_us {
            lines.push(format!("  Time to shell: {:.2}ms", ms(tts)));
        }
        if let Some(ttfr) = self.time_to_first_region_us {
            lines.push(format!("  Time to first region: {:.2}ms", ms(ttfr)));
        }
        lines.push(format!("  Total: {:.2}ms", ms(self.total_duration_us)));

        if !self.regions.is_empty() {
            lines.push("  Regions:".to_string());
            for (name, region) in &self.regions {
                let fallback = if region.used_fallback { " [fallback]" } else { "" };
                lines.push(format!(
                    "    {}: sent at {:.2}ms{}",
                    name,
                    ms(region.sent_us),
                    fallback
                ));
            }
        }

        if !self.queries.is_empty() {
            lines.push("  Queries:".to_string());
            for query in self.queries.values() {
                let outcome = match (&query.error, query.rows) {
                    (Some(err), _) => format!("FAILED: {}", err),
                    (None, Some(rows)) => format!("{} rows", rows),
                    (None, None) => "ok".to_string(),
                };
                lines.push(format!(
                    "    {}: {:.2}ms - {}",
                    query.entry,
                    ms(query.duration_us),
                    outcome
                ));
            }
        }

        lines.join("\n")
    }
}
