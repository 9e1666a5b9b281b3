//! Request handling: sessions, the settings action and page dispatch.

use std::cell::RefCell;

use futures::Sink;
use northwind_core::{Method, PageError, RequestContext};
use northwind_db::Db;
use northwind_defer::{RequestSettings, Timer, DEFER_KEY, DELAY_KEY};
use northwind_observability::{MetricsCollector, RequestMetrics, StructuredLogger};
use northwind_session::{Cache, Session, SessionId, SettingsMap, SettingsStore};
use northwind_streaming::StreamingSink;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::render::{stream_page, PageRequest};
use crate::routes::Route;

/// What the handler decided to do with a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Settings were saved; send the browser back.
    Redirect {
        location: String,
        set_cookie: String,
    },
    /// A page to stream. `set_cookie` is present for new sessions.
    Page {
        request: PageRequest,
        set_cookie: Option<String>,
    },
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Redirect { .. } => 303,
            Self::Page { request, .. } => request.status(),
        }
    }

    /// Response headers, not counting any added by the transport.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        match self {
            Self::Redirect {
                location,
                set_cookie,
            } => {
                headers.push(("location".to_string(), location.clone()));
                headers.push(("set-cookie".to_string(), set_cookie.clone()));
            }
            Self::Page { set_cookie, .. } => {
                headers.push((
                    "content-type".to_string(),
                    "text/html; charset=utf-8".to_string(),
                ));
                if let Some(cookie) = set_cookie {
                    headers.push(("set-cookie".to_string(), cookie.clone()));
                }
            }
        }
        headers
    }
}

/// The application: config, database and session store.
pub struct App {
    config: AppConfig,
    db: Db,
    sessions: Session<SettingsMap>,
}

impl App {
    pub fn new(config: AppConfig, db: Db, cache: Cache) -> Self {
        Self {
            config,
            db,
            sessions: Session::new(cache),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// A logger for one request, configured from `[logging]`.
    pub fn logger(&self, ctx: &RequestContext) -> StructuredLogger {
        StructuredLogger::new(ctx.request_id.clone())
            .with_workload(self.config.app.workload.as_str())
            .with_route(ctx.path.as_str())
            .with_min_level(self.config.logging.level)
            .with_format(self.config.logging.format)
    }

    /// Resolve the session and decide how to answer.
    ///
    /// POST to any path is the settings action. Everything else is a page.
    pub fn handle(&self, ctx: &RequestContext, logger: &StructuredLogger) -> Result<Reply, AppError> {
        let cookie_name = self.config.session.cookie.as_str();
        let (session_id, is_new) = match ctx.cookie(cookie_name).and_then(SessionId::parse) {
            Some(id) => (id, false),
            None => (SessionId::generate(), true),
        };
        let mut store = SettingsStore::load(&self.sessions, session_id)?;

        if ctx.method == Method::Post {
            let form = ctx.form();
            let settings = RequestSettings::from_form(
                form.get(DELAY_KEY).map(String::as_str),
                form.get(DEFER_KEY).map(String::as_str),
            );
            store.set(DELAY_KEY, json!(settings.delay_ms))?;
            store.set(DEFER_KEY, json!(settings.should_defer))?;

            let location = redirect_target(ctx);
            logger
                .info_builder("settings saved")
                .field_u64("delay_ms", settings.delay_ms)
                .field_bool("defer", settings.should_defer)
                .field("location", location.as_str())
                .emit();
            return Ok(Reply::Redirect {
                location,
                set_cookie: store.session_id().cookie(cookie_name),
            });
        }

        let route = Route::resolve(&ctx.path, &ctx.query);
        if route == Route::NotFound {
            logger.warn_builder("no route").field("path", ctx.path.as_str()).emit();
        }

        Ok(Reply::Page {
            request: PageRequest {
                route,
                settings: store.settings(),
                geo: ctx.geo(),
                title: self.config.app.title.clone(),
                limits: self.config.queries,
            },
            set_cookie: is_new.then(|| store.session_id().cookie(cookie_name)),
        })
    }

    /// Stream a page and return the request's metrics.
    pub async fn stream<S, E, Tm>(
        &self,
        ctx: &RequestContext,
        request: &PageRequest,
        sink: &mut StreamingSink<S, E>,
        timer: &Tm,
        logger: &StructuredLogger,
    ) -> Result<RequestMetrics, PageError>
    where
        S: Sink<Vec<u8>, Error = E> + Unpin,
        E: std::fmt::Display,
        Tm: Timer,
        Tm::Sleep: 'static,
    {
        let metrics = RefCell::new(MetricsCollector::new(ctx.request_id.clone()));
        stream_page(request, &self.db, sink, timer, logger, &metrics).await?;
        Ok(metrics.into_inner().finalize(Some(request.status())))
    }
}

/// Path of the `Referer`, falling back to the request path.
fn redirect_target(ctx: &RequestContext) -> String {
    ctx.header("referer")
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| url.path().to_string())
        .unwrap_or_else(|| ctx.path.clone())
}
