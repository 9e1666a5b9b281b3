//! Spin HTTP component serving the Northwind Traders browser.
//!
//! Every request opens the configured SQLite database and key-value store,
//! resolves the session and route through [`App`](northwind_app::App), and either answers the
//! settings action with a redirect or streams the page into the response
//! body. The artificial delay waits on WASI monotonic-clock pollables
//! registered with the Spin executor, which has no timer driver.

use anyhow::Context;
use northwind_app::AppConfig;
use northwind_core::{Method, RequestContext};

/// Config baked into the component.
const CONFIG: &str = include_str!("../northwind.toml");

/// The embedded configuration.
pub fn config() -> anyhow::Result<AppConfig> {
    AppConfig::from_toml(CONFIG).context("parsing embedded northwind.toml")
}

/// Build the request context from the parts of an incoming request.
///
/// Unknown methods are treated as GET.
pub fn request_context(
    method: &str,
    path_with_query: &str,
    headers: impl IntoIterator<Item = (String, Vec<u8>)>,
    body: Vec<u8>,
) -> RequestContext {
    let method = Method::parse(method).unwrap_or(Method::Get);
    headers
        .into_iter()
        .fold(RequestContext::new(method, path_with_query), |ctx, (name, value)| {
            ctx.with_header(&name, String::from_utf8_lossy(&value))
        })
        .with_body(body)
}

/// Response headers for a reply, plus the request id.
pub fn response_headers(reply: &northwind_app::Reply, ctx: &RequestContext) -> Vec<(String, Vec<u8>)> {
    reply
        .headers()
        .into_iter()
        .chain([("x-request-id".to_string(), ctx.request_id.to_string())])
        .map(|(name, value)| (name, value.into_bytes()))
        .collect()
}

#[cfg(target_arch = "wasm32")]
mod component {
    use anyhow::{anyhow, Context};
    use northwind_app::{App, Reply};
    use northwind_db::Db;
    use northwind_defer::{SpinTimer, WasiClock};
    use northwind_observability::StructuredLogger;
    use northwind_session::Cache;
    use northwind_streaming::StreamingSink;
    use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
    use spin_sdk::http_component;

    use super::*;

    #[http_component]
    async fn handle(req: IncomingRequest, response_out: ResponseOutparam) {
        let ctx = match read_request(req).await {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("northwind: {:#}", e);
                return send_status(response_out, 400);
            }
        };

        let app = match open_app() {
            Ok(app) => app,
            Err(e) => {
                eprintln!("northwind: {:#}", e);
                return send_status(response_out, 500);
            }
        };
        let logger = app.logger(&ctx);

        if let Err(e) = respond(&app, &ctx, &logger, response_out).await {
            logger
                .error_builder("request failed")
                .field("error", format!("{:#}", e))
                .emit();
        }
    }

    async fn read_request(req: IncomingRequest) -> anyhow::Result<RequestContext> {
        let method = method_name(&req.method());
        let path = req.path_with_query().unwrap_or_default();
        let headers = req.headers().entries();
        let body = req
            .into_body()
            .await
            .map_err(|e| anyhow!("reading request body: {:?}", e))?;
        Ok(request_context(method, &path, headers, body))
    }

    fn method_name(method: &spin_sdk::http::Method) -> &'static str {
        use spin_sdk::http::Method as M;
        match method {
            M::Post => "POST",
            M::Put => "PUT",
            M::Delete => "DELETE",
            M::Patch => "PATCH",
            M::Head => "HEAD",
            M::Options => "OPTIONS",
            _ => "GET",
        }
    }

    fn open_app() -> anyhow::Result<App> {
        let config = config()?;
        let db = Db::open(&config.database.name).context("opening database")?;
        let cache = Cache::open(&config.session.store).context("opening key-value store")?;
        Ok(App::new(config, db, cache))
    }

    fn build_response(status: u16, headers: &[(String, Vec<u8>)]) -> anyhow::Result<OutgoingResponse> {
        let fields = Fields::from_list(headers).map_err(|e| anyhow!("invalid headers: {:?}", e))?;
        let response = OutgoingResponse::new(fields);
        response
            .set_status_code(status)
            .map_err(|()| anyhow!("invalid status {}", status))?;
        Ok(response)
    }

    fn send_status(response_out: ResponseOutparam, status: u16) {
        match build_response(status, &[]) {
            Ok(response) => response_out.set(response),
            Err(e) => eprintln!("northwind: {:#}", e),
        }
    }

    async fn respond(
        app: &App,
        ctx: &RequestContext,
        logger: &StructuredLogger,
        response_out: ResponseOutparam,
    ) -> anyhow::Result<()> {
        let reply = match app.handle(ctx, logger) {
            Ok(reply) => reply,
            Err(e) => {
                send_status(response_out, 500);
                return Err(e.into());
            }
        };

        let response = match build_response(reply.status(), &response_headers(&reply, ctx)) {
            Ok(response) => response,
            Err(e) => {
                send_status(response_out, 500);
                return Err(e);
            }
        };
        let Reply::Page { request, .. } = reply else {
            response_out.set(response);
            return Ok(());
        };

        let body = response.take_body();
        response_out.set(response);
        let mut sink = StreamingSink::new(body, ctx.timing.clone());

        let metrics = app
            .stream(ctx, &request, &mut sink, &SpinTimer::new(WasiClock), logger)
            .await?;
        logger.debug(&metrics.to_summary());
        Ok(())
    }
}
