use std::sync::Arc;

use async_trait::async_trait;
use web_time::Instant;

use crate::context::RequestContext;
use crate::error::EdgeError;
use crate::handler::DynHandler;
use crate::http::Response;

pub type BoxMiddleware = Arc<dyn Middleware>;

#[async_trait(?Send)]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, ctx: RequestContext, next: Next<'_>) -> Result<Response, EdgeError>;
}

/// Remainder of the middleware chain, ending in the matched handler.
pub struct Next<'a> {
    middlewares: &'a [BoxMiddleware],
    handler: &'a dyn DynHandler,
}

impl<'a> Next<'a> {
    pub fn new(middlewares: &'a [BoxMiddleware], handler: &'a dyn DynHandler) -> Self {
        Self {
            middlewares,
            handler,
        }
    }

    pub async fn run(self, ctx: RequestContext) -> Result<Response, EdgeError> {
        match self.middlewares.split_first() {
            Some((head, tail)) => head.handle(ctx, Next::new(tail, self.handler)).await,
            None => self.handler.call(ctx).await,
        }
    }
}

/// Logs one line per request with its outcome and latency.
pub struct RequestLogger;

#[async_trait(?Send)]
impl Middleware for RequestLogger {
    async fn handle(&self, ctx: RequestContext, next: Next<'_>) -> Result<Response, EdgeError> {
        let method = ctx.method().clone();
        let path = ctx.uri().path().to_string();
        let start = Instant::now();

        let result = next.run(ctx).await;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(response) => tracing::info!(
                "request method={} path={} status={} elapsed_ms={:.2}",
                method,
                path,
                response.status().as_u16(),
                elapsed
            ),
            Err(err) => tracing::error!(
                "request method={} path={} status={} error={} elapsed_ms={:.2}",
                method,
                path,
                err.status().as_u16(),
                err,
                elapsed
            ),
        }
        result
    }
}
