use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body as AxumBody;
use axum::http::{Request, Response};
use tokio::{runtime::Handle, task};
use tower::Service;

use edgepage_core::response::IntoResponse;
use edgepage_core::router::RouterService;

use crate::request::into_core_request;
use crate::response::into_axum_response;

/// Tower service that feeds axum requests through an edgepage router.
///
/// Core handler futures are not `Send`, so each request is driven to completion on the current
/// worker thread with `block_in_place`. This requires the multi-threaded tokio runtime.
#[derive(Clone)]
pub struct EdgePageAxumService {
    router: RouterService,
}

impl EdgePageAxumService {
    pub fn new(router: RouterService) -> Self {
        Self { router }
    }
}

impl Service<Request<AxumBody>> for EdgePageAxumService {
    type Response = Response<AxumBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<AxumBody>) -> Self::Future {
        let router = self.router.clone();
        Box::pin(async move {
            let core_request = match into_core_request(request).await {
                Ok(request) => request,
                Err(err) => {
                    log::warn!("rejecting request: {err}");
                    return Ok(into_axum_response(err.into_response()));
                }
            };

            let core_response = task::block_in_place(move || {
                Handle::current().block_on(router.oneshot(core_request))
            });
            Ok(into_axum_response(core_response))
        })
    }
}
