use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use matchit::Router as PathRouter;
use tower_service::Service;

use crate::context::RequestContext;
use crate::error::EdgeError;
use crate::handler::{BoxHandler, DynHandler, IntoHandler};
use crate::http::{HandlerFuture, Method, Request, Response};
use crate::middleware::{BoxMiddleware, Middleware, Next};
use crate::response::IntoResponse;

#[derive(Clone, Debug)]
pub struct RouteInfo {
    method: Method,
    path: String,
}

impl RouteInfo {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Default)]
pub struct RouterBuilder {
    routes: HashMap<Method, PathRouter<BoxHandler>>,
    fallback: Option<BoxHandler>,
    middlewares: Vec<BoxMiddleware>,
    route_info: Vec<RouteInfo>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<H>(mut self, path: &str, method: Method, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.add_route(path, method, handler.into_handler());
        self
    }

    pub fn get<H>(self, path: &str, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.route(path, Method::GET, handler)
    }

    pub fn post<H>(self, path: &str, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.route(path, Method::POST, handler)
    }

    /// Handler used for every request that no explicit route matches, whatever its method or
    /// path. Only one fallback can be registered.
    pub fn fallback<H>(mut self, handler: H) -> Self
    where
        H: IntoHandler,
    {
        assert!(
            self.fallback.is_none(),
            "only one fallback handler is supported"
        );
        self.fallback = Some(handler.into_handler());
        self
    }

    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> RouterService {
        RouterService {
            inner: Arc::new(RouterInner {
                routes: self.routes,
                fallback: self.fallback,
                middlewares: self.middlewares,
                route_index: Arc::new(self.route_info),
            }),
        }
    }

    fn add_route(&mut self, path: &str, method: Method, handler: BoxHandler) {
        self.routes
            .entry(method.clone())
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|err| panic!("duplicate route definition for {}: {}", path, err));

        self.route_info.push(RouteInfo::new(method, path));
    }
}

#[derive(Clone)]
pub struct RouterService {
    inner: Arc<RouterInner>,
}

impl RouterService {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        (*self.inner.route_index).clone()
    }

    pub fn has_fallback(&self) -> bool {
        self.inner.fallback.is_some()
    }

    /// Dispatch a request and convert any handler error into its HTTP error response.
    ///
    /// This is the last stop for failures that handlers propagate: adapters call `oneshot`, so an
    /// unhandled error always reaches the client as a JSON error body with the error's status.
    pub async fn oneshot(&self, request: Request) -> Response {
        let mut service = self.clone();
        match service.call(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("unhandled error status={} {}", err.status().as_u16(), err);
                err.into_response()
            }
        }
    }
}

struct RouterInner {
    routes: HashMap<Method, PathRouter<BoxHandler>>,
    fallback: Option<BoxHandler>,
    middlewares: Vec<BoxMiddleware>,
    route_index: Arc<Vec<RouteInfo>>,
}

enum RouteMatch<'a> {
    Found(&'a dyn DynHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl RouterInner {
    async fn dispatch(&self, request: Request) -> Result<Response, EdgeError> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let (handler, params) = match (self.find_route(&method, &path), self.fallback.as_deref()) {
            (RouteMatch::Found(handler, params), _) => (handler, params),
            (_, Some(fallback)) => (fallback, HashMap::new()),
            (RouteMatch::MethodNotAllowed(allowed), None) => {
                return Err(EdgeError::method_not_allowed(&method, &allowed))
            }
            (RouteMatch::NotFound, None) => return Err(EdgeError::not_found(path)),
        };

        let ctx = RequestContext::with_params(request, params);
        Next::new(&self.middlewares, handler).run(ctx).await
    }

    fn find_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        if let Some(router) = self.routes.get(method) {
            if let Ok(matched) = router.at(path) {
                let params = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                return RouteMatch::Found(matched.value.as_ref(), params);
            }
        }

        let mut allowed = HashSet::new();
        for (candidate_method, router) in &self.routes {
            if router.at(path).is_ok() {
                allowed.insert(candidate_method.clone());
            }
        }

        if allowed.is_empty() {
            RouteMatch::NotFound
        } else {
            RouteMatch::MethodNotAllowed(allowed.into_iter().collect())
        }
    }
}

impl Service<Request> for RouterService {
    type Response = Response;
    type Error = EdgeError;
    type Future = HandlerFuture;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { inner.dispatch(request).await })
    }
}
