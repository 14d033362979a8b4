use std::collections::HashMap;

use crate::body::Body;
use crate::http::{HeaderMap, Method, Request, Uri};

/// Request context exposed to handlers and middleware.
pub struct RequestContext {
    request: Request,
    path_params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(request: Request) -> Self {
        Self::with_params(request, HashMap::new())
    }

    pub fn with_params(request: Request, path_params: HashMap<String, String>) -> Self {
        Self {
            request,
            path_params,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Body {
        self.request.body()
    }

    /// Value captured for `{name}` in the matched route, if any.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}
