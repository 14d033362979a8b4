use std::net::SocketAddr;

use axum::body::Body as AxumBody;
use axum::extract::connect_info::ConnectInfo;
use axum::http::Request;
use edgepage_core::body::Body;
use edgepage_core::error::EdgeError;
use edgepage_core::http::Request as CoreRequest;

use crate::context::AxumRequestContext;

/// Convert an axum request into a core request, buffering the body and recording the peer
/// address in [`AxumRequestContext`].
pub async fn into_core_request(request: Request<AxumBody>) -> Result<CoreRequest, EdgeError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|err| EdgeError::bad_request(format!("failed to read request body: {err}")))?;

    let mut core_request = CoreRequest::from_parts(parts, Body::from_bytes(bytes));

    if let Some(ConnectInfo(remote_addr)) = core_request
        .extensions_mut()
        .remove::<ConnectInfo<SocketAddr>>()
    {
        AxumRequestContext::insert(
            &mut core_request,
            AxumRequestContext {
                remote_addr: Some(remote_addr),
            },
        );
    }

    Ok(core_request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgepage_core::http::Method;

    #[tokio::test]
    async fn converts_method_uri_headers_and_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/anything?q=1")
            .header("x-test", "1")
            .body(AxumBody::from("payload"))
            .expect("request");

        let core_request = into_core_request(request).await.expect("conversion");
        assert_eq!(core_request.method(), &Method::POST);
        assert_eq!(core_request.uri().path(), "/anything");
        assert_eq!(core_request.uri().query(), Some("q=1"));
        assert_eq!(core_request.headers()["x-test"], "1");
        assert_eq!(core_request.body().as_bytes(), b"payload");
        assert!(AxumRequestContext::get(&core_request).is_none());
    }

    #[tokio::test]
    async fn connect_info_moves_into_context() {
        let mut request = Request::builder()
            .uri("/")
            .body(AxumBody::empty())
            .expect("request");
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:4000".parse().unwrap()));

        let core_request = into_core_request(request).await.expect("conversion");
        let context = AxumRequestContext::get(&core_request).expect("context");
        assert_eq!(context.remote_addr, Some("127.0.0.1:4000".parse().unwrap()));
        assert!(core_request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .is_none());
    }

    #[tokio::test]
    async fn large_body_is_buffered_whole() {
        let payload = vec![b'x'; 3 * 1024 * 1024];
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(AxumBody::from(payload.clone()))
            .expect("request");

        let core_request = into_core_request(request).await.expect("conversion");
        assert_eq!(core_request.body().len(), payload.len());
    }
}
