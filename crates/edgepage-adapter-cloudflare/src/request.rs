use edgepage_core::app::App;
use edgepage_core::body::Body;
use edgepage_core::error::EdgeError;
use edgepage_core::http::{request_builder, Method as CoreMethod, Request, Uri};
use worker::{
    Context, Env, Error as WorkerError, Method, Request as CfRequest, Response as CfResponse,
};

use crate::response::from_core_response;

pub async fn into_core_request(mut req: CfRequest) -> Result<Request, EdgeError> {
    let method = into_core_method(req.method());
    let url = req
        .url()
        .map_err(|err| EdgeError::bad_request(format!("invalid URL: {}", err)))?;
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|err| EdgeError::bad_request(format!("invalid URI: {}", err)))?;

    let mut builder = request_builder().method(method).uri(uri);
    for (name, value) in req.headers().entries() {
        builder = builder.header(name.as_str(), value);
    }

    let bytes = req
        .bytes()
        .await
        .map_err(|err| EdgeError::bad_request(format!("failed to read body: {}", err)))?;

    builder
        .body(Body::from(bytes))
        .map_err(|err| EdgeError::internal(anyhow::Error::new(err)))
}

pub async fn dispatch(
    app: &App,
    req: CfRequest,
    _env: Env,
    _ctx: Context,
) -> Result<CfResponse, WorkerError> {
    let response = match into_core_request(req).await {
        Ok(core_request) => app.router().oneshot(core_request).await,
        Err(err) => {
            log::warn!("rejecting request: {}", err);
            edgepage_core::response::IntoResponse::into_response(err)
        }
    };
    from_core_response(response).map_err(edge_error_to_worker)
}

fn edge_error_to_worker(err: EdgeError) -> WorkerError {
    WorkerError::RustError(err.to_string())
}

fn into_core_method(method: Method) -> CoreMethod {
    CoreMethod::from_bytes(method.as_ref().as_bytes()).unwrap_or(CoreMethod::GET)
}
