use crate::error::{BoxError, HttpError};
use crate::handler::BoxFuture;
use crate::request::{Request, RequestHead};
use crate::response::Response;
use crate::router::Router;

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::service::Service;

/// Largest request body buffered before dispatch, in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Serves a [`Router`] over hyper.
///
/// Request bodies are buffered up to a byte limit ([`DEFAULT_BODY_LIMIT`]
/// unless changed with [`RouterService::with_body_limit`]); larger bodies
/// are answered with `413 Payload Too Large` without dispatching.
///
/// A request no handler ended gets `404 Not Found`; an error no error
/// handler consumed gets its [`HttpError`] status, or `500`.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
    body_limit: usize,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self::from_shared(Arc::new(router))
    }

    pub fn from_shared(router: Arc<Router>) -> Self {
        Self {
            router,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}

impl Router {
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }
}

fn too_large() -> BoxError {
    HttpError::new(StatusCode::PAYLOAD_TOO_LARGE).into()
}

/// Buffers `body`, giving up as soon as it is known to exceed `limit`.
async fn read_body<B>(headers: &HeaderMap, body: B, limit: usize) -> Result<Bytes, BoxError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|n| n > limit as u64) {
        return Err(too_large());
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(too_large()),
        Err(err) => Err(err),
    }
}

fn error_response(err: &HttpError) -> http::Response<Full<Bytes>> {
    let mut res = Response::new();
    res.status(err.status()).end(err.message().to_owned());
    res.into_http().map(Full::new)
}

async fn serve<B>(
    router: Arc<Router>,
    body_limit: usize,
    req: http::Request<B>,
) -> Result<http::Response<Full<Bytes>>, BoxError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let body = match read_body(&parts.headers, body, body_limit).await {
        Ok(body) => body,
        Err(err) => match err.downcast::<HttpError>() {
            Ok(err) => {
                tracing::debug!(
                    path = parts.uri.path(),
                    limit = body_limit,
                    "request body rejected"
                );
                return Ok(error_response(&err));
            }
            Err(err) => return Err(err),
        },
    };

    let head = RequestHead {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
    };
    let mut req = Request::from_parts(head, body);
    let mut res = Response::new();

    match router.handle(&mut req, &mut res).await {
        Ok(()) if res.is_ended() => Ok(res.into_http().map(Full::new)),
        Ok(()) => {
            tracing::debug!(
                method = %req.method(),
                path = req.path(),
                "no handler ended the response"
            );
            Ok(error_response(&HttpError::new(StatusCode::NOT_FOUND)))
        }
        Err(err) => {
            let err = HttpError::from_error(err);
            tracing::error!(
                method = %req.method(),
                path = req.path(),
                error = %err,
                "unhandled dispatch error"
            );
            Ok(error_response(&err))
        }
    }
}

impl<B> Service<http::Request<B>> for RouterService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        Box::pin(serve(Arc::clone(&self.router), self.body_limit, req))
    }
}
