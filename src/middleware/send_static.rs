//! Serves files from a folder for `GET` and `HEAD` requests.

use crate::error::HttpError;
use crate::handler::{BoxFuture, Handler, NormalHandler, Outcome};
use crate::request::Request;
use crate::resolve::resolve_under;
use crate::response::Response;
use crate::route::{PathSpec, Route};

use std::io;
use std::path::{Path, PathBuf};

use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use regex::Regex;

const DEFAULT_PATTERN: &str = r"(?i)\.[a-z]+$";

struct SendStatic {
    folder: PathBuf,
}

fn fs_error(err: io::Error) -> HttpError {
    let status = match err.kind() {
        io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpError::new(status).with_source(err)
}

impl SendStatic {
    async fn send(
        &self,
        head_only: bool,
        req: &Request,
        res: &mut Response,
    ) -> Result<(), HttpError> {
        let path = resolve_under(&self.folder, req.path())
            .ok_or(HttpError::new(StatusCode::NOT_FOUND))?;
        let type_hint = path.to_string_lossy().into_owned();

        if head_only {
            let meta = tokio::fs::symlink_metadata(&path).await.map_err(fs_error)?;
            res.status(StatusCode::OK)
                .content_type(&type_hint)
                .and_then(|res| res.header(CONTENT_LENGTH.as_str(), &meta.len().to_string()))
                .map_err(|e| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(e))?
                .end(bytes::Bytes::new());
        } else {
            let data = tokio::fs::read(&path).await.map_err(fs_error)?;
            res.status(StatusCode::OK)
                .content_type(&type_hint)
                .map_err(|e| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(e))?
                .end(data);
        }
        tracing::debug!(path = %path.display(), head_only, "static file sent");
        Ok(())
    }
}

impl NormalHandler for SendStatic {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let head_only = if req.method() == Method::HEAD {
                true
            } else if req.method() == Method::GET {
                false
            } else {
                return Outcome::Continue;
            };
            match self.send(head_only, req, res).await {
                Ok(()) => Outcome::Handled,
                Err(e) => Outcome::fail(e),
            }
        })
    }
}

/// Builds a route serving files under `folder`.
///
/// Without a `pattern`, the route answers any path ending in a file extension.
///
/// # Panics
/// Panics if `pattern` is a malformed path.
pub fn send_static(folder: impl AsRef<Path>, pattern: Option<PathSpec>) -> Route {
    let pattern = match pattern {
        Some(p) => p,
        None => PathSpec::Pattern(Regex::new(DEFAULT_PATTERN).expect("valid default pattern")),
    };
    let handler = SendStatic {
        folder: folder.as_ref().to_path_buf(),
    };
    Route::new(pattern).all(Handler::from_normal(handler))
}
