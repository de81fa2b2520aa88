mod cookie;
mod engine;
mod settings;

pub use self::cookie::{CookieOptions, SameSite};
pub use self::engine::{Engine, EngineModule, RenderFn, Renderer};
pub use self::settings::{Setting, Settings, VIEWS, VIEW_CACHING, VIEW_ENGINE, VIEW_LAYOUT};

use crate::error::{BoxError, ContextError};
use crate::mime;
use crate::report::report;
use crate::request::RequestHead;
use crate::resolve::resolve_under;

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION, REFERER, SET_COOKIE};
use http::StatusCode;
use serde_json::Value as JsonValue;

pub(crate) const RENDER_SITE: &str =
    "response.render(view: &str, data: Option<&Value>): Result<&mut Response, BoxError>";
pub(crate) const NO_CALLBACK: &str = "no `callback` provided";

/// The per-request response context.
///
/// Wraps the response being built and refers back to the request and the
/// settings of the router dispatching it.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    ended: bool,
    request: Option<Arc<RequestHead>>,
    router: Option<Arc<Settings>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

fn header_name(name: &str) -> Result<HeaderName, ContextError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ContextError::InvalidHeader { name: name.into() })
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ContextError> {
    HeaderValue::from_str(value).map_err(|_| ContextError::InvalidHeader {
        name: name.as_str().into(),
    })
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            ended: false,
            request: None,
            router: None,
        }
    }

    /// Binds the context to a request and, when dispatched by a router, its settings.
    pub fn attach(
        &mut self,
        request: Arc<RequestHead>,
        router: Option<Arc<Settings>>,
    ) -> &mut Self {
        self.request = Some(request);
        self.router = router;
        self
    }

    pub fn request(&self) -> Result<&RequestHead, ContextError> {
        self.request
            .as_deref()
            .ok_or(ContextError::NotFound { accessor: "request" })
    }

    pub fn router(&self) -> Result<&Arc<Settings>, ContextError> {
        self.router
            .as_ref()
            .ok_or(ContextError::NotFound { accessor: "router" })
    }

    pub fn engine(&self) -> Result<Engine, ContextError> {
        self.router()?.engine()
    }

    /// Sets one header. `text/html` and `text/plain` content types gain a UTF-8 charset.
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self, ContextError> {
        let name = header_name(name)?;
        let value = if name == CONTENT_TYPE && (value == "text/html" || value == "text/plain") {
            header_value(&name, &format!("{}; charset=UTF-8", value))?
        } else {
            header_value(&name, value)?
        };
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn set_headers<'a, I>(&mut self, headers: I) -> Result<&mut Self, ContextError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in headers {
            self.header(name, value)?;
        }
        Ok(self)
    }

    /// Sets the content type from a media type, extension or file name.
    /// Unknown input leaves the header untouched.
    pub fn content_type(&mut self, value: &str) -> Result<&mut Self, ContextError> {
        let resolved = if value.contains('/') && mime::extension(value).is_some() {
            Some(value)
        } else {
            mime::lookup(value)
        };
        match resolved {
            Some(t) => self.header(CONTENT_TYPE.as_str(), t),
            None => Ok(self),
        }
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Redirects with `302 Found`. `"back"` goes to the referrer, or `/`.
    pub fn redirect(&mut self, location: &str) -> Result<&mut Self, ContextError> {
        self.redirect_with(StatusCode::FOUND, location)
    }

    pub fn redirect_with(
        &mut self,
        status: StatusCode,
        location: &str,
    ) -> Result<&mut Self, ContextError> {
        let location = if location == "back" {
            let referer = self.request()?.headers.get(REFERER);
            match referer.and_then(|v| v.to_str().ok()) {
                Some(r) => r.to_owned(),
                None => "/".to_owned(),
            }
        } else {
            location.to_owned()
        };

        let value = header_value(&LOCATION, &location)?;
        self.status = status;
        self.headers.insert(LOCATION, value);
        Ok(self.end(Bytes::new()))
    }

    /// Adds a header value, keeping the values already set.
    pub fn append(&mut self, name: &str, value: &str) -> Result<&mut Self, ContextError> {
        let name = header_name(name)?;
        let value = header_value(&name, value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn cookie(
        &mut self,
        name: &str,
        value: &str,
        options: Option<&CookieOptions>,
    ) -> Result<&mut Self, ContextError> {
        let cookie = cookie::serialize(name, value, options.unwrap_or(&CookieOptions::default()))?;
        self.append(SET_COOKIE.as_str(), &cookie)
    }

    /// Renders `view` and ends the response with the output.
    ///
    /// Render failures are returned to the caller; use [`Response::render_with`]
    /// to handle them without failing.
    pub fn render(&mut self, view: &str, data: Option<&JsonValue>) -> Result<&mut Self, BoxError> {
        let (views, engine) = self.view_context()?;
        report(RENDER_SITE, NO_CALLBACK);
        self.render_view(&views, &engine, view, data)?;
        Ok(self)
    }

    /// Renders `view`, passing a render failure to `callback` instead of ending the response.
    pub fn render_with<F>(
        &mut self,
        view: &str,
        data: Option<&JsonValue>,
        callback: F,
    ) -> Result<&mut Self, ContextError>
    where
        F: FnOnce(BoxError),
    {
        let (views, engine) = self.view_context()?;
        if let Err(e) = self.render_view(&views, &engine, view, data) {
            callback(e);
        }
        Ok(self)
    }

    fn view_context(&self) -> Result<(String, Engine), ContextError> {
        let settings = self.router()?;
        let views = settings
            .get(VIEWS)
            .as_text()
            .unwrap_or_default()
            .to_owned();
        let engine = settings.engine()?;
        Ok((views, engine))
    }

    fn render_view(
        &mut self,
        views: &str,
        engine: &Engine,
        view: &str,
        data: Option<&JsonValue>,
    ) -> Result<(), BoxError> {
        let path = resolve_under(Path::new(views), view)
            .ok_or_else(|| ContextError::UnsafePath(view.into()))?;
        let empty = JsonValue::Object(serde_json::Map::new());
        let html = engine.render(&path, data.unwrap_or(&empty))?;

        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=UTF-8"));
        self.end(html);
        Ok(())
    }

    /// Finishes the response. Later calls are ignored.
    pub fn end(&mut self, body: impl Into<Bytes>) -> &mut Self {
        if self.ended {
            tracing::debug!("response already ended");
            return self;
        }
        self.body = body.into();
        self.ended = true;
        self
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_http(self) -> http::Response<Bytes> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
