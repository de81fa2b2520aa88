mod params;

pub use self::params::Params;

use crate::error::ContextError;

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Uri};
use serde_json::Value as JsonValue;

/// The parts of a request shared with the response context.
#[derive(Debug, Clone, Default)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes()).ok()?;
        self.headers.get(name)?.to_str().ok()
    }
}

/// A payload parsed by the body parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(JsonValue),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Default)]
pub struct Request {
    pub(crate) head: Arc<RequestHead>,
    body: Bytes,
    pub params: Params,
    pub raw_body: Option<Bytes>,
    pub parsed: Body,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self::from_parts(
            RequestHead {
                method,
                uri,
                headers: HeaderMap::new(),
            },
            Bytes::new(),
        )
    }

    pub fn from_parts(head: RequestHead, body: Bytes) -> Self {
        Self {
            head: Arc::new(head),
            body,
            params: Params::new(),
            raw_body: None,
            parsed: Body::Empty,
        }
    }

    /// Sets a header.
    ///
    /// # Panics
    /// Panics if `value` is not a valid header value. See [`Request::try_with_header`].
    pub fn with_header(self, name: HeaderName, value: &str) -> Self {
        match self.try_with_header(name, value) {
            Ok(req) => req,
            Err(e) => panic!("{}: value = {:?}", e, value),
        }
    }

    pub fn try_with_header(mut self, name: HeaderName, value: &str) -> Result<Self, ContextError> {
        let value = HeaderValue::from_str(value).map_err(|_| ContextError::InvalidHeader {
            name: name.as_str().into(),
        })?;
        self.headers_mut().insert(name, value);
        Ok(self)
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut Arc::make_mut(&mut self.head).headers
    }

    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.head.header(name)
    }

    /// The unread transport payload.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn head(&self) -> &Arc<RequestHead> {
        &self.head
    }
}
