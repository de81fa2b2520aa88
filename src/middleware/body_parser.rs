//! Buffered request body validation and parsing.

use crate::error::{HttpError, RouterError};
use crate::handler::{BoxFuture, Handler, NormalHandler, Outcome};
use crate::mime;
use crate::request::{Body, Request};
use crate::response::Response;

use std::collections::HashMap;

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, StatusCode};

pub const DEFAULT_LIMIT: usize = 1024;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// Accepted media types, keyed by extension or alias, with optional byte limits.
#[derive(Debug, Clone, Default)]
pub struct BodyParserConfig {
    extensions: Vec<(String, Option<usize>)>,
}

impl BodyParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the media type of `extension` (or the `URLENCODED` alias) up to
    /// `limit` bytes, [`DEFAULT_LIMIT`] when `None`.
    pub fn extension(mut self, extension: impl Into<String>, limit: Option<usize>) -> Self {
        self.extensions.push((extension.into(), limit));
        self
    }
}

fn media_type(extension: &str) -> Option<&'static str> {
    mime::lookup(extension).or_else(|| {
        if extension.eq_ignore_ascii_case("urlencoded") {
            Some(URLENCODED)
        } else {
            None
        }
    })
}

#[derive(Debug, Clone)]
pub struct BodyParser {
    limits: HashMap<&'static str, usize>,
}

impl BodyParser {
    pub fn new(config: BodyParserConfig) -> Result<Self, RouterError> {
        let mut limits = HashMap::new();
        for (extension, limit) in config.extensions {
            let media_type =
                media_type(&extension).ok_or(RouterError::UnsupportedMediaType(extension))?;
            limits.insert(media_type, limit.unwrap_or(DEFAULT_LIMIT));
        }
        Ok(Self { limits })
    }

    fn limit_for<'t>(&self, content_type: &'t str) -> Option<(&'t str, usize)> {
        if let Some(&limit) = self.limits.get(content_type) {
            return Some((content_type, limit));
        }
        let essence = content_type.split(';').next().unwrap_or("").trim();
        self.limits.get(essence).map(|&limit| (essence, limit))
    }

    fn parse(&self, req: &mut Request) -> Result<(), HttpError> {
        let content_type = req
            .header(CONTENT_TYPE.as_str())
            .filter(|t| !t.is_empty())
            .ok_or(HttpError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE))?;
        let (media_type, limit) = self
            .limit_for(content_type)
            .ok_or(HttpError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE))?;
        let media_type = media_type.to_owned();

        let length: usize = req
            .header(CONTENT_LENGTH.as_str())
            .and_then(|v| v.trim().parse().ok())
            .ok_or(HttpError::new(StatusCode::LENGTH_REQUIRED))?;
        if length > limit {
            return Err(HttpError::new(StatusCode::PAYLOAD_TOO_LARGE));
        }

        let raw = req.body().clone();
        if raw.len() > length {
            return Err(HttpError::new(StatusCode::PAYLOAD_TOO_LARGE));
        }
        if raw.len() != length {
            return Err(
                HttpError::new(StatusCode::BAD_REQUEST).with_message("body length mismatch")
            );
        }

        let unprocessable = |e: Box<dyn std::error::Error + Send + Sync>| {
            HttpError::new(StatusCode::UNPROCESSABLE_ENTITY).with_source(e)
        };
        let parsed = match media_type.as_str() {
            JSON => Body::Json(serde_json::from_slice(&raw).map_err(|e| unprocessable(e.into()))?),
            URLENCODED => {
                let text = std::str::from_utf8(&raw).map_err(|e| unprocessable(e.into()))?;
                Body::Form(form_urlencoded::parse(text.as_bytes()).into_owned().collect())
            }
            _ => Body::Empty,
        };

        req.raw_body = Some(raw);
        req.parsed = parsed;
        Ok(())
    }
}

impl NormalHandler for BodyParser {
    fn call<'a>(&'a self, req: &'a mut Request, _: &'a mut Response) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            req.raw_body = None;
            req.parsed = Body::Empty;

            if req.method() != Method::POST {
                return Outcome::Continue;
            }

            match self.parse(req) {
                Ok(()) => Outcome::Continue,
                Err(e) => {
                    tracing::debug!(status = %e.status(), "request body rejected");
                    Outcome::fail(e)
                }
            }
        })
    }
}

impl From<BodyParser> for Handler {
    fn from(parser: BodyParser) -> Self {
        Handler::from_normal(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_resolves_aliases() {
        let parser = BodyParser::new(
            BodyParserConfig::new()
                .extension("URLENCODED", Some(128))
                .extension("json", None)
                .extension("jpeg", Some(4096)),
        )
        .unwrap();
        assert_eq!(parser.limits.get(URLENCODED), Some(&128));
        assert_eq!(parser.limits.get(JSON), Some(&DEFAULT_LIMIT));
        assert_eq!(parser.limits.get("image/jpeg"), Some(&4096));
    }

    #[test]
    fn config_rejects_unknown() {
        let err = BodyParser::new(BodyParserConfig::new().extension("nope", None)).unwrap_err();
        assert!(matches!(err, RouterError::UnsupportedMediaType(ref e) if e == "nope"));
    }

    #[test]
    fn limit_for_strips_parameters() {
        let parser = BodyParser::new(BodyParserConfig::new().extension("json", Some(10))).unwrap();
        assert_eq!(parser.limit_for("application/json"), Some((JSON, 10)));
        assert_eq!(parser.limit_for("application/json; charset=utf-8"), Some((JSON, 10)));
        assert_eq!(parser.limit_for("text/plain"), None);
    }
}
