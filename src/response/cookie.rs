use crate::error::ContextError;

use std::fmt::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    pub max_age: Option<Duration>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

fn is_cookie_value(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

/// Formats a `Set-Cookie` header value.
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> Result<String, ContextError> {
    let invalid = || ContextError::InvalidCookie { name: name.into() };
    if !is_token(name) || !is_cookie_value(value) {
        return Err(invalid());
    }

    let mut out = format!("{}={}", name, value);
    if let Some(max_age) = options.max_age {
        let _ = write!(out, "; Max-Age={}", max_age.as_secs());
    }
    if let Some(ref domain) = options.domain {
        if !is_cookie_value(domain) {
            return Err(invalid());
        }
        let _ = write!(out, "; Domain={}", domain);
    }
    if let Some(ref path) = options.path {
        if !is_cookie_value(path) {
            return Err(invalid());
        }
        let _ = write!(out, "; Path={}", path);
    }
    if options.http_only {
        out.push_str("; HttpOnly");
    }
    if options.secure {
        out.push_str("; Secure");
    }
    match options.same_site {
        Some(SameSite::Strict) => out.push_str("; SameSite=Strict"),
        Some(SameSite::Lax) => out.push_str("; SameSite=Lax"),
        Some(SameSite::None) => out.push_str("; SameSite=None"),
        None => {}
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_attributes() {
        assert_eq!(serialize("x", "1", &CookieOptions::default()).unwrap(), "x=1");

        let options = CookieOptions {
            max_age: Some(Duration::from_secs(3600)),
            path: Some("/".into()),
            http_only: true,
            same_site: Some(SameSite::Lax),
            ..CookieOptions::default()
        };
        assert_eq!(
            serialize("sid", "abc", &options).unwrap(),
            "sid=abc; Max-Age=3600; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn serialize_rejects_separators() {
        let none = CookieOptions::default();
        assert!(serialize("a b", "1", &none).is_err());
        assert!(serialize("a", "1;2", &none).is_err());
        assert!(serialize("", "1", &none).is_err());
    }
}
