//! Media-type lookup by file extension.

const TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("md", "text/markdown"),
    ("xml", "application/xml"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("wasm", "application/wasm"),
    ("bin", "application/octet-stream"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
];

/// Resolves a path, file name or bare extension to a media type.
///
/// ```
/// assert_eq!(relay_router::mime::lookup("./dist/index.js"), Some("application/javascript"));
/// assert_eq!(relay_router::mime::lookup("html"), Some("text/html"));
/// assert_eq!(relay_router::mime::lookup("xyz"), None);
/// ```
pub fn lookup(path: &str) -> Option<&'static str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let has_dir = name.len() < path.len();
    let (ext, has_dot) = match name.rfind('.') {
        Some(i) => (&name[i + 1..], i > 0),
        None => (name, false),
    };
    // "application/json" is a directory-like path without an extension
    if has_dir && !has_dot {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    TABLE.iter().find(|&&(e, _)| e == ext).map(|&(_, t)| t)
}

/// Returns the primary extension registered for a media type.
pub fn extension(media_type: &str) -> Option<&'static str> {
    let essence = media_type.split(';').next().unwrap_or("").trim();
    TABLE
        .iter()
        .find(|&&(_, t)| t.eq_ignore_ascii_case(essence))
        .map(|&(e, _)| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_forms() {
        assert_eq!(lookup("index.js"), Some("application/javascript"));
        assert_eq!(lookup("/a.b/STYLE.CSS"), Some("text/css"));
        assert_eq!(lookup("json"), Some("application/json"));
        assert_eq!(lookup("application/json"), None);
        assert_eq!(lookup("unknown-ext"), None);
    }

    #[test]
    fn extension_of_type() {
        assert_eq!(extension("text/html"), Some("html"));
        assert_eq!(extension("application/json; charset=utf-8"), Some("json"));
        assert_eq!(extension("application/x-unknown"), None);
    }
}
