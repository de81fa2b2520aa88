use relay_router::middleware::{send_static, BodyParser, BodyParserConfig};
use relay_router::{Body, BoxError, Handler, HttpError, Method, Outcome, Request, Response, Router};

use std::fs;

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{StatusCode, Uri};
use serde_json::json;

fn parsing_router() -> Router {
    let parser = BodyParser::new(
        BodyParserConfig::new()
            .extension("json", None)
            .extension("urlencoded", Some(64)),
    )
    .unwrap();

    let mut router = Router::new();
    router
        .mount(Handler::from(parser))
        .post(
            "/submit",
            Handler::normal(|req, res| {
                Box::pin(async move {
                    let body = match req.parsed {
                        Body::Json(ref v) => v.to_string(),
                        Body::Form(ref pairs) => format!("{:?}", pairs),
                        Body::Empty => "empty".to_owned(),
                    };
                    res.end(body);
                    Outcome::Handled
                })
            }),
        )
        .get(
            "/submit",
            Handler::normal(|req, res| {
                Box::pin(async move {
                    assert!(req.raw_body.is_none());
                    assert_eq!(req.parsed, Body::Empty);
                    res.end("get");
                    Outcome::Handled
                })
            }),
        )
        .mount(Handler::error(|err, _, res| {
            Box::pin(async move {
                let err = HttpError::from_error(err);
                res.status(err.status()).end(err.message().to_owned());
                Outcome::Handled
            })
        }));
    router
}

fn post(content_type: Option<&str>, length: Option<&str>, body: &'static str) -> Request {
    let mut req = Request::new(Method::POST, Uri::from_static("/submit")).with_body(body);
    if let Some(t) = content_type {
        req = req.with_header(CONTENT_TYPE, t);
    }
    if let Some(l) = length {
        req = req.with_header(CONTENT_LENGTH, l);
    }
    req
}

async fn dispatch(router: &Router, mut req: Request) -> (Result<(), BoxError>, Response) {
    let mut res = Response::new();
    let ret = router.handle(&mut req, &mut res).await;
    (ret, res)
}

#[tokio::test]
async fn body_parser_rejections() {
    let router = parsing_router();
    let cases = [
        (post(None, Some("2"), "{}"), StatusCode::UNSUPPORTED_MEDIA_TYPE),
        (post(Some("text/plain"), Some("2"), "{}"), StatusCode::UNSUPPORTED_MEDIA_TYPE),
        (post(Some("application/json"), None, "{}"), StatusCode::LENGTH_REQUIRED),
        (post(Some("application/json"), Some("2000"), "{}"), StatusCode::PAYLOAD_TOO_LARGE),
        (
            post(Some("application/x-www-form-urlencoded"), Some("65"), "a=1"),
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (post(Some("application/json"), Some("1"), "{}"), StatusCode::PAYLOAD_TOO_LARGE),
        (post(Some("application/json"), Some("5"), "{}"), StatusCode::BAD_REQUEST),
        (post(Some("application/json"), Some("5"), "{oops"), StatusCode::UNPROCESSABLE_ENTITY),
    ];

    for (req, status) in cases {
        let (ret, res) = dispatch(&router, req).await;
        ret.unwrap();
        assert_eq!(res.status_code(), status);
    }
}

#[tokio::test]
async fn body_parser_json() {
    let router = parsing_router();
    let body = r#"{"name":"ferris","legs":6}"#;
    let req = post(
        Some("application/json; charset=utf-8"),
        Some(&body.len().to_string()),
        body,
    );

    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.status_code(), StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(parsed, json!({ "name": "ferris", "legs": 6 }));
}

#[tokio::test]
async fn body_parser_form() {
    let router = parsing_router();
    let body = "user=ferris&lang=rust%21";
    let req = post(
        Some("application/x-www-form-urlencoded"),
        Some(&body.len().to_string()),
        body,
    );

    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.body().as_ref(), br#"[("user", "ferris"), ("lang", "rust!")]"#);
}

#[tokio::test]
async fn body_parser_skips_other_methods() {
    let router = parsing_router();
    let req = Request::new(Method::GET, Uri::from_static("/submit")).with_body("ignored");
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.body().as_ref(), b"get");
}

fn static_router(dir: &tempfile::TempDir) -> Router {
    let mut router = Router::new();
    router.route(send_static(dir.path(), None));
    router
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), "hello").unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css").join("site.css"), "body{}").unwrap();
    dir
}

#[tokio::test]
async fn static_get() {
    let dir = fixture();
    let router = static_router(&dir);

    let req = Request::new(Method::GET, Uri::from_static("/hello.txt"));
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert!(res.is_ended());
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.get_header("content-type"), Some("text/plain; charset=UTF-8"));
    assert_eq!(res.body().as_ref(), b"hello");

    let req = Request::new(Method::GET, Uri::from_static("/css/site.css?v=2"));
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.get_header("content-type"), Some("text/css"));
    assert_eq!(res.body().as_ref(), b"body{}");
}

#[tokio::test]
async fn static_head() {
    let dir = fixture();
    let router = static_router(&dir);

    let req = Request::new(Method::HEAD, Uri::from_static("/hello.txt"));
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.get_header("content-length"), Some("5"));
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn static_missing_file() {
    let dir = fixture();
    let router = static_router(&dir);

    let req = Request::new(Method::GET, Uri::from_static("/missing.txt"));
    let (ret, res) = dispatch(&router, req).await;
    let err = ret.unwrap_err().downcast::<HttpError>().unwrap();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert!(!res.is_ended());

    let req = Request::new(Method::GET, Uri::from_static("/../hello.txt"));
    let err = dispatch(&router, req).await.0.unwrap_err();
    assert_eq!(HttpError::from_error(err).status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_passes_through() {
    let dir = fixture();
    let router = static_router(&dir);

    let req = Request::new(Method::POST, Uri::from_static("/hello.txt"));
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert!(!res.is_ended());

    let req = Request::new(Method::GET, Uri::from_static("/hello"));
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert!(!res.is_ended());
}
