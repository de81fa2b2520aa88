use relay_router::report::{report, reset};
use relay_router::{
    BoxError, ContextError, CookieOptions, EngineModule, Handler, Method, Outcome, Renderer,
    Request, Response, Router, SameSite, Setting, VIEWS, VIEW_ENGINE, VIEW_LAYOUT,
};

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::{StatusCode, Uri};
use serde_json::{json, Value as JsonValue};

struct Greeter {
    layout: String,
}

impl Renderer for Greeter {
    fn set(&mut self, key: &str, value: &Setting) {
        if key == "layout" {
            self.layout = value.as_text().unwrap_or("none").to_owned();
        }
    }

    fn render(&self, path: &Path, data: &JsonValue) -> Result<String, BoxError> {
        match data.get("name").and_then(JsonValue::as_str) {
            Some(name) => Ok(format!(
                "<{}>{}: hello {}</{}>",
                self.layout,
                path.display(),
                name,
                self.layout
            )),
            None => Err("missing name".into()),
        }
    }
}

fn greeter_router() -> Router {
    let mut router = Router::new();
    router
        .register_engine(
            "greeter",
            EngineModule::new().with_renderer(|| Greeter {
                layout: String::new(),
            }),
        )
        .set(VIEWS, "templates")
        .set(VIEW_ENGINE, "greeter")
        .set(VIEW_LAYOUT, "main");
    router
}

async fn dispatch(router: &Router, req: Request) -> (Result<(), BoxError>, Response) {
    let mut req = req;
    let mut res = Response::new();
    let ret = router.handle(&mut req, &mut res).await;
    (ret, res)
}

fn get(path: &'static str) -> Request {
    Request::new(Method::GET, Uri::from_static(path))
}

#[tokio::test]
async fn render_through_registered_engine() {
    let mut router = greeter_router();
    router.get(
        "/hello/:name",
        Handler::normal(|req, res| {
            Box::pin(async move {
                let data = json!({ "name": req.params.get("name") });
                Outcome::from(res.render("hello", Some(&data)).map(|_| ()))
            })
        }),
    );

    let (ret, res) = dispatch(&router, get("/hello/ferris")).await;
    ret.unwrap();
    assert!(res.is_ended());
    assert_eq!(res.get_header("content-type"), Some("text/html; charset=UTF-8"));
    assert_eq!(res.body().as_ref(), b"<main>templates/hello: hello ferris</main>");
}

#[tokio::test]
async fn render_failure_fails_dispatch() {
    let mut router = greeter_router();
    router.get(
        "/",
        Handler::normal(|_, res| {
            Box::pin(async move { Outcome::from(res.render("hello", None).map(|_| ())) })
        }),
    );

    let (ret, res) = dispatch(&router, get("/")).await;
    assert_eq!(ret.unwrap_err().to_string(), "missing name");
    assert!(!res.is_ended());
}

#[tokio::test]
async fn render_with_hands_error_to_callback() {
    let seen = Arc::new(Mutex::new(None));
    let mut router = greeter_router();
    let sink = Arc::clone(&seen);
    router.get(
        "/",
        Handler::normal(move |_, res| {
            let sink = Arc::clone(&sink);
            Box::pin(async move {
                let ret = res.render_with("hello", None, |err| {
                    *sink.lock().unwrap() = Some(err.to_string());
                });
                assert!(ret.is_ok());
                res.status(StatusCode::BAD_REQUEST).end("no name");
                Outcome::Handled
            })
        }),
    );

    let (ret, res) = dispatch(&router, get("/")).await;
    ret.unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("missing name"));
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.body().as_ref(), b"no name");
}

#[tokio::test]
async fn render_rejects_escaping_view() {
    let mut router = greeter_router();
    router.get(
        "/",
        Handler::normal(|_, res| {
            Box::pin(async move {
                let err = res.render("../secret", Some(&json!({ "name": "x" }))).unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<ContextError>(),
                    Some(ContextError::UnsafePath(_))
                ));
                Outcome::Handled
            })
        }),
    );
    dispatch(&router, get("/")).await.0.unwrap();
}

#[tokio::test]
async fn render_without_engine() {
    let mut router = Router::new();
    router.get(
        "/",
        Handler::normal(|_, res| {
            Box::pin(async move {
                let err = res.render_with("home", None, |_| unreachable!()).unwrap_err();
                assert_eq!(err.to_string(), "`response.engine()` no engine found");
                Outcome::Handled
            })
        }),
    );
    dispatch(&router, get("/")).await.0.unwrap();
}

#[tokio::test]
async fn stateless_engine_module() {
    let mut router = Router::new();
    router
        .register_engine(
            "echo",
            EngineModule::new()
                .with_render(|path, data| Ok(format!("{} {}", path.display(), data))),
        )
        .set(VIEW_ENGINE, "echo")
        .get(
            "/",
            Handler::normal(|_, res| {
                Box::pin(async move { Outcome::from(res.render("index", None).map(|_| ())) })
            }),
        );

    let (ret, res) = dispatch(&router, get("/")).await;
    ret.unwrap();
    assert_eq!(res.body().as_ref(), b"views/index {}");
}

#[tokio::test]
async fn redirect_back_uses_referrer() {
    let mut router = Router::new();
    router.post(
        "/login",
        Handler::normal(|_, res| {
            Box::pin(async move { Outcome::from(res.redirect("back").map(|_| ())) })
        }),
    );

    let req = get("/login");
    let (_, res) = dispatch(&router, req).await;
    assert!(!res.is_ended());

    let req = Request::new(Method::POST, Uri::from_static("/login"))
        .with_header(http::header::REFERER, "/form");
    let (ret, res) = dispatch(&router, req).await;
    ret.unwrap();
    assert_eq!(res.status_code(), StatusCode::FOUND);
    assert_eq!(res.get_header("location"), Some("/form"));
}

#[test]
fn cookie_options() {
    let mut res = Response::new();
    let options = CookieOptions {
        max_age: Some(Duration::from_secs(3600)),
        path: Some("/".into()),
        http_only: true,
        secure: true,
        same_site: Some(SameSite::Lax),
        ..CookieOptions::default()
    };
    res.cookie("session", "abc123", Some(&options)).unwrap();

    let cookie = res.get_header("set-cookie").unwrap();
    assert!(cookie.starts_with("session=abc123; Max-Age=3600; Path=/"));
    assert!(cookie.contains("; HttpOnly"));
    assert!(cookie.contains("; Secure"));
    assert!(cookie.contains("; SameSite=Lax"));

    assert!(matches!(
        res.cookie("bad name", "x", None),
        Err(ContextError::InvalidCookie { .. })
    ));
}

#[test]
fn diagnostics_reported_once() {
    let site = "tests::diagnostics(): void";
    assert!(report(site, "first"));
    assert!(!report(site, "first"));
    assert!(report(site, "second"));

    reset();
    assert!(report(site, "first"));
}
