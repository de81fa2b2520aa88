use relay_router::middleware::{send_static, BodyParser, BodyParserConfig};
use relay_router::{Body, Handler, HttpError, Outcome, Router};

use http::StatusCode;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn hello() -> Handler {
    Handler::normal(|req, res| {
        Box::pin(async move {
            let name = req.params.get("name").unwrap_or("world");
            res.end(format!("hello, {}!", name));
            Outcome::Handled
        })
    })
}

fn echo() -> Handler {
    Handler::normal(|req, res| {
        Box::pin(async move {
            let reply = match req.parsed {
                Body::Json(ref value) => value.to_string(),
                Body::Form(ref pairs) => format!("{:?}", pairs),
                Body::Empty => String::new(),
            };
            Outcome::from(res.content_type("json").map(|res| {
                res.end(reply);
            }))
        })
    })
}

fn log_requests() -> Handler {
    Handler::normal(|req, _| {
        Box::pin(async move {
            tracing::info!(method = %req.method(), path = req.path(), "request");
            Outcome::Continue
        })
    })
}

fn report_errors() -> Handler {
    Handler::error(|err, req, res| {
        Box::pin(async move {
            let err = HttpError::from_error(err);
            tracing::warn!(path = req.path(), error = %err, "request failed");
            res.status(err.status()).end(err.to_string());
            Outcome::Handled
        })
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let parser = BodyParser::new(
        BodyParserConfig::new()
            .extension("json", None)
            .extension("urlencoded", None),
    )?;

    let mut router = Router::new();
    router
        .mount(log_requests())
        .mount(Handler::from(parser))
        .get("/hello/:name", hello())
        .post("/echo", echo())
        .route(send_static("public", None))
        .all(
            "*",
            Handler::normal(|_, _| {
                Box::pin(async { Outcome::fail(HttpError::new(StatusCode::NOT_FOUND)) })
            }),
        )
        .mount(report_errors());
    let service = router.into_service();

    let addr = "127.0.0.1:3000";
    let listener = TcpListener::bind(addr).await?;

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!(
        "echo: curl -d '{{\"a\":1}}' -H 'content-type: application/json' http://{}/echo",
        addr
    );
    println!("static: http://{}/index.html (served from ./public)", addr);
    println!();

    loop {
        let (stream, _) = listener.accept().await?;
        let service = service.clone();
        tokio::spawn(async move {
            let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
            if let Err(err) = conn.await {
                tracing::error!(error = %err, "connection error");
            }
        });
    }
}
