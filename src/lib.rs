//! An ordered HTTP request dispatcher.
//!
//! A [`Router`] holds [`Route`]s in registration order. A request is offered
//! to each route in turn; the first one whose path pattern matches and that
//! has a handler for the request method runs. The handler's [`Outcome`]
//! decides whether dispatch stops, continues with the next matching route,
//! or switches into error mode, where only error handlers are eligible.
//!
//! ```
//! use http::{Method, StatusCode, Uri};
//! use relay_router::{Handler, Outcome, Request, Response, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = Router::new();
//! router
//!     .get("/users/:id", Handler::normal(|req, res| {
//!         Box::pin(async move {
//!             let body = format!("user {}", req.params.get("id").unwrap_or_default());
//!             res.status(StatusCode::OK).end(body);
//!             Outcome::Handled
//!         })
//!     }))
//!     .all("*", Handler::error(|err, _req, res| {
//!         Box::pin(async move {
//!             res.status(StatusCode::INTERNAL_SERVER_ERROR).end(err.to_string());
//!             Outcome::Handled
//!         })
//!     }));
//!
//! let mut req = Request::new(Method::GET, Uri::from_static("/users/42"));
//! let mut res = Response::new();
//! router.handle(&mut req, &mut res).await.unwrap();
//! assert_eq!(res.body().as_ref(), b"user 42");
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;
mod handler;
mod request;
mod resolve;
mod response;
mod route;
mod router;

pub mod middleware;
pub mod mime;
pub mod report;

#[cfg(feature = "hyper-service")]
pub mod hyper_service;

pub use crate::error::{BoxError, ContextError, HttpError, RouterError};
pub use crate::handler::{BoxFuture, ErrorHandler, Handler, NormalHandler, Outcome};
pub use crate::request::{Body, Params, Request, RequestHead};
pub use crate::response::{
    CookieOptions, Engine, EngineModule, RenderFn, Renderer, Response, SameSite, Setting, Settings,
    VIEWS, VIEW_CACHING, VIEW_ENGINE, VIEW_LAYOUT,
};
pub use crate::route::{PathSpec, Route};
pub use crate::router::{Layer, Router};

#[cfg(feature = "hyper-service")]
pub use crate::hyper_service::RouterService;

pub use http::Method;
