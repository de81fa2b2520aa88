mod core;
mod imp;
mod pattern;

pub use self::pattern::PathSpec;

use self::pattern::Pattern;
use crate::handler::Handler;

use std::collections::HashMap;

use http::Method;

/// A compiled path pattern bound to at most one handler per method, or to
/// a single handler for every method.
///
/// ```
/// use http::StatusCode;
/// use relay_router::{Handler, Outcome, PathSpec, Route};
///
/// let home = Route::new("/").get(Handler::normal(|_req, res| {
///     Box::pin(async move {
///         res.status(StatusCode::OK).end("home");
///         Outcome::Handled
///     })
/// }));
/// assert_eq!(home.path(), &PathSpec::from("/"));
/// ```
#[derive(Debug)]
pub struct Route {
    spec: PathSpec,
    pattern: Pattern,
    handlers: Handlers,
}

#[derive(Debug, Default)]
enum Handlers {
    #[default]
    Empty,
    All(Handler),
    ByMethod(HashMap<Method, Handler>),
}
