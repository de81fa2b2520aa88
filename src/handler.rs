use crate::error::BoxError;
use crate::request::Request;
use crate::response::Response;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a handler asks the dispatcher to do once it finishes.
#[derive(Debug)]
pub enum Outcome {
    /// Resume dispatch with the next matching route. From an error handler,
    /// this consumes the pending error.
    Continue,
    /// Resume dispatch in error mode.
    Fail(BoxError),
    /// Stop dispatching.
    Handled,
}

impl Outcome {
    pub fn fail(err: impl Into<BoxError>) -> Self {
        Self::Fail(err.into())
    }
}

impl<E: Into<BoxError>> From<Result<(), E>> for Outcome {
    fn from(ret: Result<(), E>) -> Self {
        match ret {
            Ok(()) => Self::Handled,
            Err(e) => Self::Fail(e.into()),
        }
    }
}

pub trait NormalHandler: Send + Sync {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Outcome>;
}

pub trait ErrorHandler: Send + Sync {
    fn call<'a>(
        &'a self,
        err: BoxError,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, Outcome>;
}

impl<F> NormalHandler for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Outcome> + Send + Sync,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Outcome> {
        (self)(req, res)
    }
}

impl<F> ErrorHandler for F
where
    F: for<'a> Fn(BoxError, &'a mut Request, &'a mut Response) -> BoxFuture<'a, Outcome>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        err: BoxError,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, Outcome> {
        (self)(err, req, res)
    }
}

/// A handler tagged with the dispatch mode it serves.
#[derive(Clone)]
pub enum Handler {
    Normal(Arc<dyn NormalHandler>),
    Error(Arc<dyn ErrorHandler>),
}

impl Handler {
    /// ```
    /// use relay_router::{Handler, Outcome};
    ///
    /// let logger = Handler::normal(|req, _res| {
    ///     Box::pin(async move {
    ///         println!("{} {}", req.method(), req.path());
    ///         Outcome::Continue
    ///     })
    /// });
    /// assert!(!logger.is_error());
    /// ```
    pub fn normal<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Outcome>
            + Send
            + Sync
            + 'static,
    {
        Self::Normal(Arc::new(f))
    }

    pub fn error<F>(f: F) -> Self
    where
        F: for<'a> Fn(BoxError, &'a mut Request, &'a mut Response) -> BoxFuture<'a, Outcome>
            + Send
            + Sync
            + 'static,
    {
        Self::Error(Arc::new(f))
    }

    pub fn from_normal(h: impl NormalHandler + 'static) -> Self {
        Self::Normal(Arc::new(h))
    }

    pub fn from_error(h: impl ErrorHandler + 'static) -> Self {
        Self::Error(Arc::new(h))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(_) => f.write_str("Handler::Normal"),
            Self::Error(_) => f.write_str("Handler::Error"),
        }
    }
}
