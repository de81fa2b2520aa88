use super::{Handlers, Route};
use crate::error::BoxError;
use crate::handler::{BoxFuture, ErrorHandler, Handler, NormalHandler, Outcome};
use crate::request::Request;
use crate::response::Response;

use http::Method;

impl Route {
    /// Resolves the handler for `method` serving the given mode.
    fn handler(&self, method: &Method, erroring: bool) -> Option<&Handler> {
        let handler = match self.handlers {
            Handlers::Empty => None,
            Handlers::All(ref h) => Some(h),
            Handlers::ByMethod(ref map) => map.get(method),
        }?;

        if handler.is_error() == erroring {
            Some(handler)
        } else {
            None
        }
    }

    pub(crate) fn handles(&self, req: &Request, erroring: bool) -> bool {
        self.handler(req.method(), erroring).is_some() && self.pattern.matches(req.path())
    }

    pub(crate) fn process(&self, req: &mut Request) -> &Self {
        self.pattern.extract(req.head.uri.path(), &mut req.params);
        self
    }

    /// Runs the handler selected by [`Route::handles`].
    pub(crate) fn invoke<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        error: Option<BoxError>,
    ) -> BoxFuture<'a, Outcome> {
        let erroring = error.is_some();
        match (self.handler(req.method(), erroring), error) {
            (Some(Handler::Normal(h)), None) => NormalHandler::call(&**h, req, res),
            (Some(Handler::Error(h)), Some(err)) => ErrorHandler::call(&**h, err, req, res),
            (_, Some(err)) => Box::pin(async move { Outcome::Fail(err) }),
            (_, None) => Box::pin(async { Outcome::Continue }),
        }
    }
}
