use super::Router;
use crate::error::BoxError;
use crate::handler::Outcome;
use crate::request::Request;
use crate::response::Response;
use crate::route::Route;

use std::sync::Arc;

/// Forward-only position in the route list of one dispatch pass.
struct Cursor<'r> {
    routes: &'r [Route],
    index: usize,
}

impl<'r> Cursor<'r> {
    fn new(routes: &'r [Route]) -> Self {
        Self { routes, index: 0 }
    }

    /// Advances past the next route able to handle `req` in the given mode.
    fn next_match(&mut self, req: &Request, erroring: bool) -> Option<&'r Route> {
        while let Some(route) = self.routes.get(self.index) {
            self.index += 1;
            if route.handles(req, erroring) {
                return Some(route);
            }
        }
        None
    }
}

impl Router {
    /// Dispatches a request through the routes in registration order.
    ///
    /// Returns the pending error if it reaches the end of the routes without
    /// being consumed by an error handler. Otherwise returns `Ok(())`, whether
    /// or not some handler ended the response.
    pub async fn handle(&self, req: &mut Request, res: &mut Response) -> Result<(), BoxError> {
        res.attach(Arc::clone(req.head()), Some(Arc::clone(&self.settings)));

        let mut cursor = Cursor::new(&self.routes);
        let mut error: Option<BoxError> = None;

        while let Some(route) = cursor.next_match(req, error.is_some()) {
            tracing::debug!(
                index = cursor.index - 1,
                path = ?route.path(),
                erroring = error.is_some(),
                "route matched"
            );

            route.process(req);
            match route.invoke(req, res, error.take()).await {
                Outcome::Continue => {}
                Outcome::Fail(err) => {
                    tracing::debug!(error = %err, "dispatch switched to error mode");
                    error = Some(err);
                }
                Outcome::Handled => return Ok(()),
            }
        }

        match error {
            Some(err) => {
                tracing::debug!(error = %err, "unhandled error after last route");
                Err(err)
            }
            None => Ok(()),
        }
    }
}
