mod dispatch;
mod imp;

use crate::handler::Handler;
use crate::response::Settings;
use crate::route::Route;

use std::sync::Arc;

/// An ordered list of routes. The first route able to handle a request wins.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
    settings: Arc<Settings>,
}

/// Something that can be mounted on a router.
#[derive(Debug)]
pub enum Layer {
    Route(Route),
    Handler(Handler),
}

impl From<Route> for Layer {
    fn from(route: Route) -> Self {
        Self::Route(route)
    }
}

impl From<Handler> for Layer {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}
