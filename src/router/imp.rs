use super::{Layer, Router};
use crate::error::RouterError;
use crate::handler::Handler;
use crate::response::{EngineModule, Setting, Settings};
use crate::route::{PathSpec, Route};

use std::sync::Arc;

use http::Method;

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            settings: Arc::new(Settings::new()),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Setting>) -> &mut Self {
        self.settings.set(key, value);
        self
    }

    pub fn register_engine(&mut self, name: impl Into<String>, module: EngineModule) -> &mut Self {
        self.settings.register_engine(name, module);
        self
    }

    /// Mounts a layer on every path.
    ///
    /// ```
    /// use relay_router::{Handler, Outcome, Router};
    ///
    /// let mut router = Router::new();
    /// router.mount(Handler::normal(|req, _res| {
    ///     Box::pin(async move {
    ///         tracing::info!(method = %req.method(), path = req.path());
    ///         Outcome::Continue
    ///     })
    /// }));
    /// assert_eq!(router.routes().len(), 1);
    /// ```
    pub fn mount(&mut self, layer: impl Into<Layer>) -> &mut Self {
        self.use_layers(None::<PathSpec>, [layer.into()])
    }

    pub fn mount_at(&mut self, path: impl Into<PathSpec>, layer: impl Into<Layer>) -> &mut Self {
        self.use_layers(Some(path), [layer.into()])
    }

    /// Appends each layer in order. Handlers are wrapped in a route for `path`
    /// (every path when `None`) answering all methods; routes are kept as they are.
    ///
    /// # Panics
    /// Panics if `path` is malformed. See [`Router::try_use_layers`].
    pub fn use_layers<P, I>(&mut self, path: Option<P>, layers: I) -> &mut Self
    where
        P: Into<PathSpec>,
        I: IntoIterator<Item = Layer>,
    {
        let path = path.map_or(PathSpec::Wildcard, Into::into);
        if let Err(e) = self.try_use_layers(Some(path.clone()), layers) {
            panic!("{}: path = {:?}", e, path);
        }
        self
    }

    pub fn try_use_layers<P, I>(
        &mut self,
        path: Option<P>,
        layers: I,
    ) -> Result<&mut Self, RouterError>
    where
        P: Into<PathSpec>,
        I: IntoIterator<Item = Layer>,
    {
        let path = path.map_or(PathSpec::Wildcard, Into::into);
        for layer in layers {
            let route = match layer {
                Layer::Route(route) => route,
                Layer::Handler(handler) => Route::try_new(path.clone())?.try_all(handler)?,
            };
            self.routes.push(route);
        }
        Ok(self)
    }

    pub fn route(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    pub fn method(
        &mut self,
        method: Method,
        path: impl Into<PathSpec>,
        handler: Handler,
    ) -> &mut Self {
        let path = path.into();
        if let Err(e) = self.try_method(method, path.clone(), handler) {
            panic!("{}: path = {:?}", e, path);
        }
        self
    }

    pub fn try_method(
        &mut self,
        method: Method,
        path: impl Into<PathSpec>,
        handler: Handler,
    ) -> Result<&mut Self, RouterError> {
        let route = Route::try_new(path)?.try_method(method, handler)?;
        self.routes.push(route);
        Ok(self)
    }

    pub fn all(&mut self, path: impl Into<PathSpec>, handler: Handler) -> &mut Self {
        let path = path.into();
        if let Err(e) = self.try_all(path.clone(), handler) {
            panic!("{}: path = {:?}", e, path);
        }
        self
    }

    pub fn try_all(
        &mut self,
        path: impl Into<PathSpec>,
        handler: Handler,
    ) -> Result<&mut Self, RouterError> {
        let route = Route::try_new(path)?.try_all(handler)?;
        self.routes.push(route);
        Ok(self)
    }
}

macro_rules! define_method {
    ($name:ident, $try_name:ident, $method:ident) => {
        pub fn $name(&mut self, path: impl Into<PathSpec>, handler: Handler) -> &mut Self {
            self.method(Method::$method, path, handler)
        }

        pub fn $try_name(
            &mut self,
            path: impl Into<PathSpec>,
            handler: Handler,
        ) -> Result<&mut Self, RouterError> {
            self.try_method(Method::$method, path, handler)
        }
    };
}

impl Router {
    define_method!(get, try_get, GET);
    define_method!(post, try_post, POST);
    define_method!(put, try_put, PUT);
    define_method!(delete, try_delete, DELETE);
    define_method!(head, try_head, HEAD);
    define_method!(options, try_options, OPTIONS);
    define_method!(connect, try_connect, CONNECT);
    define_method!(patch, try_patch, PATCH);
    define_method!(trace, try_trace, TRACE);
}
