use super::pattern::{PathSpec, Pattern};
use super::{Handlers, Route};
use crate::error::RouterError;
use crate::handler::Handler;

use std::collections::HashMap;

use http::Method;

const ALL: &str = "all";

impl Route {
    /// Compiles `path` into a route with no handlers.
    ///
    /// # Panics
    /// Panics if the path is malformed or repeats a parameter name.
    /// See [`Route::try_new`].
    pub fn new(path: impl Into<PathSpec>) -> Self {
        let path = path.into();
        match Self::try_new(path.clone()) {
            Ok(route) => route,
            Err(e) => panic!("{}: path = {:?}", e, path),
        }
    }

    pub fn try_new(path: impl Into<PathSpec>) -> Result<Self, RouterError> {
        let spec = path.into();
        let pattern = Pattern::compile(&spec)?;
        Ok(Self {
            spec,
            pattern,
            handlers: Handlers::Empty,
        })
    }

    pub fn path(&self) -> &PathSpec {
        &self.spec
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.pattern.param_names()
    }

    pub fn method(self, method: Method, handler: Handler) -> Self {
        match self.try_method(method, handler) {
            Ok(route) => route,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_method(mut self, method: Method, handler: Handler) -> Result<Self, RouterError> {
        let site = || format!("<Route>.{}(handler)", method.as_str().to_ascii_lowercase());
        match self.handlers {
            Handlers::All(_) => Err(RouterError::logical(
                site(),
                "adding a handler to another method when ALL exists does not make sense",
            )),
            Handlers::ByMethod(ref map) if map.contains_key(&method) => Err(RouterError::logical(
                site(),
                "multiple method handlers not implemented. use another route for this",
            )),
            Handlers::ByMethod(ref mut map) => {
                map.insert(method, handler);
                Ok(self)
            }
            Handlers::Empty => {
                let mut map = HashMap::new();
                map.insert(method, handler);
                self.handlers = Handlers::ByMethod(map);
                Ok(self)
            }
        }
    }

    pub fn all(self, handler: Handler) -> Self {
        match self.try_all(handler) {
            Ok(route) => route,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_all(mut self, handler: Handler) -> Result<Self, RouterError> {
        let site = format!("<Route>.{}(handler)", ALL);
        match self.handlers {
            Handlers::All(_) => Err(RouterError::logical(
                site,
                "multiple method handlers not implemented. use another route for this",
            )),
            Handlers::ByMethod(_) => Err(RouterError::logical(
                site,
                "adding an ALL handler when method handlers exist does not make sense",
            )),
            Handlers::Empty => {
                self.handlers = Handlers::All(handler);
                Ok(self)
            }
        }
    }
}

macro_rules! define_method {
    ($name:ident, $try_name:ident, $method:ident) => {
        pub fn $name(self, handler: Handler) -> Self {
            self.method(Method::$method, handler)
        }

        pub fn $try_name(self, handler: Handler) -> Result<Self, RouterError> {
            self.try_method(Method::$method, handler)
        }
    };
}

impl Route {
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
