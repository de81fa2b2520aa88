use super::settings::Setting;
use crate::error::BoxError;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value as JsonValue;

/// A view engine holding configuration between renders.
pub trait Renderer: Send + Sync {
    fn set(&mut self, key: &str, value: &Setting);
    fn render(&self, path: &Path, data: &JsonValue) -> Result<String, BoxError>;
}

pub type RenderFn = Arc<dyn Fn(&Path, &JsonValue) -> Result<String, BoxError> + Send + Sync>;

type RendererFactory = Box<dyn Fn() -> Box<dyn Renderer> + Send + Sync>;

/// A resolved view engine.
#[derive(Clone)]
pub enum Engine {
    Stateful(Arc<dyn Renderer>),
    Stateless(RenderFn),
}

impl Engine {
    pub fn render(&self, path: &Path, data: &JsonValue) -> Result<String, BoxError> {
        match self {
            Self::Stateful(r) => r.render(path, data),
            Self::Stateless(f) => f(path, data),
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stateful(_) => f.write_str("Engine::Stateful"),
            Self::Stateless(_) => f.write_str("Engine::Stateless"),
        }
    }
}

/// An engine registered under a name, resolved on first render.
///
/// A module exposing a renderer constructor is preferred over a bare render
/// function; a module exposing neither cannot be used.
#[derive(Default)]
pub struct EngineModule {
    renderer: Option<RendererFactory>,
    render: Option<RenderFn>,
}

impl EngineModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer<F, R>(mut self, f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Renderer + 'static,
    {
        self.renderer = Some(Box::new(move || -> Box<dyn Renderer> { Box::new(f()) }));
        self
    }

    pub fn with_render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path, &JsonValue) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    /// Builds the engine, configuring a stateful renderer with `layout` and `caching`.
    pub(super) fn load(&self, layout: &Setting, caching: &Setting) -> Option<Engine> {
        if let Some(ref factory) = self.renderer {
            let mut renderer = factory();
            renderer.set("layout", layout);
            renderer.set("caching", caching);
            return Some(Engine::Stateful(Arc::from(renderer)));
        }
        self.render.clone().map(Engine::Stateless)
    }
}

impl fmt::Debug for EngineModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineModule")
            .field("renderer", &self.renderer.is_some())
            .field("render", &self.render.is_some())
            .finish()
    }
}
