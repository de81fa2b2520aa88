use super::engine::{Engine, EngineModule};
use crate::error::ContextError;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub const VIEWS: &str = "views";
pub const VIEW_ENGINE: &str = "view engine";
pub const VIEW_LAYOUT: &str = "view layout";
pub const VIEW_CACHING: &str = "view caching";

#[derive(Debug, Clone, Default)]
pub enum Setting {
    #[default]
    Unset,
    Text(String),
    Flag(bool),
    Engine(Engine),
}

impl Setting {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            Self::Flag(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for Setting {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Setting {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Setting {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Engine> for Setting {
    fn from(e: Engine) -> Self {
        Self::Engine(e)
    }
}

/// Router configuration read by the response context.
#[derive(Debug)]
pub struct Settings {
    values: RwLock<HashMap<String, Setting>>,
    engines: RwLock<HashMap<String, EngineModule>>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut values = HashMap::new();
        values.insert(VIEWS.to_owned(), Setting::from("views"));
        values.insert(VIEW_ENGINE.to_owned(), Setting::Unset);
        values.insert(VIEW_LAYOUT.to_owned(), Setting::Unset);
        values.insert(VIEW_CACHING.to_owned(), Setting::Flag(false));
        Self {
            values: RwLock::new(values),
            engines: RwLock::new(HashMap::new()),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Setting {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(key).cloned().unwrap_or_default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Setting>) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.into(), value.into());
    }

    /// Makes an engine available to the `view engine` setting under `name`.
    pub fn register_engine(&self, name: impl Into<String>, module: EngineModule) {
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);
        engines.insert(name.into(), module);
    }

    /// Resolves the `view engine` setting, caching the result in place of a name.
    pub fn engine(&self) -> Result<Engine, ContextError> {
        {
            let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
            match values.get(VIEW_ENGINE) {
                Some(Setting::Engine(engine)) => return Ok(engine.clone()),
                Some(Setting::Text(_)) => {}
                _ => return Err(ContextError::NotFound { accessor: "engine" }),
            }
        }

        // another caller may have resolved it between the two locks
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let name = match values.get(VIEW_ENGINE) {
            Some(Setting::Engine(engine)) => return Ok(engine.clone()),
            Some(Setting::Text(name)) => name.clone(),
            _ => return Err(ContextError::NotFound { accessor: "engine" }),
        };

        let engine = {
            let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
            let module = engines
                .get(&name)
                .ok_or_else(|| ContextError::EngineNotFound(name.clone()))?;
            let layout = values.get(VIEW_LAYOUT).cloned().unwrap_or_default();
            let caching = values.get(VIEW_CACHING).cloned().unwrap_or_default();
            module
                .load(&layout, &caching)
                .ok_or(ContextError::IncompatibleEngine)?
        };

        tracing::debug!(engine = %name, "view engine resolved");
        values.insert(VIEW_ENGINE.to_owned(), Setting::Engine(engine.clone()));
        Ok(engine)
    }
}
