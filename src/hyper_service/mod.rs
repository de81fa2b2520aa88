#![forbid(unsafe_code)]

mod service;

pub use self::service::{RouterService, DEFAULT_BODY_LIMIT};
