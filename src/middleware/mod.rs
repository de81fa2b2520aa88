pub mod body_parser;
pub mod send_static;

pub use self::body_parser::{BodyParser, BodyParserConfig};
pub use self::send_static::send_static;
