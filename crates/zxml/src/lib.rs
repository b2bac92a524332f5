//! zxml - Schema-less XML to map/array/text document values
//!
//! An XML document is lexed into start/text/end events, folded into an
//! element tree and reduced into a [`Value`]: elements become object keys,
//! attributes become `$`-prefixed keys, and repeated siblings collapse into
//! arrays. [`Tag`] navigates the result without ever failing.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), zxml::Error> {
//! let doc = zxml::from_str(r#"<order id="7"><item>tea</item><item>milk</item></order>"#)?;
//! let order = doc.tag().get("order");
//! assert_eq!(order.attribute("id"), Some("7"));
//! assert_eq!(order.get("item").count(), 2);
//! assert_eq!(order.get("item").last().value(), Some("milk"));
//! assert!(order.get("price").is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Every level of the pipeline is iterative: documents nested far deeper
//! than the native call stack allows still parse, navigate and drop.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod input;
pub use input::Input;

pub mod lexer;
pub use lexer::XmlLexer;

pub mod value;
pub use value::{Array, Object, Value, ATTRIBUTE_PREFIX, TEXT_KEY};

pub mod namespace;
pub use namespace::Namespace;

pub mod tag;
pub use tag::{Selector, Tag};

pub mod xml;
pub use xml::{reduce, Config, Element, Event, Parser, TreeBuilder};

#[cfg(feature = "serde")]
mod ser;

/// Parse XML from string
pub fn from_str(s: &str) -> Result<Value> {
    from_str_with_config(s, Config::default())
}

/// Parse XML from bytes
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    from_bytes_with_config(bytes, Config::default())
}

/// Parse XML from string with custom configuration
pub fn from_str_with_config(s: &str, config: Config) -> Result<Value> {
    let mut parser = Parser::with_config(s.as_bytes(), config);
    parser.parse()
}

/// Parse XML from bytes with custom configuration
pub fn from_bytes_with_config(bytes: &[u8], config: Config) -> Result<Value> {
    let mut parser = Parser::with_config(bytes, config);
    parser.parse()
}
