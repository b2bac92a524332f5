//! Parser driver: lexer events → element tree → reduced document

use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::input::Input;
use crate::lexer::XmlLexer;
use crate::value::Value;
use crate::xml::builder::TreeBuilder;
use crate::xml::model::Element;
use crate::xml::reduce::reduce;

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u32,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u32, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    fn depth_exceeded(&self, depth: usize) -> bool {
        self.max_depth > 0 && u32::try_from(depth).map_or(true, |depth| depth > self.max_depth)
    }
}

/// Single-document XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: XmlLexer<'a>,
    config: Config,
    input_len: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    ///
    /// A leading UTF-8 byte order mark is skipped.
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        let input = Input::from_bytes(input);
        Self {
            lexer: XmlLexer::new(input.as_bytes()),
            config,
            input_len: input.len(),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the document into its top-level elements without reducing them
    pub fn parse_elements(&mut self) -> Result<Vec<Element>> {
        if self.input_len == 0 {
            return Err(Error::unpositioned(ErrorKind::EmptyInput));
        }
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::unpositioned(ErrorKind::MaxSizeExceeded {
                max: self.config.max_size,
            }));
        }

        let mut builder = TreeBuilder::new();
        while let Some(event) = self.lexer.next_event()? {
            if event.is_start() && self.config.depth_exceeded(builder.depth() + 1) {
                return Err(Error::at(
                    ErrorKind::MaxDepthExceeded {
                        max: self.config.max_depth,
                    },
                    self.lexer.position(),
                ));
            }
            builder
                .push(event)
                .map_err(|err| Error::at(err.kind().clone(), self.lexer.position()))?;
        }
        builder.finish()
    }

    /// Parse and reduce the document
    ///
    /// The result is an object holding the root element under its tag name.
    #[instrument(level = "debug", skip_all, fields(len = self.input_len))]
    pub fn parse(&mut self) -> Result<Value> {
        let elements = match self.parse_elements() {
            Ok(elements) => elements,
            Err(err) => {
                warn!("document rejected: {}", err);
                return Err(err);
            }
        };
        if elements.is_empty() {
            warn!("document has no root element");
            return Err(Error::at(ErrorKind::MissingRoot, self.lexer.position()));
        }
        debug!("built {} top-level element(s)", elements.len());

        let document = reduce(&elements);
        debug!("reduced document with {} key(s)", document.len());
        Ok(Value::Object(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_size, 10 * 1024 * 1024);
        assert_eq!(Config::unlimited(), Config::new(0, 0));
    }

    #[test]
    fn test_parse_simple() -> Result<()> {
        let value = parse("<tag>hello</tag>")?;
        assert_eq!(value.get("tag"), Some(&Value::from("hello")));
        Ok(())
    }

    #[test]
    fn test_empty_input() {
        let err = parse("").err();
        assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::EmptyInput));
    }

    #[test]
    fn test_bom_only_is_empty() {
        let err = Parser::new(b"\xEF\xBB\xBF").parse().err();
        assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::EmptyInput));
    }

    #[test]
    fn test_bom_is_skipped() -> Result<()> {
        let value = Parser::new(b"\xEF\xBB\xBF<a>1</a>").parse()?;
        assert_eq!(value.get("a"), Some(&Value::from("1")));
        Ok(())
    }

    #[test]
    fn test_max_depth() {
        let config = Config::new(2, 0);
        assert!(Parser::with_config(b"<a><b>x</b></a>", config).parse().is_ok());

        let err = Parser::with_config(b"<a><b><c>x</c></b></a>", config)
            .parse()
            .err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxDepthExceeded { max: 2 })
        );
    }

    #[test]
    fn test_max_size() {
        let config = Config::new(0, 8);
        let err = Parser::with_config(b"<tag>hello</tag>", config).parse().err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxSizeExceeded { max: 8 })
        );
    }

    #[test]
    fn test_parse_elements_keeps_tree() -> Result<()> {
        let elements = Parser::new(b"<r><a>1</a><a>2</a></r>").parse_elements()?;
        assert_eq!(elements.len(), 1);
        assert_eq!(elements.first().map(|r| r.children().len()), Some(2));
        Ok(())
    }

    #[test]
    fn test_rejects_non_xml() {
        assert!(parse("hello world").is_err());
        assert!(parse("<a>").is_err());
        assert!(parse("<a></b>").is_err());
    }
}
