//! XML lexer and the byte cursor it reads through

pub mod cursor;
pub mod xml;

pub use cursor::Cursor;
pub use xml::XmlLexer;
