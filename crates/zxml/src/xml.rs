//! XML pipeline: events, element tree, reduction and the parser driver

pub mod builder;
pub mod event;
pub mod model;
pub mod parser;
pub mod reduce;

pub use builder::TreeBuilder;
pub use event::Event;
pub use model::{Attributes, Content, Element};
pub use parser::{Config, Parser};
pub use reduce::reduce;
