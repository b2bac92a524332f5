//! XML structural events

use crate::xml::model::Attributes;

/// Events emitted by the XML lexer and consumed by the tree builder
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Opening tag (a self-closing tag is followed by its `EndElement`)
    StartElement {
        name: String,
        attributes: Attributes,
    },
    /// Closing tag
    EndElement { name: String },
    /// Character data or CDATA content, entities already decoded
    Text(String),
}

impl Event {
    /// Element name for start/end events
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::StartElement { name, .. } | Self::EndElement { name } => Some(name),
            Self::Text(_) => None,
        }
    }

    pub const fn is_start(&self) -> bool {
        matches!(self, Self::StartElement { .. })
    }
}
