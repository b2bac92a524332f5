//! Node stack builder
//!
//! Folds the event stream into finished [`Element`]s using an explicit frame
//! stack rather than recursion, so nesting depth never touches the native
//! call stack. One builder serves exactly one document.

use crate::error::{Error, ErrorKind, Result};
use crate::xml::event::Event;
use crate::xml::model::{Attributes, Content, Element};

/// In-progress element
#[derive(Debug)]
struct Frame {
    name: String,
    attributes: Attributes,
    children: Vec<Element>,
    text: String,
}

/// Builds the element tree of a single document
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    finished: Vec<Element>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Feed one lexer event
    pub fn push(&mut self, event: Event) -> Result<()> {
        match event {
            Event::StartElement { name, attributes } => self.start(name, attributes),
            Event::Text(text) => self.text(&text),
            Event::EndElement { name } => return self.end(&name),
        }
        Ok(())
    }

    /// Open a new element
    pub fn start(&mut self, name: String, attributes: Attributes) {
        self.stack.push(Frame {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        });
    }

    /// Append trimmed character data to the current element
    pub fn text(&mut self, chars: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.text.push_str(chars.trim());
        }
    }

    /// Close the current element and attach it to its parent
    pub fn end(&mut self, name: &str) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(Error::unpositioned(ErrorKind::UnbalancedDocument));
        };
        if frame.name != name {
            return Err(Error::unpositioned(ErrorKind::MismatchedTag {
                expected: frame.name,
                found: name.to_string(),
            }));
        }

        let content = if frame.children.is_empty() {
            Content::Text(frame.text)
        } else {
            Content::Children(frame.children)
        };
        let element = Element {
            name: frame.name,
            attributes: frame.attributes,
            content,
        };

        match self.stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.finished.push(element),
        }
        Ok(())
    }

    /// Finish the document, returning its top-level elements
    ///
    /// An empty result means no element was ever started.
    pub fn finish(self) -> Result<Vec<Element>> {
        if !self.stack.is_empty() {
            return Err(Error::unpositioned(ErrorKind::UnbalancedDocument));
        }
        Ok(self.finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(events: Vec<Event>) -> Result<Vec<Element>> {
        let mut builder = TreeBuilder::new();
        for event in events {
            builder.push(event)?;
        }
        builder.finish()
    }

    fn start(name: &str) -> Event {
        Event::StartElement {
            name: name.to_string(),
            attributes: Attributes::new(),
        }
    }

    fn end(name: &str) -> Event {
        Event::EndElement {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_empty_element_has_empty_text() -> Result<()> {
        let elements = build(vec![start("tag"), end("tag")])?;
        assert_eq!(elements.len(), 1);
        assert_eq!(elements.first().and_then(Element::text_content), Some(""));
        Ok(())
    }

    #[test]
    fn test_text_fragments_accumulate_trimmed() -> Result<()> {
        let elements = build(vec![
            start("t"),
            Event::Text("  hello ".into()),
            Event::Text("\n world\t".into()),
            end("t"),
        ])?;
        assert_eq!(
            elements.first().and_then(Element::text_content),
            Some("helloworld")
        );
        Ok(())
    }

    #[test]
    fn test_children_win_over_text() -> Result<()> {
        let elements = build(vec![
            start("a"),
            Event::Text("stray".into()),
            start("b"),
            Event::Text("inner".into()),
            end("b"),
            end("a"),
        ])?;
        let a = elements.first().map(Element::children).unwrap_or_default();
        assert_eq!(a.len(), 1);
        assert_eq!(a.first().and_then(Element::text_content), Some("inner"));
        Ok(())
    }

    #[test]
    fn test_no_start_yields_empty_sequence() -> Result<()> {
        assert!(build(Vec::new())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unterminated_frame_is_malformed() {
        let err = build(vec![start("a")]).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::UnbalancedDocument)
        );
    }

    #[test]
    fn test_end_without_start_is_malformed() {
        assert!(build(vec![end("a")]).is_err());
        assert!(build(vec![start("a"), end("b")]).is_err());
    }

    #[test]
    fn test_deep_nesting_is_iterative() -> Result<()> {
        let depth = 100_000;
        let mut builder = TreeBuilder::new();
        for i in 0..depth {
            builder.start(format!("tag{i}"), Attributes::new());
        }
        assert_eq!(builder.depth(), depth);
        builder.text("value");
        for i in (0..depth).rev() {
            builder.end(&format!("tag{i}"))?;
        }
        let elements = builder.finish()?;
        assert_eq!(elements.len(), 1);
        Ok(())
    }
}
