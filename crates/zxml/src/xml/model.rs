//! Raw element tree produced by the tree builder
//!
//! These values only live between building and reduction.

use indexmap::IndexMap;

/// Attribute map in document order
pub type Attributes = IndexMap<String, String>;

/// Finished XML element
#[derive(Debug)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub content: Content,
}

/// Element content: child elements win over incidental text
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Children(Vec<Element>),
    Text(String),
}

impl Element {
    /// Create a text leaf
    pub fn text(name: impl Into<String>, attributes: Attributes, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes,
            content: Content::Text(text.into()),
        }
    }

    /// Create an element with child elements
    pub fn with_children(
        name: impl Into<String>,
        attributes: Attributes,
        children: Vec<Self>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            content: Content::Children(children),
        }
    }

    /// Child elements, empty for text leaves
    pub fn children(&self) -> &[Self] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    /// Text content, `None` when the element has children
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }
}

// Equality, cloning and drop walk the tree with heap worklists so that deep
// chains never recurse.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.name != right.name || left.attributes != right.attributes {
                return false;
            }
            match (&left.content, &right.content) {
                (Content::Text(a), Content::Text(b)) if a == b => {}
                (Content::Children(a), Content::Children(b)) if a.len() == b.len() => {
                    pending.extend(a.iter().zip(b.iter()));
                }
                _ => return false,
            }
        }
        true
    }
}

/// An element being copied: its source, the remaining source children and
/// the copies made so far
struct CloneFrame<'e> {
    source: &'e Element,
    children: std::slice::Iter<'e, Element>,
    done: Vec<Element>,
}

impl<'e> CloneFrame<'e> {
    fn new(source: &'e Element, children: &'e [Element]) -> Self {
        Self {
            source,
            children: children.iter(),
            done: Vec::with_capacity(children.len()),
        }
    }

    fn finish(self) -> Element {
        Element::with_children(
            self.source.name.clone(),
            self.source.attributes.clone(),
            self.done,
        )
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        let mut frame = match &self.content {
            Content::Text(text) => {
                return Self::text(self.name.clone(), self.attributes.clone(), text.clone());
            }
            Content::Children(children) => CloneFrame::new(self, children),
        };
        let mut parents = Vec::new();

        loop {
            match frame.children.next() {
                Some(child) => match &child.content {
                    Content::Text(text) => frame.done.push(Self::text(
                        child.name.clone(),
                        child.attributes.clone(),
                        text.clone(),
                    )),
                    Content::Children(grandchildren) => {
                        parents.push(std::mem::replace(
                            &mut frame,
                            CloneFrame::new(child, grandchildren),
                        ));
                    }
                },
                None => {
                    let finished = frame.finish();
                    match parents.pop() {
                        Some(parent) => {
                            frame = parent;
                            frame.done.push(finished);
                        }
                        None => return finished,
                    }
                }
            }
        }
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        let Content::Children(children) = &mut self.content else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut element) = pending.pop() {
            if let Content::Children(grandchildren) = &mut element.content {
                pending.append(grandchildren);
            }
        }
    }
}
