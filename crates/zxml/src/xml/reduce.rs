//! Tree reducer
//!
//! Folds finished elements into a document [`Object`]:
//!
//! - text only: a bare scalar under the element name
//! - text + attributes: `$`-prefixed attributes plus the text under
//!   [`TEXT_KEY`]
//! - children: the reduced children, preceded by any `$`-prefixed attributes
//!
//! Same-named siblings coalesce into an [`Array`] in document order; a single
//! occurrence is never wrapped.
//!
//! The fold is a post-order walk over an explicit stack of levels, so input
//! depth is bounded by heap rather than by the native call stack.

use std::slice;

use crate::value::{attribute_key, Array, Object, Value, TEXT_KEY};
use crate::xml::model::{Attributes, Content, Element};

/// One sibling list being folded
struct Level<'e> {
    siblings: slice::Iter<'e, Element>,
    out: Object,
    /// Element whose children this level folds, `None` for the document level
    owner: Option<&'e Element>,
}

impl<'e> Level<'e> {
    fn new(siblings: &'e [Element], owner: Option<&'e Element>) -> Self {
        Self {
            siblings: siblings.iter(),
            out: Object::new(),
            owner,
        }
    }
}

/// Reduce an ordered element sequence into an object keyed by tag name
///
/// Pure over its input: reducing the same slice twice yields equal objects.
pub fn reduce(elements: &[Element]) -> Object {
    let mut stack = vec![Level::new(elements, None)];

    while let Some(level) = stack.last_mut() {
        if let Some(element) = level.siblings.next() {
            match &element.content {
                Content::Children(children) if !children.is_empty() => {
                    stack.push(Level::new(children, Some(element)));
                }
                Content::Children(_) => {
                    let value = text_value(&element.attributes, "");
                    insert_sibling(&mut level.out, &element.name, value);
                }
                Content::Text(text) => {
                    let value = text_value(&element.attributes, text);
                    insert_sibling(&mut level.out, &element.name, value);
                }
            }
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        let Level { out, owner, .. } = done;
        let Some(owner) = owner else {
            return out;
        };

        let value = children_value(&owner.attributes, out);
        if let Some(parent) = stack.last_mut() {
            insert_sibling(&mut parent.out, &owner.name, value);
        }
    }

    Object::new()
}

/// Value of a text leaf
fn text_value(attributes: &Attributes, text: &str) -> Value {
    if attributes.is_empty() {
        return Value::Scalar(text.to_owned());
    }

    let mut object = attribute_object(attributes, 1);
    object.insert(TEXT_KEY, text);
    Value::Object(object)
}

/// Value of an element with children: attributes first, then children
fn children_value(attributes: &Attributes, children: Object) -> Value {
    if attributes.is_empty() {
        return Value::Object(children);
    }

    let mut object = attribute_object(attributes, children.len());
    for (key, value) in children {
        object.insert(key, value);
    }
    Value::Object(object)
}

fn attribute_object(attributes: &Attributes, extra: usize) -> Object {
    let mut object = Object::with_capacity(attributes.len() + extra);
    for (name, value) in attributes {
        object.insert(attribute_key(name), value.as_str());
    }
    object
}

/// Insert `value` under `name`, coalescing repeated siblings into an array
fn insert_sibling(object: &mut Object, name: &str, value: Value) {
    match object.get_mut(name) {
        Some(Value::Array(array)) => array.push(value),
        Some(existing) => {
            let previous = std::mem::take(existing);
            *existing = Value::Array(Array::from(vec![previous, value]));
        }
        None => {
            object.insert(name, value);
        }
    }
}
