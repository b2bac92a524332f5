//! Document value produced by reducing an XML element tree

use indexmap::map::{Iter, Keys, Values};
use indexmap::IndexMap;
use std::ops::Index;

use crate::tag::Tag;

/// Prefix marking attribute keys inside an [`Object`]
///
/// A child tag whose name starts with `$` would collide with an attribute
/// key. XML names cannot start with `$`, so parsed documents never do.
pub const ATTRIBUTE_PREFIX: char = '$';

/// Key holding the text of an element that also carries attributes
pub const TEXT_KEY: &str = "@text";

/// Returns true if `key` names an attribute entry
pub fn is_attribute_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

/// Builds the object key for an attribute name
pub fn attribute_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 1);
    key.push(ATTRIBUTE_PREFIX);
    key.push_str(name);
    key
}

/// An XML document value
#[derive(Debug)]
pub enum Value {
    /// Text of an element without attributes, or of an attribute
    Scalar(String),
    /// Attributes and/or child elements keyed by name
    Object(Object),
    /// Same-named siblings in document order
    Array(Array),
}

impl Default for Value {
    fn default() -> Self {
        Self::Scalar(String::new())
    }
}

impl Value {
    /// Returns true if this value is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns true if this value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true if this value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the text if this is a scalar, None otherwise
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object if this is an object, None otherwise
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the array if this is an array, None otherwise
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Wraps this value in a query accessor
    pub fn tag(&self) -> Tag<'_> {
        Tag::new(self)
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        clone_nested(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        eq_nested(vec![(self, other)])
    }
}

impl Eq for Value {}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(Array(values))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Object(Object(map))
    }
}

/// Tears down nested values with a heap worklist so arbitrarily deep
/// documents drop without recursion.
fn drop_nested(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(mut object) => pending.extend(std::mem::take(&mut object.0).into_values()),
            Value::Array(mut array) => pending.append(&mut array.0),
            Value::Scalar(_) => {}
        }
    }
}

/// Compares value pairs from a heap worklist. Object entries match by key,
/// independent of order, as `IndexMap` equality does.
fn eq_nested<'v>(mut pending: Vec<(&'v Value, &'v Value)>) -> bool {
    while let Some(pair) = pending.pop() {
        match pair {
            (Value::Scalar(left), Value::Scalar(right)) if left == right => {}
            (Value::Object(left), Value::Object(right))
                if pair_entries(left, right, &mut pending) => {}
            (Value::Array(left), Value::Array(right)) if pair_items(left, right, &mut pending) => {}
            _ => return false,
        }
    }
    true
}

/// Queues same-keyed entries, false on a size or key mismatch
fn pair_entries<'v>(
    left: &'v Object,
    right: &'v Object,
    pending: &mut Vec<(&'v Value, &'v Value)>,
) -> bool {
    if left.len() != right.len() {
        return false;
    }
    for (key, value) in left {
        match right.get(key) {
            Some(other) => pending.push((value, other)),
            None => return false,
        }
    }
    true
}

fn pair_items<'v>(
    left: &'v Array,
    right: &'v Array,
    pending: &mut Vec<(&'v Value, &'v Value)>,
) -> bool {
    if left.len() != right.len() {
        return false;
    }
    pending.extend(left.iter().zip(right.iter()));
    true
}

/// Copies a value with an explicit stack of partially built containers.
fn clone_nested(root: &Value) -> Value {
    let mut frame = match root {
        Value::Scalar(text) => return Value::Scalar(text.clone()),
        Value::Object(object) => CloneFrame::object(object),
        Value::Array(array) => CloneFrame::array(array),
    };
    let mut parents = Vec::new();

    loop {
        match frame.next_child() {
            Some(Value::Scalar(text)) => frame.accept(Value::Scalar(text.clone())),
            Some(Value::Object(object)) => {
                parents.push(std::mem::replace(&mut frame, CloneFrame::object(object)));
            }
            Some(Value::Array(array)) => {
                parents.push(std::mem::replace(&mut frame, CloneFrame::array(array)));
            }
            None => {
                let finished = frame.finish();
                match parents.pop() {
                    Some(parent) => {
                        frame = parent;
                        frame.accept(finished);
                    }
                    None => return finished,
                }
            }
        }
    }
}

/// A container being copied: the source cursor plus the copy so far
enum CloneFrame<'v> {
    Object {
        entries: Iter<'v, String, Value>,
        key: Option<&'v String>,
        out: IndexMap<String, Value>,
    },
    Array {
        items: std::slice::Iter<'v, Value>,
        out: Vec<Value>,
    },
}

impl<'v> CloneFrame<'v> {
    fn object(object: &'v Object) -> Self {
        Self::Object {
            entries: object.iter(),
            key: None,
            out: IndexMap::with_capacity(object.len()),
        }
    }

    fn array(array: &'v Array) -> Self {
        Self::Array {
            items: array.iter(),
            out: Vec::with_capacity(array.len()),
        }
    }

    fn next_child(&mut self) -> Option<&'v Value> {
        match self {
            Self::Object { entries, key, .. } => {
                let (name, value) = entries.next()?;
                *key = Some(name);
                Some(value)
            }
            Self::Array { items, .. } => items.next(),
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Self::Object { key, out, .. } => {
                if let Some(name) = key.take() {
                    out.insert(name.clone(), value);
                }
            }
            Self::Array { out, .. } => out.push(value),
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Object { out, .. } => Value::Object(Object(out)),
            Self::Array { out, .. } => Value::Array(Array(out)),
        }
    }
}

/// An order-preserving object (map of string keys to values)
#[derive(Debug, Default)]
pub struct Object(pub(crate) IndexMap<String, Value>);

impl Object {
    /// Creates a new empty object
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new object with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of key-value pairs in the object
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the object contains no key-value pairs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the value corresponding to the key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Inserts a key-value pair into the object
    /// Returns the previous value if the key already existed
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns true if the object contains the specified key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an iterator over the keys
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values
    pub fn values(&self) -> Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over key-value pairs
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Iterates over attribute entries with the prefix stripped
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(ATTRIBUTE_PREFIX).map(|name| (name, v)))
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), clone_nested(value)))
                .collect(),
        )
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = Vec::new();
        pair_entries(self, other, &mut pending) && eq_nested(pending)
    }
}

impl Eq for Object {}

impl Drop for Object {
    fn drop(&mut self) {
        if self.0.values().all(Value::is_scalar) {
            return;
        }
        drop_nested(std::mem::take(&mut self.0).into_values().collect());
    }
}

impl Index<&str> for Object {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.0).into_iter()
    }
}

impl From<IndexMap<String, Value>> for Object {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// An array of values
#[derive(Debug, Default)]
pub struct Array(pub(crate) Vec<Value>);

impl Array {
    /// Creates a new empty array
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a new array with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Returns the number of elements in the array
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the array contains no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the element at the given index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Value> {
        self.0.last()
    }

    /// Appends an element to the end of the array
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Returns an iterator over the array
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Clone for Array {
    fn clone(&self) -> Self {
        Self(self.0.iter().map(clone_nested).collect())
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = Vec::new();
        pair_items(self, other, &mut pending) && eq_nested(pending)
    }
}

impl Eq for Array {}

impl Drop for Array {
    fn drop(&mut self) {
        if self.0.iter().all(Value::is_scalar) {
            return;
        }
        drop_nested(std::mem::take(&mut self.0));
    }
}

impl Index<usize> for Array {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.0).into_iter()
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}
