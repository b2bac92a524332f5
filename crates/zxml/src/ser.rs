//! `serde::Serialize` for document values and query selections
//!
//! Objects serialize as maps in document order, arrays as sequences and
//! scalars as strings. A [`Tag`] serializes its single match as that value,
//! several matches as a sequence and an empty selection as unit.
//!
//! Serializers recurse once per nesting level, so values nested deeper than
//! [`MAX_DEPTH`] fail with an error instead of exhausting the stack. Deeper
//! documents can still be walked with [`Tag`].

use serde::ser::{Error, Serialize, SerializeMap, Serializer};

use crate::tag::Tag;
use crate::value::{Array, Object, Value};

/// Deepest container nesting that serializes
pub(crate) const MAX_DEPTH: usize = 256;

/// A value together with the number of containers around it
struct Nested<'v> {
    value: &'v Value,
    depth: usize,
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Scalar(text) => serializer.serialize_str(text),
            Value::Object(object) => serialize_object(object, self.depth, serializer),
            Value::Array(array) => serialize_array(array, self.depth, serializer),
        }
    }
}

fn serialize_object<S: Serializer>(
    object: &Object,
    depth: usize,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let depth = enter::<S::Error>(depth)?;
    let mut map = serializer.serialize_map(Some(object.len()))?;
    for (key, value) in object {
        map.serialize_entry(key, &Nested { value, depth })?;
    }
    map.end()
}

fn serialize_array<S: Serializer>(
    array: &Array,
    depth: usize,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let depth = enter::<S::Error>(depth)?;
    serializer.collect_seq(array.iter().map(|value| Nested { value, depth }))
}

fn enter<E: Error>(depth: usize) -> Result<usize, E> {
    if depth >= MAX_DEPTH {
        return Err(E::custom("document too deep to serialize"));
    }
    Ok(depth + 1)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            value: self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_object(self, 0, serializer)
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_array(self, 0, serializer)
    }
}

impl Serialize for Tag<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.values() {
            [] => serializer.serialize_unit(),
            [only] => only.serialize(serializer),
            many => {
                let depth = enter::<S::Error>(0)?;
                serializer.collect_seq(many.iter().map(|&value| Nested { value, depth }))
            }
        }
    }
}
