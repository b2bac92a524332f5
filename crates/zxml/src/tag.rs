//! Chainable, total query accessor over a document value
//!
//! A [`Tag`] is a view over zero or more matched values. Looking up a name
//! or index always yields another `Tag`; absence is an empty `Tag`
//! (`count() == 0`, `value() == None`) and chains through further lookups.
//!
//! ```
//! # fn main() -> Result<(), zxml::Error> {
//! let doc = zxml::from_str("<r><item>a</item><item>b</item></r>")?;
//! let items = doc.tag().get("r").get("item");
//! assert_eq!(items.count(), 2);
//! assert_eq!(items.get(1).value(), Some("b"));
//! assert_eq!(items.get(5).value(), None);
//! # Ok(())
//! # }
//! ```
//!
//! Unqualified names that miss fall back to namespace-prefixed keys: every
//! `xmlns:prefix` declaration on the current matches or their ancestors
//! brings `prefix:name` into reach. The declarations are rescanned on each
//! lookup rather than resolved at parse time.

use indexmap::{IndexMap, IndexSet};

use crate::namespace::{declarations, Namespace};
use crate::value::{attribute_key, is_attribute_key, Object, Value, TEXT_KEY};

/// Read-only view over matched values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag<'a> {
    matches: Vec<&'a Value>,
    scope: Vec<Namespace<'a>>,
}

impl<'a> Tag<'a> {
    /// Wrap a value; an array yields one match per item
    pub fn new(value: &'a Value) -> Self {
        Self::from_value(value, Vec::new())
    }

    /// The empty accessor
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_value(value: &'a Value, scope: Vec<Namespace<'a>>) -> Self {
        let mut matches = Vec::new();
        push_expanded(&mut matches, value);
        Self { matches, scope }
    }

    fn with_match(&self, value: Option<&'a Value>) -> Self {
        Self {
            matches: value.into_iter().collect(),
            scope: self.scope.clone(),
        }
    }

    /// Text of the selection
    ///
    /// A single scalar match, or a single object match carrying a text
    /// entry, yields that text. Otherwise the first scalar match wins.
    pub fn value(&self) -> Option<&'a str> {
        if let &[only] = self.matches.as_slice() {
            match only {
                Value::Scalar(text) => return Some(text.as_str()),
                Value::Object(object) => {
                    if let Some(text) = object.get(TEXT_KEY).and_then(Value::as_str) {
                        return Some(text);
                    }
                }
                Value::Array(_) => {}
            }
        }
        self.matches.iter().copied().find_map(Value::as_str)
    }

    /// Child tag names across all matched objects
    pub fn tags(&self) -> IndexSet<&'a str> {
        self.matches
            .iter()
            .copied()
            .filter_map(Value::as_object)
            .flat_map(Object::keys)
            .map(String::as_str)
            .filter(|key| !is_attribute_key(key) && *key != TEXT_KEY)
            .collect()
    }

    /// Attribute keys (with their `$` prefix) of a single match
    pub fn attributes(&self) -> IndexSet<&'a str> {
        let &[only] = self.matches.as_slice() else {
            return IndexSet::new();
        };
        only.as_object()
            .into_iter()
            .flat_map(Object::keys)
            .map(String::as_str)
            .filter(|key| is_attribute_key(key))
            .collect()
    }

    /// Value of attribute `name` (given without the `$` prefix)
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.get(attribute_key(name).as_str()).value()
    }

    pub fn first(&self) -> Self {
        self.with_match(self.matches.first().copied())
    }

    pub fn last(&self) -> Self {
        self.with_match(self.matches.last().copied())
    }

    /// Number of matched values
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The matched values
    pub fn values(&self) -> &[&'a Value] {
        &self.matches
    }

    /// Namespaces inherited from ancestors of the selection
    pub fn scope(&self) -> &[Namespace<'a>] {
        &self.scope
    }

    /// One single-match accessor per match
    pub fn iter(&self) -> impl Iterator<Item = Tag<'a>> + '_ {
        self.matches
            .iter()
            .copied()
            .map(|value| self.with_match(Some(value)))
    }

    /// Select by tag name (`&str`, `String`) or by match index (`usize`)
    pub fn get<S: Selector>(&self, selector: S) -> Self {
        selector.select(self)
    }

    /// Namespaces declared on the first match, keyed by prefix
    pub fn namespace(&self) -> IndexMap<&'a str, Namespace<'a>> {
        self.matches
            .first()
            .copied()
            .into_iter()
            .flat_map(declarations)
            .map(|ns| (ns.prefix(), ns))
            .collect()
    }

    fn child(&self, name: &str) -> Self {
        // One binding per prefix; an inner declaration replaces the outer one
        let mut scope = self.scope.clone();
        for declared in self.matches.iter().copied().flat_map(declarations) {
            match scope.iter_mut().find(|ns| ns.prefix() == declared.prefix()) {
                Some(bound) => *bound = declared,
                None => scope.push(declared),
            }
        }

        if let Some(child) = self.matches.first().copied().and_then(|first| first.get(name)) {
            return Self::from_value(child, scope);
        }
        if name.contains(':') {
            return Self {
                matches: Vec::new(),
                scope,
            };
        }

        let mut matches = Vec::new();
        for object in self.matches.iter().copied().filter_map(Value::as_object) {
            for (key, value) in object {
                if scope.iter().any(|ns| ns.local_name(key) == Some(name)) {
                    push_expanded(&mut matches, value);
                }
            }
        }
        Self { matches, scope }
    }

    fn at(&self, index: usize) -> Self {
        self.with_match(self.matches.get(index).copied())
    }
}

fn push_expanded<'a>(matches: &mut Vec<&'a Value>, value: &'a Value) {
    match value {
        Value::Array(items) => matches.extend(items.iter()),
        _ => matches.push(value),
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for usize {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// Something a [`Tag`] can be subscripted with
pub trait Selector: private::Sealed {
    #[doc(hidden)]
    fn select<'a>(&self, tag: &Tag<'a>) -> Tag<'a>;
}

impl Selector for str {
    fn select<'a>(&self, tag: &Tag<'a>) -> Tag<'a> {
        tag.child(self)
    }
}

impl Selector for String {
    fn select<'a>(&self, tag: &Tag<'a>) -> Tag<'a> {
        tag.child(self)
    }
}

impl Selector for usize {
    fn select<'a>(&self, tag: &Tag<'a>) -> Tag<'a> {
        tag.at(*self)
    }
}

impl<T: ?Sized + Selector> Selector for &T {
    fn select<'a>(&self, tag: &Tag<'a>) -> Tag<'a> {
        (**self).select(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Array;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_scalar_value() {
        let doc = object(vec![("tag", Value::from("hello"))]);
        let tag = doc.tag();
        assert_eq!(tag.get("tag").value(), Some("hello"));
        assert_eq!(tag.get("tag").count(), 1);
        assert!(tag.tags().contains("tag"));
    }

    #[test]
    fn test_text_key_value_and_attributes() {
        let doc = object(vec![(
            "t",
            object(vec![
                ("$a", Value::from("1")),
                ("$b", Value::from("2")),
                (TEXT_KEY, Value::from("v")),
            ]),
        )]);
        let t = doc.tag().get("t");
        assert_eq!(t.value(), Some("v"));
        assert_eq!(t.get("$a").value(), Some("1"));
        assert_eq!(t.attribute("b"), Some("2"));
        assert_eq!(
            t.attributes().into_iter().collect::<Vec<_>>(),
            vec!["$a", "$b"]
        );
        assert!(t.tags().is_empty());
        assert_eq!(
            doc.tag().tags().into_iter().collect::<Vec<_>>(),
            vec!["t"]
        );
    }

    #[test]
    fn test_object_without_text_has_no_value() {
        let doc = object(vec![("p", object(vec![("c", Value::from("x"))]))]);
        assert_eq!(doc.tag().get("p").value(), None);
    }

    #[test]
    fn test_array_matches() {
        let doc = object(vec![(
            "x",
            Value::from(vec![Value::from("1"), Value::from("2"), Value::from("3")]),
        )]);
        let xs = doc.tag().get("x");
        assert_eq!(xs.count(), 3);
        assert_eq!(xs.value(), Some("1"));
        assert_eq!(xs.first().value(), Some("1"));
        assert_eq!(xs.last().value(), Some("3"));
        assert_eq!(xs.get(1).value(), Some("2"));
        assert_eq!(xs.iter().filter_map(|t| t.value()).collect::<Vec<_>>(), vec!["1", "2", "3"]);
        assert!(xs.attributes().is_empty());
    }

    #[test]
    fn test_absence_propagates() {
        let doc = object(vec![("a", Value::from("x"))]);
        let missing = doc.tag().get("nope").get("deeper").get(3);
        assert!(missing.is_empty());
        assert_eq!(missing.count(), 0);
        assert_eq!(missing.value(), None);
        assert!(missing.tags().is_empty());
        assert!(missing.first().is_empty());
        assert!(missing.last().is_empty());
        assert!(missing.namespace().is_empty());
        assert!(Tag::empty().get("a").is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let doc = object(vec![("a", Value::from("x"))]);
        assert_eq!(doc.tag().get("a").get(0).value(), Some("x"));
        assert!(doc.tag().get("a").get(1).is_empty());
    }

    #[test]
    fn test_direct_lookup_uses_first_match() {
        let doc = object(vec![(
            "p",
            Value::Array(Array::from(vec![
                object(vec![("c", Value::from("first"))]),
                object(vec![("c", Value::from("second"))]),
            ])),
        )]);
        let p = doc.tag().get("p");
        assert_eq!(p.get("c").value(), Some("first"));
        assert_eq!(p.get(1).get("c").value(), Some("second"));
        assert_eq!(
            p.tags().into_iter().collect::<Vec<_>>(),
            vec!["c"]
        );
    }

    #[test]
    fn test_string_selector() {
        let doc = object(vec![("a", Value::from("x"))]);
        let key = String::from("a");
        assert_eq!(doc.tag().get(&key).value(), Some("x"));
        assert_eq!(doc.tag().get(key).value(), Some("x"));
    }

    #[test]
    fn test_namespace_fallback_pools_prefixes() {
        let doc = object(vec![(
            "root",
            object(vec![
                ("$xmlns:h", Value::from("urn:h")),
                ("$xmlns:f", Value::from("urn:f")),
                (
                    "h:table",
                    Value::from(vec![
                        object(vec![("h:td", Value::from("a"))]),
                        object(vec![("h:td", Value::from("b"))]),
                    ]),
                ),
                ("f:table", object(vec![("f:name", Value::from("c"))])),
                ("x:table", Value::from("undeclared")),
            ]),
        )]);
        let root = doc.tag().get("root");
        assert_eq!(root.namespace().get("h").map(Namespace::uri), Some("urn:h"));
        assert_eq!(root.namespace().len(), 2);

        let tables = root.get("table");
        assert_eq!(tables.count(), 3);
        assert_eq!(tables.scope().len(), 2);
        assert_eq!(tables.get(0).get("td").value(), Some("a"));
        assert_eq!(tables.get(1).get("td").value(), Some("b"));
        assert_eq!(tables.get(2).get("name").value(), Some("c"));
        assert_eq!(root.get("h:table").count(), 2);
        assert!(root.get("y:table").is_empty());
    }

    #[test]
    fn test_redeclared_prefix_keeps_one_binding() {
        let mut value = object(vec![("h:td", Value::from("leaf"))]);
        for level in (0..50).rev() {
            value = object(vec![
                ("$xmlns:h", Value::from(format!("urn:h{level}"))),
                ("h:row", value),
            ]);
        }
        let doc = object(vec![("root", value)]);

        let mut cursor = doc.tag().get("root");
        for _ in 0..50 {
            cursor = cursor.get("row");
            assert_eq!(cursor.scope().len(), 1);
        }
        assert_eq!(cursor.scope().first().map(Namespace::uri), Some("urn:h49"));
        assert_eq!(cursor.get("td").value(), Some("leaf"));
    }

    #[test]
    fn test_no_fallback_without_declarations() {
        let doc = object(vec![("root", object(vec![("h:td", Value::from("a"))]))]);
        assert!(doc.tag().get("root").get("td").is_empty());
    }

    #[test]
    fn test_array_root_expands() {
        let doc = Value::from(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(Tag::new(&doc).count(), 2);
    }
}
