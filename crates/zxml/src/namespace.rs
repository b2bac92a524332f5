//! Namespace declarations read back from attribute entries

use crate::value::Value;

const DECLARATION_PREFIX: &str = "$xmlns:";

/// A prefix bound to a namespace URI by an `xmlns:prefix` attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Namespace<'a> {
    prefix: &'a str,
    uri: &'a str,
}

impl<'a> Namespace<'a> {
    pub const fn new(prefix: &'a str, uri: &'a str) -> Self {
        Self { prefix, uri }
    }

    /// Qualified name prefix, without the colon
    pub const fn prefix(&self) -> &'a str {
        self.prefix
    }

    /// Namespace URI the prefix is bound to
    pub const fn uri(&self) -> &'a str {
        self.uri
    }

    /// Returns the local part of `key` if it is qualified with this prefix
    pub fn local_name<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.prefix)?.strip_prefix(':')
    }
}

/// Namespace declarations carried by `value`'s attribute entries
pub(crate) fn declarations(value: &Value) -> impl Iterator<Item = Namespace<'_>> {
    value
        .as_object()
        .into_iter()
        .flat_map(|object| object.iter())
        .filter_map(|(key, value)| {
            let prefix = key.strip_prefix(DECLARATION_PREFIX)?;
            Some(Namespace::new(prefix, value.as_str()?))
        })
}
