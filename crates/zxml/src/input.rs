//! Input abstraction for raw XML bytes

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Input source with the UTF-8 byte order mark removed
#[derive(Clone, Copy, Debug)]
pub struct Input<'a> {
    source: &'a [u8],
    had_bom: bool,
}

impl<'a> Input<'a> {
    /// Create from byte slice
    pub fn from_bytes(source: &'a [u8]) -> Self {
        match source.strip_prefix(UTF8_BOM) {
            Some(rest) => Self {
                source: rest,
                had_bom: true,
            },
            None => Self {
                source,
                had_bom: false,
            },
        }
    }

    /// Create from string
    pub fn from_str(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Get source bytes
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.source
    }

    /// Whether a byte order mark was stripped
    pub const fn had_bom(&self) -> bool {
        self.had_bom
    }

    /// Get length in bytes
    pub const fn len(&self) -> usize {
        self.source.len()
    }

    /// Check if empty
    pub const fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Self::from_str(s)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::from_bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_from_str() {
        let input = Input::from_str("<a/>");
        assert_eq!(input.len(), 4);
        assert!(!input.is_empty());
        assert!(!input.had_bom());
    }

    #[test]
    fn test_bom_is_stripped() {
        let input = Input::from_bytes(b"\xEF\xBB\xBF<a/>");
        assert_eq!(input.as_bytes(), b"<a/>");
        assert!(input.had_bom());
    }

    #[test]
    fn test_bom_only_is_empty() {
        let input: Input = b"\xEF\xBB\xBF".as_slice().into();
        assert!(input.is_empty());
    }
}
