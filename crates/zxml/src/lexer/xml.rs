//! Pull-based XML lexer
//!
//! Turns raw bytes into the [`Event`] stream consumed by the tree builder.
//! Open elements are tracked on an explicit stack, so nesting depth costs
//! heap only. The lexer skips the XML declaration, processing instructions,
//! comments and a DOCTYPE (the internal subset is not interpreted), reports
//! CDATA sections as text and decodes the predefined and numeric entities.

use std::borrow::Cow;

use memchr::{memchr, memchr3};

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::Cursor;
use crate::xml::event::Event;
use crate::xml::model::Attributes;

const COMMENT_OPEN: &[u8] = b"<!--";
const CDATA_OPEN: &[u8] = b"<![CDATA[";
const DOCTYPE_OPEN: &[u8] = b"<!DOCTYPE";

/// XML lexer producing structural events
#[derive(Debug)]
pub struct XmlLexer<'a> {
    cursor: Cursor<'a>,
    open: Vec<String>,
    pending_end: Option<String>,
    seen_root: bool,
}

impl<'a> XmlLexer<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
            open: Vec::new(),
            pending_end: None,
            seen_root: false,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub const fn position(&self) -> Pos {
        self.cursor.position()
    }

    /// Get the next event, `Ok(None)` once the root element is closed and
    /// only trailing whitespace, comments or processing instructions remain
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Event::EndElement { name }));
        }

        if self.open.is_empty() {
            self.next_outside_root()
        } else {
            self.next_inside_root()
        }
    }

    fn next_outside_root(&mut self) -> Result<Option<Event>> {
        loop {
            self.cursor.skip_whitespace();
            let Some(b) = self.cursor.current() else {
                if self.seen_root {
                    return Ok(None);
                }
                return Err(self.error_here(ErrorKind::MissingRoot));
            };

            if b != b'<' {
                return Err(self.misplaced_content());
            }

            match self.cursor.peek(1) {
                Some(b'?') => self.skip_processing_instruction()?,
                Some(b'!') if self.cursor.starts_with(COMMENT_OPEN) => self.skip_comment()?,
                Some(b'!') if !self.seen_root && self.cursor.starts_with(DOCTYPE_OPEN) => {
                    self.skip_doctype()?;
                }
                _ if self.seen_root => return Err(self.misplaced_content()),
                _ => return self.start_tag().map(Some),
            }
        }
    }

    fn next_inside_root(&mut self) -> Result<Option<Event>> {
        loop {
            match (self.cursor.current(), self.cursor.peek(1)) {
                (None, _) => return Err(self.error_here(ErrorKind::UnexpectedEof)),
                (Some(b'<'), Some(b'/')) => return self.end_tag().map(Some),
                (Some(b'<'), Some(b'?')) => self.skip_processing_instruction()?,
                (Some(b'<'), Some(b'!')) => {
                    if self.cursor.starts_with(COMMENT_OPEN) {
                        self.skip_comment()?;
                    } else if self.cursor.starts_with(CDATA_OPEN) {
                        return self.cdata().map(Some);
                    } else {
                        return Err(self.message_here(
                            ErrorKind::InvalidToken,
                            "unexpected markup declaration",
                        ));
                    }
                }
                (Some(b'<'), _) => return self.start_tag().map(Some),
                (Some(_), _) => return self.text().map(Some),
            }
        }
    }

    fn start_tag(&mut self) -> Result<Event> {
        self.cursor.advance();
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;
        self.seen_root = true;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.pending_end = Some(name.clone());
        } else {
            self.expect_byte(b'>')?;
            self.open.push(name.clone());
        }

        Ok(Event::StartElement { name, attributes })
    }

    fn end_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.pop() {
            Some(expected) if expected == name => Ok(Event::EndElement { name }),
            Some(expected) => Err(Error::at(
                ErrorKind::MismatchedTag {
                    expected,
                    found: name,
                },
                start,
            )),
            None => Err(Error::at(ErrorKind::UnbalancedDocument, start)),
        }
    }

    fn text(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        let remaining = self.cursor.remaining();
        let len = self.cursor.find_byte(b'<').unwrap_or(remaining.len());
        let raw = remaining.get(..len).unwrap_or_default();
        self.cursor.advance_by(len);

        let text = to_str(raw, start)?;
        Ok(Event::Text(decode_entities(text, start)?.into_owned()))
    }

    fn cdata(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance_by(CDATA_OPEN.len());
        let Some(len) = self.cursor.find(b"]]>") else {
            return Err(self.unterminated(start, "CDATA section"));
        };
        let raw = self.cursor.remaining().get(..len).unwrap_or_default();
        self.cursor.advance_by(len + 3);

        Ok(Event::Text(to_str(raw, start)?.to_owned()))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::new(start_pos, start_pos),
                    "expected name",
                ));
            }
            None => return Err(Error::at(ErrorKind::UnexpectedEof, start_pos)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        to_str(self.cursor.slice_from(start), start_pos).map(str::to_owned)
    }

    fn parse_attributes(&mut self) -> Result<Attributes> {
        let mut attributes = Attributes::new();

        loop {
            let separated = self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => return Ok(attributes),
                Some(_) if !separated => {
                    return Err(self.message_here(
                        ErrorKind::InvalidToken,
                        "expected whitespace before attribute",
                    ));
                }
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attributes.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attributes.insert(name, value);
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let start = self.cursor.position();
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.message_here(
                    ErrorKind::InvalidToken,
                    "expected quoted attribute value",
                ));
            }
        };
        self.cursor.advance();

        let Some(len) = self.cursor.find_byte(quote) else {
            return Err(self.unterminated(start, "attribute value"));
        };
        let raw = self.cursor.remaining().get(..len).unwrap_or_default();
        if memchr(b'<', raw).is_some() {
            return Err(self.message_here(ErrorKind::InvalidToken, "'<' in attribute value"));
        }
        self.cursor.advance_by(len + 1);

        let text = normalize_attribute(to_str(raw, start)?);
        Ok(decode_entities(&text, start)?.into_owned())
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(COMMENT_OPEN.len());
        self.skip_past(b"-->", start, "comment")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        self.skip_past(b"?>", start, "processing instruction")
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(DOCTYPE_OPEN.len());

        let mut subset_depth = 0usize;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => subset_depth += 1,
                (None, b']') => subset_depth = subset_depth.saturating_sub(1),
                (None, b'>') if subset_depth == 0 => return Ok(()),
                _ => {}
            }
        }

        Err(self.unterminated(start, "DOCTYPE declaration"))
    }

    fn skip_past(&mut self, pattern: &[u8], start: Pos, what: &str) -> Result<()> {
        match self.cursor.find(pattern) {
            Some(len) => {
                self.cursor.advance_by(len + pattern.len());
                Ok(())
            }
            None => Err(self.unterminated(start, what)),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else if self.cursor.is_eof() {
            Err(self.error_here(ErrorKind::UnexpectedEof))
        } else {
            Err(self.message_here(
                ErrorKind::InvalidToken,
                format!("expected '{}'", char::from(expected)),
            ))
        }
    }

    fn misplaced_content(&self) -> Error {
        if self.seen_root {
            self.message_here(ErrorKind::InvalidToken, "content after root element")
        } else {
            self.message_here(ErrorKind::InvalidToken, "expected root element")
        }
    }

    fn unterminated(&self, start: Pos, what: &str) -> Error {
        Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::new(start, self.cursor.position()),
            format!("unterminated {what}"),
        )
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn message_here(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        let pos = self.cursor.position();
        Error::with_message(kind, Span::new(pos, pos), message)
    }
}

fn to_str(bytes: &[u8], pos: Pos) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

// Bytes >= 0x80 are accepted wholesale so non-ASCII names stay intact;
// UTF-8 validity is checked once the name is sliced out.
fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Replace literal tabs and line breaks in an attribute value with spaces.
/// A `\r\n` pair becomes a single space. Character references are decoded
/// afterwards, so `&#10;` still yields a newline.
fn normalize_attribute(raw: &str) -> Cow<'_, str> {
    if memchr3(b'\t', b'\n', b'\r', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}

/// Decode predefined and numeric character references
pub(crate) fn decode_entities(input: &str, pos: Pos) -> Result<Cow<'_, str>> {
    let Some(first) = memchr(b'&', input.as_bytes()) else {
        return Ok(Cow::Borrowed(input));
    };

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut next = Some(first);

    while let Some(amp) = next {
        let (before, tail) = rest.split_at(amp);
        out.push_str(before);

        let tail = tail.get(1..).unwrap_or_default();
        let Some(semi) = tail.find(';') else {
            return Err(invalid_entity(tail, pos));
        };
        let entity = tail.get(..semi).unwrap_or_default();
        let Some(ch) = resolve_entity(entity) else {
            return Err(invalid_entity(entity, pos));
        };
        out.push(ch);

        rest = tail.get(semi + 1..).unwrap_or_default();
        next = memchr(b'&', rest.as_bytes());
    }

    out.push_str(rest);
    Ok(Cow::Owned(out))
}

fn resolve_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                digits(hex, u8::is_ascii_hexdigit)
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            } else if let Some(dec) = entity.strip_prefix('#') {
                digits(dec, u8::is_ascii_digit).and_then(|dec| dec.parse::<u32>().ok())
            } else {
                None
            };
            code.and_then(char::from_u32).filter(|&ch| is_xml_char(ch))
        }
    }
}

/// `body` when it is non-empty and made only of accepted digits
fn digits(body: &str, accept: fn(&u8) -> bool) -> Option<&str> {
    (!body.is_empty() && body.bytes().all(|b| accept(&b))).then_some(body)
}

/// The XML `Char` production
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn invalid_entity(entity: &str, pos: Pos) -> Error {
    let entity: String = entity.chars().take(16).collect();
    Error::at(ErrorKind::InvalidEntity { entity }, pos)
}
