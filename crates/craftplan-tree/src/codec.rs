//! Compact string form of a [`ProductionPath`], carried in a URL between
//! requests.
//!
//! ```text
//! path     := segment ( '>' segment )? ( '~' group )?
//! group    := '(' pathList ')' | pathList
//! pathList := path ( '|' path )*
//! ```
//!
//! The first segment is the item, the optional second one the chosen source
//! key. A child list is read greedily, so the encoder wraps a node's child
//! list in parentheses only when that node has a following sibling.
//! `iron_pickaxe>crafting_shaped~iron_ingot` is a pickaxe crafted from an
//! unselected iron ingot.
//!
//! Segment bytes other than ASCII alphanumerics and `_ - . : /` are written
//! as `%XX`.

use crate::path::ProductionPath;
use std::fmt;
use std::str::FromStr;

/// Deepest nesting the decoder accepts.
pub const MAX_DEPTH: usize = 64;

/// Why a path string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathDecodeError {
    #[error("empty path string")]
    Empty,

    #[error("empty segment at byte {0}")]
    EmptySegment(usize),

    #[error("unbalanced group at byte {0}")]
    Unbalanced(usize),

    #[error("unexpected '{0}' at byte {1}")]
    UnexpectedChar(char, usize),

    #[error("invalid escape at byte {0}")]
    InvalidEscape(usize),

    #[error("path nested deeper than {max} levels", max = MAX_DEPTH)]
    TooDeep,

    #[error("item '{0}' repeats along one lineage")]
    RepeatedItem(String),
}

// ===========================================================================
// Encoding
// ===========================================================================

fn is_literal(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.' | b':' | b'/')
}

fn escape_into(out: &mut String, segment: &str) {
    for byte in segment.bytes() {
        if is_literal(byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
}

fn encode_node(out: &mut String, path: &ProductionPath, group_children: bool) {
    escape_into(out, path.item());
    if let Some(source) = path.source() {
        out.push('>');
        escape_into(out, source);
    }

    let children = path.requirements();
    if children.is_empty() {
        return;
    }
    out.push('~');
    if group_children {
        out.push('(');
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        let has_next = i + 1 < children.len();
        encode_node(out, child, has_next);
    }
    if group_children {
        out.push(')');
    }
}

/// Encode a path into its string form.
pub fn encode(path: &ProductionPath) -> String {
    let mut out = String::new();
    encode_node(&mut out, path, false);
    out
}

// ===========================================================================
// Decoding
// ===========================================================================

/// Decode a path string. Malformed input yields `None`.
pub fn decode(input: &str) -> Option<ProductionPath> {
    match input.parse() {
        Ok(path) => Some(path),
        Err(error) => {
            tracing::debug!(%error, input, "discarding malformed path");
            None
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Items of the ancestors of the node being parsed.
    lineage: Vec<String>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn hex_escape(&self) -> Option<u8> {
        let digits = self.input.get(self.pos + 1..self.pos + 3)?;
        let value = |d: u8| char::from(d).to_digit(16);
        Some((value(digits[0])? * 16 + value(digits[1])?) as u8)
    }

    fn segment(&mut self) -> Result<String, PathDecodeError> {
        let start = self.pos;
        let mut bytes = Vec::new();
        while let Some(byte) = self.peek() {
            match byte {
                b'>' | b'~' | b'|' | b'(' | b')' => break,
                b'%' => {
                    let decoded = self
                        .hex_escape()
                        .ok_or(PathDecodeError::InvalidEscape(self.pos))?;
                    bytes.push(decoded);
                    self.pos += 3;
                }
                _ => {
                    bytes.push(byte);
                    self.pos += 1;
                }
            }
        }
        if bytes.is_empty() {
            return Err(PathDecodeError::EmptySegment(start));
        }
        String::from_utf8(bytes).map_err(|_| PathDecodeError::InvalidEscape(start))
    }

    fn path(&mut self, depth: usize) -> Result<ProductionPath, PathDecodeError> {
        if depth > MAX_DEPTH {
            return Err(PathDecodeError::TooDeep);
        }

        let item = self.segment()?;
        if self.lineage.contains(&item) {
            return Err(PathDecodeError::RepeatedItem(item));
        }
        let source = if self.eat(b'>') {
            Some(self.segment()?)
        } else {
            None
        };

        let mut requirements = Vec::new();
        if self.eat(b'~') {
            self.lineage.push(item.clone());
            let open = self.pos;
            if self.eat(b'(') {
                requirements = self.list(depth)?;
                if !self.eat(b')') {
                    return Err(PathDecodeError::Unbalanced(open));
                }
            } else {
                requirements = self.list(depth)?;
            }
            self.lineage.pop();
        }

        Ok(ProductionPath::from_parts(item, source, requirements))
    }

    fn list(&mut self, depth: usize) -> Result<Vec<ProductionPath>, PathDecodeError> {
        let mut paths = vec![self.path(depth + 1)?];
        while self.eat(b'|') {
            paths.push(self.path(depth + 1)?);
        }
        Ok(paths)
    }
}

impl FromStr for ProductionPath {
    type Err = PathDecodeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(PathDecodeError::Empty);
        }
        let mut parser = Parser {
            input: input.as_bytes(),
            pos: 0,
            lineage: Vec::new(),
        };
        let path = parser.path(1)?;
        match parser.peek() {
            None => Ok(path),
            Some(b')') => Err(PathDecodeError::Unbalanced(parser.pos)),
            Some(_) => {
                let c = input[parser.pos..].chars().next().unwrap_or('\u{FFFD}');
                Err(PathDecodeError::UnexpectedChar(c, parser.pos))
            }
        }
    }
}

impl fmt::Display for ProductionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}
