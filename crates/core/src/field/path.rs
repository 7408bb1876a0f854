//! Dotted/indexed field paths.
//!
//! A path addresses a value nested inside a snapshot:
//! - `user.name` walks object keys
//! - `tags[0]` or `tags.0` walks into an array
//! - `meta["odd.key"]` quotes a key that contains separators

use crate::field::error::{FieldError, FieldResult};
use std::fmt;
use std::str::FromStr;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object key. Keys that look like canonical indices also address
    /// array elements.
    Key(String),
    /// An array index written in brackets.
    Index(usize),
}

impl Segment {
    /// The key used when this segment addresses an object.
    pub fn key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// The index used when this segment addresses an array.
    ///
    /// Only canonical non-negative integers (`0`, `17`, never `07`) count.
    pub fn index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => parse_index(key),
        }
    }
}

fn parse_index(raw: &str) -> Option<usize> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if canonical {
        raw.parse().ok()
    } else {
        None
    }
}

/// A parsed, non-empty field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a path such as `a.b[0].c`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyPath`] for an empty string and
    /// [`FieldError::Malformed`] for empty segments or unbalanced brackets.
    pub fn parse(input: &str) -> FieldResult<Self> {
        if input.is_empty() {
            return Err(FieldError::EmptyPath);
        }

        let malformed = |reason: &str| FieldError::Malformed {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut key = String::new();
        // True right after `]`, where a segment may end without a key.
        let mut after_bracket = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_bracket {
                        return Err(malformed("empty segment"));
                    }
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    }
                    if chars.peek().is_none() {
                        return Err(malformed("trailing separator"));
                    }
                    after_bracket = false;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !segments.is_empty() && !after_bracket {
                        return Err(malformed("empty segment"));
                    }

                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(malformed("unclosed bracket"));
                    }
                    segments.push(bracket_segment(&inner).ok_or_else(|| malformed("empty brackets"))?);

                    match chars.peek() {
                        None | Some('.') | Some('[') => {}
                        Some(_) => return Err(malformed("expected separator after bracket")),
                    }
                    after_bracket = true;
                }
                ']' => return Err(malformed("unexpected closing bracket")),
                _ => {
                    key.push(c);
                    after_bracket = false;
                }
            }
        }

        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }

        Ok(Self {
            raw: input.to_string(),
            segments,
        })
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn bracket_segment(inner: &str) -> Option<Segment> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return None;
    }

    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        return Some(Segment::Key(trimmed[1..trimmed.len() - 1].to_string()));
    }

    Some(match parse_index(trimmed) {
        Some(index) => Segment::Index(index),
        None => Segment::Key(trimmed.to_string()),
    })
}

impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Anything that can name a field.
///
/// Lets store and container methods take `&str`, `String` or an already
/// parsed [`FieldPath`].
pub trait IntoFieldPath {
    fn into_field_path(self) -> FieldResult<FieldPath>;
}

impl IntoFieldPath for FieldPath {
    fn into_field_path(self) -> FieldResult<FieldPath> {
        Ok(self)
    }
}

impl IntoFieldPath for &FieldPath {
    fn into_field_path(self) -> FieldResult<FieldPath> {
        Ok(self.clone())
    }
}

impl IntoFieldPath for &str {
    fn into_field_path(self) -> FieldResult<FieldPath> {
        FieldPath::parse(self)
    }
}

impl IntoFieldPath for String {
    fn into_field_path(self) -> FieldResult<FieldPath> {
        FieldPath::parse(&self)
    }
}

impl IntoFieldPath for &String {
    fn into_field_path(self) -> FieldResult<FieldPath> {
        FieldPath::parse(self)
    }
}
