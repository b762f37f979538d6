//! Decoded tag values
//!
//! Every IFD entry is decoded into one closed `TagValue` variant, so
//! formatting and classification match on the variant instead of inspecting
//! runtime types.

use std::borrow::Cow;
use std::fmt;

/// Numerator/denominator pair from a RATIONAL or SRATIONAL field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Rational { numerator, denominator }
    }

    /// Decimal value, `None` for a zero denominator
    pub fn to_f64(&self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(self.numerator as f64 / self.denominator as f64)
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_f64() {
            Some(v) => write!(f, "{:?}", v),
            None => write!(f, "nan"),
        }
    }
}

/// One decoded tag value
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Integer(i64),
    Rational(Rational),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Multi-valued numeric field, rendered as a tuple
    Sequence(Vec<TagValue>),
    /// Nested sub-IFD (the GPS block)
    Directory(TagMap),
}

impl TagValue {
    /// Numeric value of a scalar, `None` for non-numeric variants and
    /// rationals with a zero denominator
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Integer(v) => Some(*v as f64),
            TagValue::Rational(r) => r.to_f64(),
            TagValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content of a Text or Bytes value with trailing NULs and
    /// whitespace removed
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            TagValue::Text(s) => Some(Cow::Borrowed(s.trim_end_matches(['\0', ' ']))),
            TagValue::Bytes(b) => {
                let text = String::from_utf8_lossy(b);
                Some(Cow::Owned(text.trim_end_matches(['\0', ' ']).to_string()))
            }
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&TagMap> {
        match self {
            TagValue::Directory(map) => Some(map),
            _ => None,
        }
    }

    /// Members of a Sequence; a scalar counts as a one-element sequence
    pub fn components(&self) -> Cow<'_, [TagValue]> {
        match self {
            TagValue::Sequence(items) => Cow::Borrowed(items.as_slice()),
            other => Cow::Owned(vec![other.clone()]),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TagValue::Integer(_) => "integer",
            TagValue::Rational(_) => "rational",
            TagValue::Float(_) => "float",
            TagValue::Text(_) => "text",
            TagValue::Bytes(_) => "bytes",
            TagValue::Sequence(_) => "sequence",
            TagValue::Directory(_) => "directory",
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Integer(v) => write!(f, "{}", v),
            TagValue::Rational(r) => write!(f, "{}", r),
            TagValue::Float(v) => write!(f, "{:?}", v),
            TagValue::Text(s) => write!(f, "{}", s),
            TagValue::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            TagValue::Sequence(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            TagValue::Directory(map) => {
                write!(f, "{{")?;
                for (i, (tag, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", tag, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Ordered tag id -> value mapping
///
/// Keeps file order. Inserting an id that is already present replaces the
/// value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    entries: Vec<(u16, TagValue)>,
}

impl TagMap {
    pub fn new() -> Self {
        TagMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, tag: u16, value: TagValue) {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((tag, value)),
        }
    }

    pub fn get(&self, tag: u16) -> Option<&TagValue> {
        self.entries.iter().find(|(t, _)| *t == tag).map(|(_, v)| v)
    }

    pub fn contains(&self, tag: u16) -> bool {
        self.get(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &TagValue)> {
        self.entries.iter().map(|(t, v)| (*t, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u16, TagValue)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (u16, TagValue)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (tag, value) in iter {
            map.insert(tag, value);
        }
        map
    }
}
