use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::utils::{decode_utf16_lossy, encode_utf16};

/// A resource field that holds either a numeric ordinal or a UTF-16 string.
///
/// Used for resource types and names in the container header, and for the menu, class and
/// title fields of dialogs and their controls. Equality is variant-aware: an ordinal never
/// equals a string, even if the string spells the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StringOrId {
    Ordinal(u16),
    Text(Vec<u16>),
}

impl StringOrId {
    pub fn text(s: &str) -> Self {
        StringOrId::Text(encode_utf16(s))
    }

    pub fn as_ordinal(&self) -> Option<u16> {
        match self {
            StringOrId::Ordinal(id) => Some(*id),
            StringOrId::Text(_) => None,
        }
    }

    /// `true` for an empty string. Ordinals are never empty.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, StringOrId::Text(units) if units.is_empty())
    }

    /// Lookup comparison: ordinals compare by value, strings compare ASCII case-insensitively
    /// (the resource compiler stores names upper-cased).
    pub fn eq_ignore_case(&self, other: &StringOrId) -> bool {
        match (self, other) {
            (StringOrId::Ordinal(a), StringOrId::Ordinal(b)) => a == b,
            (StringOrId::Text(a), StringOrId::Text(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|(&x, &y)| ascii_upper(x) == ascii_upper(y))
            }
            _ => false,
        }
    }
}

#[inline]
fn ascii_upper(unit: u16) -> u16 {
    if (u16::from(b'a')..=u16::from(b'z')).contains(&unit) {
        unit - 0x20
    } else {
        unit
    }
}

impl fmt::Display for StringOrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringOrId::Ordinal(id) => write!(f, "{id}"),
            StringOrId::Text(units) => write!(f, "{}", decode_utf16_lossy(units)),
        }
    }
}

impl From<u16> for StringOrId {
    fn from(id: u16) -> Self {
        StringOrId::Ordinal(id)
    }
}

impl From<&str> for StringOrId {
    fn from(s: &str) -> Self {
        StringOrId::text(s)
    }
}

/// Parses a lookup key: a string made only of decimal digits that fits in a `u16` is an
/// ordinal, anything else is a name.
impl FromStr for StringOrId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = s.parse::<u16>() {
                return Ok(StringOrId::Ordinal(id));
            }
        }
        Ok(StringOrId::text(s))
    }
}

impl Serialize for StringOrId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StringOrId::Ordinal(id) => serializer.serialize_u16(*id),
            StringOrId::Text(units) => serializer.serialize_str(&decode_utf16_lossy(units)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_variant_aware() {
        assert_eq!(StringOrId::Ordinal(5), StringOrId::Ordinal(5));
        assert_ne!(StringOrId::Ordinal(5), StringOrId::text("5"));
        assert_eq!(StringOrId::text("OK"), StringOrId::Text(vec![0x4F, 0x4B]));
        assert_ne!(StringOrId::text("OK"), StringOrId::text("ok"));
    }

    #[test]
    fn test_only_empty_strings_are_empty_text() {
        assert!(StringOrId::text("").is_empty_text());
        assert!(!StringOrId::text("OK").is_empty_text());
        assert!(!StringOrId::Ordinal(0).is_empty_text());
    }

    #[test]
    fn test_lookup_comparison_ignores_ascii_case() {
        assert!(StringOrId::text("MainMenu").eq_ignore_case(&StringOrId::text("MAINMENU")));
        assert!(!StringOrId::text("MAIN").eq_ignore_case(&StringOrId::text("MAINMENU")));
        assert!(!StringOrId::Ordinal(1).eq_ignore_case(&StringOrId::text("1")));
    }

    #[test]
    fn test_parses_lookup_keys() {
        assert_eq!("100".parse::<StringOrId>().unwrap(), StringOrId::Ordinal(100));
        assert_eq!(
            "ABOUT_DLG".parse::<StringOrId>().unwrap(),
            StringOrId::text("ABOUT_DLG")
        );
        assert_eq!(
            "70000".parse::<StringOrId>().unwrap(),
            StringOrId::text("70000")
        );
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&StringOrId::Ordinal(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&StringOrId::text("Test")).unwrap(),
            "\"Test\""
        );
    }
}
