use std::fmt::Write;

/// Decode UTF-16 code units until the first NUL (0x0000), if present.
///
/// Unpaired surrogates are replaced with U+FFFD; resource strings are displayed, never
/// round-tripped, so a lossy decode is fine.
pub fn decode_utf16_lossy(units: &[u16]) -> String {
    let end = units.iter().position(|&c| c == 0).unwrap_or(units.len());
    let slice = &units[..end];

    // Fast path: pure ASCII converts directly.
    if slice.iter().all(|&c| c <= 0x7F) {
        return slice.iter().map(|&c| c as u8 as char).collect();
    }

    String::from_utf16_lossy(slice)
}

/// Render UTF-16 code units as a printable, single-line string.
///
/// Letters, digits and spaces are kept as is, `\n`, `\t` and `\0` are written as escapes and
/// everything else is written as `\x{hex}` so that whitespace and lookalike differences between
/// two translations stay visible.
pub fn escape_utf16(units: &[u16], quoted: bool) -> String {
    let mut out = String::with_capacity(units.len() + 2);
    if quoted {
        out.push('"');
    }
    for &unit in units {
        match unit {
            0x30..=0x39 | 0x41..=0x5A | 0x61..=0x7A | 0x20 => out.push(unit as u8 as char),
            0x0A => out.push_str("\\n"),
            0x09 => out.push_str("\\t"),
            0x00 => out.push_str("\\0"),
            _ => match char::from_u32(u32::from(unit)) {
                Some(c) if c.is_alphanumeric() || c.is_ascii_punctuation() => {
                    out.push(c)
                }
                _ => {
                    let _ = write!(out, "\\x{{{unit:x}}}");
                }
            },
        }
    }
    if quoted {
        out.push('"');
    }
    out
}

/// `serde` helpers writing UTF-16 code units as JSON strings.
pub(crate) mod as_string {
    use serde::Serializer;

    pub(crate) fn serialize<S: Serializer>(units: &[u16], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::decode_utf16_lossy(units))
    }
}

pub(crate) mod as_strings {
    use serde::Serializer;
    use serde::ser::SerializeSeq;

    pub(crate) fn serialize<S: Serializer>(
        strings: &[Vec<u16>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(strings.len()))?;
        for units in strings {
            seq.serialize_element(&super::decode_utf16_lossy(units))?;
        }
        seq.end()
    }
}

/// Encode a `&str` as UTF-16 code units (no terminator).
pub fn encode_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}
