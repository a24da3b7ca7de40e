mod byte_cursor;
pub(crate) mod bytes;
mod utf16;

pub use self::byte_cursor::{ByteCursor, ORDINAL_MARKER, TITLE_ORDINAL_MARKER};
pub(crate) use self::utf16::{as_string, as_strings};
pub use self::utf16::{decode_utf16_lossy, encode_utf16, escape_utf16};
