use crate::err::{ResError, Result};
use crate::string_or_id::StringOrId;
use crate::utils::bytes;

/// Marker announcing an ordinal in a string-or-ordinal field (menu/class names, resource
/// type and name in the container header, control class and text).
pub const ORDINAL_MARKER: u16 = 0xFFFF;

/// Marker announcing an ordinal in the dialog title field.
///
/// The resource compiler output observed in the wild uses `FF 00` here rather than `FF FF`,
/// so the two are kept as separate per-field constants.
pub const TITLE_ORDINAL_MARKER: u16 = 0xFF00;

/// A lightweight cursor over an immutable byte slice.
///
/// This is the slice/offset equivalent of `Cursor<&[u8]>`: the payload is already in memory
/// and every read is bounds checked, failing with [`ResError::OutOfData`].
///
/// All reads are little-endian and advance the cursor on success.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteCursor { buf, pos: 0 }
    }

    #[inline]
    pub fn with_pos(buf: &'a [u8], pos: usize) -> Result<Self> {
        // Allow pos == len (EOF), reject pos > len.
        let _ = bytes::slice_r(buf, pos, 0, "cursor.position")?;
        Ok(Self { buf, pos })
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn advance(&mut self, n: usize, what: &'static str) -> Result<()> {
        let _ = self.take_bytes(n, what)?;
        Ok(())
    }

    #[inline]
    pub fn take_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        let out = bytes::slice_r(self.buf, self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    /// Skip padding up to the next DWORD boundary, measured from the start of the buffer.
    pub fn align4(&mut self, what: &'static str) -> Result<()> {
        let aligned = bytes::align4(self.pos);
        self.advance(aligned - self.pos, what)
    }

    #[inline]
    pub fn u8_named(&mut self, what: &'static str) -> Result<u8> {
        let b = bytes::read_u8_r(self.buf, self.pos, what)?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub fn u16_named(&mut self, what: &'static str) -> Result<u16> {
        let v = bytes::read_u16_le_r(self.buf, self.pos, what)?;
        self.pos += 2;
        Ok(v)
    }

    #[inline]
    pub fn u32_named(&mut self, what: &'static str) -> Result<u32> {
        let v = bytes::read_u32_le_r(self.buf, self.pos, what)?;
        self.pos += 4;
        Ok(v)
    }

    /// Read a `u16` `offset` bytes past the cursor without moving it.
    #[inline]
    pub fn peek_u16(&self, offset: usize, what: &'static str) -> Result<u16> {
        bytes::read_u16_le_r(self.buf, self.pos.saturating_add(offset), what)
    }

    /// Read `count` UTF-16 code units (no terminator).
    pub fn utf16_by_char_count(&mut self, count: usize, what: &'static str) -> Result<Vec<u16>> {
        let byte_len = count
            .checked_mul(2)
            .ok_or_else(|| bytes::out_of_data(what, self.pos, usize::MAX, self.buf.len()))?;
        let raw = self.take_bytes(byte_len, what)?;
        Ok(raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }

    /// Read UTF-16 code units until a NUL (0x0000) code unit is encountered.
    ///
    /// The terminator is consumed but not returned.
    pub fn null_terminated_utf16(&mut self, what: &'static str) -> Result<Vec<u16>> {
        let mut units = Vec::new();
        loop {
            let unit = self.u16_named(what)?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        Ok(units)
    }

    /// Read a string-or-ordinal field.
    ///
    /// If the two bytes at the cursor are `marker` (high byte first), 4 bytes are consumed and
    /// the trailing little-endian word is the ordinal. Otherwise the field is a NUL-terminated
    /// UTF-16 string.
    pub fn string_or_id(&mut self, marker: u16, what: &'static str) -> Result<StringOrId> {
        let hi = bytes::read_u8_r(self.buf, self.pos, what)?;
        let lo = bytes::read_u8_r(self.buf, self.pos + 1, what)?;

        if hi == (marker >> 8) as u8 && lo == (marker & 0xff) as u8 {
            let ordinal = bytes::read_u16_le_r(self.buf, self.pos + 2, what)?;
            self.pos += 4;
            return Ok(StringOrId::Ordinal(ordinal));
        }

        Ok(StringOrId::Text(self.null_terminated_utf16(what)?))
    }

    /// Fail with [`ResError::TrailingData`] if more than `tolerated` bytes remain.
    pub fn expect_end(&self, tolerated: usize, what: &'static str) -> Result<()> {
        let remaining = self.remaining();
        if remaining > tolerated {
            return Err(ResError::TrailingData { what, remaining });
        }
        Ok(())
    }
}
