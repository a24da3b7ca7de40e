//! Byte-slice utilities for bounds-oriented parsing.
//!
//! Two layers, same as everywhere else in the crate:
//! - **Option layer** (`read_*`): helpers that return `Option<T>`.
//! - **Result layer** (`*_r`): wrappers that map `None` to `ResError::OutOfData`.
//!
//! All numeric reads are **little-endian** (`.res` containers are produced for x86 Windows).

use byteorder::{ByteOrder, LittleEndian};

use crate::err::ResError;

/// Read a single byte at `offset`.
pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Read a `u16` (little-endian) at `offset`.
pub(crate) fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    buf.get(offset..end).map(LittleEndian::read_u16)
}

/// Read a `u32` (little-endian) at `offset`.
pub(crate) fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    buf.get(offset..end).map(LittleEndian::read_u32)
}

#[inline]
pub(crate) fn out_of_data(what: &'static str, offset: usize, need: usize, len: usize) -> ResError {
    ResError::OutOfData {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], ResError> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| out_of_data(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| out_of_data(what, offset, len, buf.len()))
}

/// Read a byte at `offset`, or return `ResError::OutOfData`.
pub(crate) fn read_u8_r(buf: &[u8], offset: usize, what: &'static str) -> Result<u8, ResError> {
    read_u8(buf, offset).ok_or_else(|| out_of_data(what, offset, 1, buf.len()))
}

/// Read a `u16` (little-endian) at `offset`, or return `ResError::OutOfData`.
pub(crate) fn read_u16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u16, ResError> {
    read_u16_le(buf, offset).ok_or_else(|| out_of_data(what, offset, 2, buf.len()))
}

/// Read a `u32` (little-endian) at `offset`, or return `ResError::OutOfData`.
pub(crate) fn read_u32_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u32, ResError> {
    read_u32_le(buf, offset).ok_or_else(|| out_of_data(what, offset, 4, buf.len()))
}

/// Round `value` up to the next multiple of 4 (DWORD alignment).
#[inline]
pub(crate) fn align4(value: usize) -> usize {
    (value + 3) & !3
}
