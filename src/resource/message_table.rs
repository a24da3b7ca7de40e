use log::trace;
use serde::Serialize;

use crate::err::Result;
use crate::resource::{ResourceRow, ResourceRows, indexed_string_rows};
use crate::utils::{ByteCursor, bytes};

/// Size of the fixed part of the message table header.
const MESSAGE_TABLE_HEADER_SIZE: usize = 16;

/// A single message of a [`MessageTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    /// `1` for Unicode entries, `0` for ANSI. The text is always read as UTF-16.
    pub flags: u16,
    #[serde(serialize_with = "crate::utils::as_string::serialize")]
    pub text: Vec<u16>,
}

impl MessageEntry {
    pub fn is_unicode(&self) -> bool {
        self.flags & 1 != 0
    }
}

/// A `MESSAGETABLE` resource.
///
/// ```text
/// DWORD  (ignored) x3
/// DWORD  offset of the first entry
/// ...    remaining block descriptors, skipped
/// entries until the end of the payload:
///   WORD   entry length in bytes (including this header)
///   WORD   flags (0 = ANSI, 1 = Unicode)
///   WCHAR  text, NUL-terminated, padded up to the entry length
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTable {
    pub table_id: u16,
    messages: Vec<MessageEntry>,
}

impl MessageTable {
    pub fn from_buffer(data: &[u8], table_id: u16) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        for _ in 0..3 {
            let _ = cursor.u32_named("message table header")?;
        }
        let first_entry = cursor.u32_named("offset of first message")? as usize;
        let descriptors = first_entry.saturating_sub(MESSAGE_TABLE_HEADER_SIZE);
        cursor.advance(bytes::align4(descriptors), "message block descriptors")?;

        let mut messages = Vec::new();
        while !cursor.is_at_end() {
            let entry_start = cursor.pos();
            let length = usize::from(cursor.u16_named("message length")?);
            let flags = cursor.u16_named("message flags")?;
            let text = cursor.null_terminated_utf16("message text")?;

            let consumed = cursor.pos() - entry_start;
            if length > consumed {
                let padding = length - consumed;
                cursor.advance(padding + padding % 2, "message padding")?;
            }

            messages.push(MessageEntry { flags, text });
        }

        trace!("message table {table_id}: {} messages", messages.len());
        Ok(MessageTable { table_id, messages })
    }

    pub fn get_string(&self, index: usize) -> Option<&[u16]> {
        self.messages.get(index).map(|m| m.text.as_slice())
    }

    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn first_id(&self) -> i64 {
        (i64::from(self.table_id) - 1) * 16
    }

    fn texts(&self) -> Vec<Vec<u16>> {
        self.messages.iter().map(|m| m.text.clone()).collect()
    }
}

impl ResourceRows for MessageTable {
    fn item_count(&self) -> usize {
        self.messages.len()
    }

    fn rows(&self, master: Option<&Self>) -> Vec<ResourceRow> {
        let master_texts = master.map(MessageTable::texts);
        indexed_string_rows(self.first_id(), &self.texts(), master_texts.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::ResError;
    use pretty_assertions::assert_eq;

    fn entry(text: &str, pad_to: usize) -> Vec<u8> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let natural = 4 + units.len() * 2 + 2;
        let length = natural.max(pad_to);
        let mut out = Vec::new();
        out.extend_from_slice(&(length as u16).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
        out.resize(length, 0);
        out
    }

    fn table(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        // One block descriptor: NumberOfBlocks, LowId, HighId, OffsetToEntries.
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(entries.len() as u32 - 1).to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        for e in entries {
            out.extend_from_slice(e);
        }
        out
    }

    #[test]
    fn test_decodes_entries_until_end() {
        let data = table(&[entry("Success.\r\n", 0), entry("Failed", 24), entry("", 8)]);
        let messages = MessageTable::from_buffer(&data, 1).unwrap();
        assert_eq!(messages.item_count(), 3);
        assert_eq!(
            messages.get_string(0).unwrap(),
            "Success.\r\n".encode_utf16().collect::<Vec<_>>().as_slice()
        );
        assert_eq!(
            messages.get_string(1).unwrap(),
            "Failed".encode_utf16().collect::<Vec<_>>().as_slice()
        );
        assert_eq!(messages.get_string(2).unwrap(), &[] as &[u16]);
        assert!(messages.messages()[0].is_unicode());
    }

    #[test]
    fn test_skips_extra_block_descriptors() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&28u32.to_le_bytes());
        // Second descriptor, never interpreted.
        data.extend_from_slice(&[0xAA; 12]);
        data.extend_from_slice(&entry("Hi", 0));
        let messages = MessageTable::from_buffer(&data, 1).unwrap();
        assert_eq!(messages.item_count(), 1);
        assert_eq!(messages.get_string(0).unwrap(), &[0x48, 0x69]);
    }

    #[test]
    fn test_truncated_entry_is_out_of_data() {
        let mut data = table(&[entry("Hello", 0)]);
        data.truncate(data.len() - 2);
        assert!(matches!(
            MessageTable::from_buffer(&data, 1),
            Err(ResError::OutOfData { .. })
        ));
    }

    #[test]
    fn test_rows_cover_messages_missing_on_either_side() {
        let translated = MessageTable::from_buffer(&table(&[entry("Hallo", 0)]), 1).unwrap();
        let master =
            MessageTable::from_buffer(&table(&[entry("Hello", 0), entry("Bye", 0)]), 1).unwrap();
        let rows = translated.rows(Some(&master));
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].error);
        assert!(rows[1].error);
        assert_eq!(rows[1].left, None);
        assert_eq!(rows[1].right.as_deref(), Some("\"Bye\""));
    }
}
