use serde::Serialize;

use crate::err::Result;
use crate::resource::{ResourceRow, ResourceRows, indexed_string_rows};
use crate::utils::ByteCursor;

/// A `STRINGTABLE` block: 16 length-prefixed UTF-16 strings.
///
/// Block `n` holds the strings with ids `(n - 1) * 16 ..= (n - 1) * 16 + 15`; unused ids are
/// stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringTable {
    pub table_id: u16,
    #[serde(serialize_with = "crate::utils::as_strings::serialize")]
    strings: Vec<Vec<u16>>,
}

impl StringTable {
    pub const STRINGS_PER_TABLE: usize = 16;

    pub fn from_buffer(data: &[u8], table_id: u16) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let mut strings = Vec::with_capacity(Self::STRINGS_PER_TABLE);
        for _ in 0..Self::STRINGS_PER_TABLE {
            let len = cursor.u16_named("string length")?;
            strings.push(cursor.utf16_by_char_count(usize::from(len), "string")?);
        }
        cursor.expect_end(0, "STRINGTABLE")?;

        Ok(StringTable { table_id, strings })
    }

    /// Slot `index` (0..16) of the table.
    pub fn get_string(&self, index: usize) -> Option<&[u16]> {
        self.strings.get(index).map(Vec::as_slice)
    }

    pub fn strings(&self) -> &[Vec<u16>] {
        &self.strings
    }

    /// Resource id of the first string in this table.
    pub fn first_id(&self) -> i64 {
        (i64::from(self.table_id) - 1) * Self::STRINGS_PER_TABLE as i64
    }
}

impl ResourceRows for StringTable {
    fn item_count(&self) -> usize {
        self.strings.len()
    }

    fn rows(&self, master: Option<&Self>) -> Vec<ResourceRow> {
        indexed_string_rows(
            self.first_id(),
            &self.strings,
            master.map(|m| m.strings.as_slice()),
        )
    }
}
