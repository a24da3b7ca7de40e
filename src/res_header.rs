use log::trace;
use serde::Serialize;

use crate::err::{ResError, Result};
use crate::langid::LangId;
use crate::string_or_id::StringOrId;
use crate::utils::{ByteCursor, ORDINAL_MARKER, bytes};

/// Size of the two leading size fields of every block.
pub const RES_BLOCK_PREFIX_SIZE: usize = 8;

/// The self-describing header in front of every resource block in a `.res` container.
///
/// ```text
/// DWORD   DataSize
/// DWORD   HeaderSize
/// SZ/ORD  Type
/// SZ/ORD  Name
/// (pad to DWORD)
/// DWORD   DataVersion
/// WORD    MemoryFlags
/// WORD    LanguageId
/// DWORD   Version
/// DWORD   Characteristics
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceHeader {
    /// Offset of the block in the container.
    pub offset: u64,
    pub data_size: u32,
    pub header_size: u32,
    #[serde(rename = "type")]
    pub res_type: StringOrId,
    pub name: StringOrId,
    pub data_version: u32,
    pub memory_options: u16,
    pub language: LangId,
    pub version: u32,
    pub characteristics: u32,
}

impl ResourceHeader {
    /// Parse the block header starting at `offset` in `container`.
    ///
    /// Also validates that the payload declared by the header is present.
    pub fn from_buffer(container: &[u8], offset: usize) -> Result<Self> {
        let corrupt = |message: &'static str| ResError::CorruptContainer {
            offset: offset as u64,
            message,
        };

        let data_size = bytes::read_u32_le(container, offset)
            .ok_or_else(|| corrupt("couldn't read block header"))?;
        let header_size = bytes::read_u32_le(container, offset + 4)
            .ok_or_else(|| corrupt("couldn't read block header"))?;

        if header_size as usize <= RES_BLOCK_PREFIX_SIZE {
            return Err(corrupt("block header size must be larger than 8"));
        }

        let header = bytes::slice_r(container, offset, header_size as usize, "resource header")
            .map_err(|_| corrupt("couldn't read block header"))?;

        let mut cursor = ByteCursor::with_pos(header, RES_BLOCK_PREFIX_SIZE)?;
        let parsed = Self::read_fields(&mut cursor, offset, data_size, header_size)
            .map_err(|_| corrupt("header fields exceed the declared header size"))?;

        if bytes::slice_r(
            container,
            parsed.payload_offset(),
            data_size as usize,
            "resource data",
        )
        .is_err()
        {
            return Err(corrupt("resource data extends past the end of the container"));
        }

        trace!(
            "block at {offset}: type={} name={} lang={} size={data_size}",
            parsed.res_type, parsed.name, parsed.language
        );

        Ok(parsed)
    }

    fn read_fields(
        cursor: &mut ByteCursor<'_>,
        offset: usize,
        data_size: u32,
        header_size: u32,
    ) -> Result<Self> {
        let res_type = cursor.string_or_id(ORDINAL_MARKER, "resource type")?;
        let name = cursor.string_or_id(ORDINAL_MARKER, "resource name")?;
        cursor.align4("resource header padding")?;

        Ok(ResourceHeader {
            offset: offset as u64,
            data_size,
            header_size,
            res_type,
            name,
            data_version: cursor.u32_named("data version")?,
            memory_options: cursor.u16_named("memory options")?,
            language: LangId::from_raw(cursor.u16_named("language")?),
            version: cursor.u32_named("version")?,
            characteristics: cursor.u32_named("characteristics")?,
        })
    }

    /// Offset of the payload in the container.
    pub fn payload_offset(&self) -> usize {
        self.offset as usize + self.header_size as usize
    }

    /// Number of bytes this block occupies in the container, including DWORD padding.
    pub fn footprint(&self) -> usize {
        bytes::align4(self.header_size as usize + self.data_size as usize)
    }
}
