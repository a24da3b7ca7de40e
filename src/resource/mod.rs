//! Decoders for the resource types that carry translatable text, and the row model used to
//! show a resource side by side with its reference-language counterpart.
//!
//! - `string_table`: `STRINGTABLE` blocks (16 strings each)
//! - `message_table`: `MESSAGETABLE` blocks
//! - `menu`: `MENU` templates (flattened pre-order item list)
//! - `dialog`: `DIALOG` / `DIALOGEX` templates

mod dialog;
mod menu;
mod message_table;
mod string_table;

use log::{debug, warn};
use serde::Serialize;

use crate::err::{ResError, Result};
use crate::langid::LangId;
use crate::res_file::ResFile;
use crate::res_header::ResourceHeader;
use crate::string_or_id::StringOrId;
use crate::utils::escape_utf16;

pub use dialog::{DialogControl, DialogFont, DialogResource, DialogStyle};
pub use menu::{MenuFlags, MenuItem, MenuResource, TreeGuides};
pub use message_table::{MessageEntry, MessageTable};
pub use string_table::StringTable;

/// `wrc` reports extended templates with this bit added to the type code.
pub const RES_TYPE_EX_FLAG: u16 = 0x100;

/// The resource type codes this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Menu,
    Dialog,
    DialogEx,
    StringTable,
    MessageTable,
}

impl ResourceKind {
    pub const RT_MENU: u16 = 4;
    pub const RT_DIALOG: u16 = 5;
    pub const RT_STRING: u16 = 6;
    pub const RT_MESSAGETABLE: u16 = 11;
    pub const RES_DIALOGEX: u16 = Self::RT_DIALOG | RES_TYPE_EX_FLAG;

    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            Self::RT_MENU => Ok(ResourceKind::Menu),
            Self::RT_DIALOG => Ok(ResourceKind::Dialog),
            Self::RES_DIALOGEX => Ok(ResourceKind::DialogEx),
            Self::RT_STRING => Ok(ResourceKind::StringTable),
            Self::RT_MESSAGETABLE => Ok(ResourceKind::MessageTable),
            _ => Err(ResError::UnsupportedResourceType { code }),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            ResourceKind::Menu => Self::RT_MENU,
            ResourceKind::Dialog => Self::RT_DIALOG,
            ResourceKind::DialogEx => Self::RES_DIALOGEX,
            ResourceKind::StringTable => Self::RT_STRING,
            ResourceKind::MessageTable => Self::RT_MESSAGETABLE,
        }
    }

    /// The type as stored in the container (without the extension bit).
    pub fn file_type(self) -> StringOrId {
        StringOrId::Ordinal(self.code() & 0xff)
    }
}

/// `true` for type codes that [`Resource::decode`] can handle.
pub fn is_dumpable_type(code: u16) -> bool {
    ResourceKind::from_code(code).is_ok()
}

/// Keyword used by resource scripts for a numeric type code.
pub fn resource_type_name(code: u16) -> Option<&'static str> {
    Some(match code {
        1 => "CURSOR",
        2 => "BITMAP",
        3 => "ICON",
        4 => "MENU",
        5 => "DIALOG",
        6 => "STRINGTABLE",
        7 => "FONTDIR",
        8 => "FONT",
        9 => "ACCELERATOR",
        10 => "RCDATA",
        11 => "MESSAGE",
        12 => "GROUP_CURSOR",
        14 => "GROUP_ICON",
        16 => "VERSION",
        260 => "MENUEX",
        261 => "DIALOGEX",
        262 => "USER",
        _ => return None,
    })
}

/// Human-readable title of a resource, e.g. `DIALOG #100` or `STRINGTABLE #2 (strings 16..31)`.
pub fn resource_title(code: u16, name: &StringOrId) -> String {
    let type_name = resource_type_name(code)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("TYPE{code}"));

    match name {
        StringOrId::Ordinal(id) if code == ResourceKind::RT_STRING => {
            let first = (i64::from(*id) - 1) * 16;
            format!("{type_name} #{id} (strings {first}..{})", first + 15)
        }
        StringOrId::Ordinal(id) => format!("{type_name} #{id}"),
        StringOrId::Text(_) => format!("{type_name} {name}"),
    }
}

/// One row of a (possibly side-by-side) resource listing.
///
/// `left` is the resource being inspected, `right` the reference-language one. A side is `None`
/// when the row has no item on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    pub id: String,
    pub left: Option<String>,
    pub right: Option<String>,
    /// Flagged by the strict check (missing/extra content, structural mismatch).
    pub error: bool,
    /// Flagged by the pedantic check, which additionally reports likely untranslated text.
    pub warning: bool,
}

impl ResourceRow {
    pub(crate) fn single(id: impl Into<String>, left: String) -> Self {
        ResourceRow {
            id: id.into(),
            left: Some(left),
            right: None,
            error: false,
            warning: false,
        }
    }

    pub(crate) fn pair(
        id: impl Into<String>,
        left: Option<String>,
        right: Option<String>,
        error: bool,
        warning: bool,
    ) -> Self {
        ResourceRow {
            id: id.into(),
            left,
            right,
            error,
            warning: error || warning,
        }
    }

    pub fn differs(&self, pedantic: bool) -> bool {
        if pedantic { self.warning } else { self.error }
    }
}

/// Number of rows flagged by the strict (`errors`) and pedantic (`warnings`) checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl DiffCounts {
    pub fn from_rows(rows: &[ResourceRow]) -> Self {
        rows.iter().fold(DiffCounts::default(), |mut acc, row| {
            acc.errors += usize::from(row.error);
            acc.warnings += usize::from(row.warning);
            acc
        })
    }
}

/// Shared capability of every decoded resource: produce listing rows, optionally aligned with
/// the same resource in the reference language.
pub trait ResourceRows {
    /// Number of items (strings, messages, menu items, controls).
    fn item_count(&self) -> usize;

    fn rows(&self, master: Option<&Self>) -> Vec<ResourceRow>;

    fn diff_counts(&self, master: &Self) -> DiffCounts {
        DiffCounts::from_rows(&self.rows(Some(master)))
    }
}

/// Text cell for a string item: escaped and quoted, or `empty`.
pub(crate) fn string_cell(units: &[u16]) -> String {
    if units.is_empty() {
        "empty".to_owned()
    } else {
        escape_utf16(units, true)
    }
}

/// Text cell for a string-or-ordinal field: the number for ordinals, the escaped string
/// otherwise.
pub(crate) fn string_or_id_cell(value: &StringOrId) -> String {
    match value {
        StringOrId::Ordinal(id) => id.to_string(),
        StringOrId::Text(units) => escape_utf16(units, true),
    }
}

/// Strict/pedantic check shared by string and message tables. A missing entry counts as empty.
///
/// Strict: exactly one side is empty. Pedantic: also both sides non-empty and identical, which
/// usually means the string was copied without being translated.
pub(crate) fn is_string_different(this: &[u16], other: &[u16], pedantic: bool) -> bool {
    let generic = this.is_empty() != other.is_empty();
    if !pedantic {
        return generic;
    }
    generic || (!this.is_empty() && this == other)
}

/// Rows for index-aligned string collections (string and message tables).
pub(crate) fn indexed_string_rows(
    first_id: i64,
    left: &[Vec<u16>],
    right: Option<&[Vec<u16>]>,
) -> Vec<ResourceRow> {
    let Some(right) = right else {
        return left
            .iter()
            .enumerate()
            .map(|(i, s)| ResourceRow::single((first_id + i as i64).to_string(), string_cell(s)))
            .collect();
    };

    let count = left.len().max(right.len());
    (0..count)
        .map(|i| {
            let this = left.get(i).map(Vec::as_slice);
            let other = right.get(i).map(Vec::as_slice);
            let this_units = this.unwrap_or(&[]);
            let other_units = other.unwrap_or(&[]);
            ResourceRow::pair(
                (first_id + i as i64).to_string(),
                this.map(string_cell),
                other.map(string_cell),
                is_string_different(this_units, other_units, false),
                is_string_different(this_units, other_units, true),
            )
        })
        .collect()
}

/// A decoded resource of one of the supported types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "resource")]
pub enum Resource {
    StringTable(StringTable),
    MessageTable(MessageTable),
    Menu(MenuResource),
    Dialog(DialogResource),
}

impl Resource {
    /// Decode a payload of the given kind. `name` is the block name, used to number the
    /// strings of string and message tables.
    pub fn decode(kind: ResourceKind, name: &StringOrId, data: &[u8]) -> Result<Self> {
        let table_id = name.as_ordinal().unwrap_or(0);
        let resource = match kind {
            ResourceKind::StringTable => {
                Resource::StringTable(StringTable::from_buffer(data, table_id)?)
            }
            ResourceKind::MessageTable => {
                Resource::MessageTable(MessageTable::from_buffer(data, table_id)?)
            }
            ResourceKind::Menu => Resource::Menu(MenuResource::from_buffer(data)?),
            ResourceKind::Dialog | ResourceKind::DialogEx => {
                Resource::Dialog(DialogResource::from_buffer(data)?)
            }
        };
        debug!(
            "decoded {kind:?} {name}: {} items",
            resource.item_count()
        );
        Ok(resource)
    }

    /// Look up and decode a resource. `code` may carry the extension bit (e.g. 261 for
    /// `DIALOGEX`); it is masked off for the container lookup.
    pub fn load(
        file: &ResFile,
        code: u16,
        name: &StringOrId,
        language: LangId,
    ) -> Result<(ResourceHeader, Resource)> {
        let kind = ResourceKind::from_code(code)?;
        let block = file.lookup(&kind.file_type(), name, language)?;
        let resource = Resource::decode(kind, name, block.data)?;
        Ok((block.header, resource))
    }

    pub fn item_count(&self) -> usize {
        match self {
            Resource::StringTable(r) => r.item_count(),
            Resource::MessageTable(r) => r.item_count(),
            Resource::Menu(r) => r.item_count(),
            Resource::Dialog(r) => r.item_count(),
        }
    }

    /// Listing rows, aligned with `master` if given.
    ///
    /// A master of a different kind can't be aligned and is ignored.
    pub fn rows(&self, master: Option<&Resource>) -> Vec<ResourceRow> {
        match (self, master) {
            (Resource::StringTable(r), Some(Resource::StringTable(m))) => r.rows(Some(m)),
            (Resource::MessageTable(r), Some(Resource::MessageTable(m))) => r.rows(Some(m)),
            (Resource::Menu(r), Some(Resource::Menu(m))) => r.rows(Some(m)),
            (Resource::Dialog(r), Some(Resource::Dialog(m))) => r.rows(Some(m)),
            (_, master) => {
                if master.is_some() {
                    warn!("reference resource has a different type, showing it unaligned");
                }
                match self {
                    Resource::StringTable(r) => r.rows(None),
                    Resource::MessageTable(r) => r.rows(None),
                    Resource::Menu(r) => r.rows(None),
                    Resource::Dialog(r) => r.rows(None),
                }
            }
        }
    }

    pub fn diff_counts(&self, master: &Resource) -> DiffCounts {
        DiffCounts::from_rows(&self.rows(Some(master)))
    }
}

/// A resource loaded together with the same resource in the reference language.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub header: ResourceHeader,
    pub resource: Resource,
    pub master_header: ResourceHeader,
    pub master: Resource,
}

impl Comparison {
    /// Load `name` in `language` and in `master_language`.
    ///
    /// Fails with [`ResError::NotFound`] if the translated resource is missing and with
    /// [`ResError::ResourceMissingForCompare`] if only the reference one is.
    pub fn load(
        file: &ResFile,
        code: u16,
        name: &StringOrId,
        language: LangId,
        master_language: LangId,
    ) -> Result<Self> {
        let (header, resource) = Resource::load(file, code, name, language)?;
        let (master_header, master) = Resource::load(file, code, name, master_language)
            .map_err(|e| match e {
                ResError::NotFound { key } => ResError::ResourceMissingForCompare { key },
                other => other,
            })?;

        Ok(Comparison {
            header,
            resource,
            master_header,
            master,
        })
    }

    pub fn rows(&self) -> Vec<ResourceRow> {
        self.resource.rows(Some(&self.master))
    }

    pub fn diff_counts(&self) -> DiffCounts {
        self.resource.diff_counts(&self.master)
    }
}
