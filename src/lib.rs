#![forbid(unsafe_code)]
//! Reader for compiled Windows resource containers (`.res` files, as produced by `wrc` or `rc`),
//! with decoders for the resource types that carry translatable text and a differ that lines a
//! translated resource up with the same resource in a reference language.
//!
//! ```no_run
//! use winres::{Comparison, LangId, ResFile, ResourceKind, StringOrId};
//!
//! let file = ResFile::open("shell32.res").unwrap();
//! let german: LangId = "007:01".parse().unwrap();
//! let cmp = Comparison::load(
//!     &file,
//!     ResourceKind::RT_DIALOG,
//!     &StringOrId::Ordinal(100),
//!     german,
//!     LangId::MASTER,
//! )
//! .unwrap();
//!
//! for row in cmp.rows() {
//!     println!("{} {:?} {:?}", row.id, row.left, row.right);
//! }
//! ```

pub use diff::{DiffOp, aligned_indices, diff_sequences};
pub use err::{ResError, Result};
pub use langid::LangId;
pub use locale::{LocaleNames, languages};
pub use res_file::{ResBlock, ResBlocks, ResFile};
pub use res_header::ResourceHeader;
pub use resource::{
    Comparison, DiffCounts, Resource, ResourceKind, ResourceRow, ResourceRows, is_dumpable_type,
    resource_title, resource_type_name,
};
pub use string_or_id::StringOrId;

pub mod diff;
pub mod err;
mod langid;
mod locale;
mod res_file;
mod res_header;
pub mod resource;
mod string_or_id;
pub mod utils;
