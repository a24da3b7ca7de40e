//! Language display names, read from the locale string tables of a resource file.
//!
//! Every locale resource file carries a `STRINGTABLE` block 1 whose slot 2 is the language
//! name, and for neutral languages a block 257 whose slot 1 is the base language name.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use log::{debug, trace};

use crate::err::Result;
use crate::langid::LangId;
use crate::res_file::ResFile;
use crate::resource::{ResourceKind, StringTable};
use crate::string_or_id::StringOrId;
use crate::utils::decode_utf16_lossy;

/// `STRINGTABLE` block holding the localized language name in slot 2.
const LANGUAGE_NAME_TABLE: u16 = 1;
const LANGUAGE_NAME_SLOT: usize = 2;
/// `STRINGTABLE` block holding the neutral language name in slot 1.
const NEUTRAL_NAME_TABLE: u16 = 257;
const NEUTRAL_NAME_SLOT: usize = 1;

/// Display names of the languages found in a resource file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleNames {
    names: BTreeMap<LangId, String>,
}

impl LocaleNames {
    pub fn from_res_file(file: &ResFile) -> Result<Self> {
        let string_type = ResourceKind::StringTable.file_type();
        let mut names = BTreeMap::new();

        for block in file.blocks() {
            let block = block?;
            let header = &block.header;
            if header.res_type != string_type {
                continue;
            }

            let (table, slot, language, suffix) = match header.name {
                StringOrId::Ordinal(LANGUAGE_NAME_TABLE) => (
                    LANGUAGE_NAME_TABLE,
                    LANGUAGE_NAME_SLOT,
                    header.language,
                    "",
                ),
                StringOrId::Ordinal(NEUTRAL_NAME_TABLE) => (
                    NEUTRAL_NAME_TABLE,
                    NEUTRAL_NAME_SLOT,
                    header.language.base(),
                    " (Neutral)",
                ),
                _ => continue,
            };

            let strings = StringTable::from_buffer(block.data, table)?;
            let Some(name) = strings.get_string(slot) else {
                continue;
            };
            let name = format!("{}{suffix}", decode_utf16_lossy(name));
            trace!("language {language}: {name}");
            names.insert(language, name);
        }

        debug!("found {} language names", names.len());
        Ok(LocaleNames { names })
    }

    pub fn name(&self, language: LangId) -> Option<&str> {
        self.names.get(&language).map(String::as_str)
    }

    /// Display name, falling back to the `xxx:yy` form for unnamed languages.
    pub fn display_name(&self, language: LangId) -> String {
        self.name(language)
            .map(str::to_owned)
            .unwrap_or_else(|| language.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (LangId, &str)> {
        self.names.iter().map(|(lang, name)| (*lang, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Named languages sharing the primary language of `base`, other than `base` itself.
    pub fn sublangs(&self, base: LangId) -> Vec<LangId> {
        self.names
            .keys()
            .copied()
            .filter(|lang| lang.primary() == base.primary() && *lang != base)
            .collect()
    }
}

/// Visit every language that has at least one block in `file`.
pub fn languages(file: &ResFile) -> Result<Vec<LangId>> {
    let mut seen = Vec::new();
    file.enumerate(|header, _| {
        if !seen.contains(&header.language) {
            seen.push(header.language);
        }
        ControlFlow::Continue(())
    })?;
    seen.sort();
    Ok(seen)
}
