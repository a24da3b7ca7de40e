#![allow(dead_code)]
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use std::sync::Once;

use winres::{LangId, StringOrId};

static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .init();
    });
}

pub const GERMAN: LangId = LangId::new(0x07, 0x01);
pub const ENGLISH: LangId = LangId::MASTER;

fn push_word(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_dword(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_text(out: &mut Vec<u8>, s: &str) {
    for unit in s.encode_utf16() {
        push_word(out, unit);
    }
    push_word(out, 0);
}

fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

fn push_string_or_id(out: &mut Vec<u8>, value: &StringOrId) {
    match value {
        StringOrId::Ordinal(id) => {
            push_word(out, 0xFFFF);
            push_word(out, *id);
        }
        StringOrId::Text(units) => {
            for unit in units {
                push_word(out, *unit);
            }
            push_word(out, 0);
        }
    }
}

/// Writes `.res` containers the way `wrc` does: a 32 byte empty block first, then one
/// DWORD-aligned block per resource.
#[derive(Debug, Default)]
pub struct ResWriter {
    data: Vec<u8>,
}

impl ResWriter {
    pub fn new() -> Self {
        let mut w = ResWriter::default();
        w.push_block(&StringOrId::Ordinal(0), &StringOrId::Ordinal(0), LangId::from_raw(0), &[]);
        w
    }

    pub fn push_block(
        &mut self,
        res_type: &StringOrId,
        name: &StringOrId,
        lang: LangId,
        payload: &[u8],
    ) -> &mut Self {
        let mut header = Vec::new();
        push_string_or_id(&mut header, res_type);
        push_string_or_id(&mut header, name);
        // Type and name start at offset 8, so aligning the local buffer aligns the block.
        pad4(&mut header);
        push_dword(&mut header, 0);
        push_word(&mut header, 0x1030);
        push_word(&mut header, lang.raw());
        push_dword(&mut header, 0);
        push_dword(&mut header, 0);

        push_dword(&mut self.data, payload.len() as u32);
        push_dword(&mut self.data, header.len() as u32 + 8);
        self.data.extend_from_slice(&header);
        self.data.extend_from_slice(payload);
        pad4(&mut self.data);
        self
    }

    pub fn push(&mut self, type_code: u16, name: u16, lang: LangId, payload: &[u8]) -> &mut Self {
        self.push_block(
            &StringOrId::Ordinal(type_code),
            &StringOrId::Ordinal(name),
            lang,
            payload,
        )
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn write_to(&self, path: &Path) -> PathBuf {
        let mut f = File::create(path).unwrap();
        f.write_all(&self.data).unwrap();
        path.to_path_buf()
    }
}

/// A `STRINGTABLE` payload with the given `(slot, text)` pairs, every other slot empty.
pub fn string_table(slots: &[(usize, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..16 {
        let text = slots
            .iter()
            .find(|(slot, _)| *slot == i)
            .map_or("", |(_, s)| *s);
        let units: Vec<u16> = text.encode_utf16().collect();
        push_word(&mut out, units.len() as u16);
        for unit in units {
            push_word(&mut out, unit);
        }
    }
    out
}

pub enum MenuEntry<'a> {
    Popup(&'a str, Vec<MenuEntry<'a>>),
    Item(u16, &'a str),
}

/// A `MENU` payload for the given tree.
pub fn menu(entries: &[MenuEntry<'_>]) -> Vec<u8> {
    fn level(out: &mut Vec<u8>, entries: &[MenuEntry<'_>]) {
        for (i, entry) in entries.iter().enumerate() {
            let end = if i + 1 == entries.len() { 0x80 } else { 0 };
            match entry {
                MenuEntry::Popup(text, children) => {
                    push_word(out, 0x10 | end);
                    push_text(out, text);
                    level(out, children);
                }
                MenuEntry::Item(id, text) => {
                    push_word(out, end);
                    push_word(out, *id);
                    push_text(out, text);
                }
            }
        }
    }

    let mut out = Vec::new();
    push_word(&mut out, 0);
    push_word(&mut out, 0);
    level(&mut out, entries);
    out
}

/// A legacy `DIALOG` payload with `(id, text)` push buttons.
pub fn dialog(title: &str, controls: &[(u16, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_dword(&mut out, 0x80C8_0000);
    push_dword(&mut out, 0);
    push_word(&mut out, controls.len() as u16);
    for v in [0, 0, 186, 95] {
        push_word(&mut out, v);
    }
    push_string_or_id(&mut out, &StringOrId::Ordinal(0));
    push_string_or_id(&mut out, &StringOrId::Ordinal(0));
    push_text(&mut out, title);

    for (id, text) in controls {
        pad4(&mut out);
        push_dword(&mut out, 0x5001_0000);
        push_dword(&mut out, 0);
        for v in [7, 7, 50, 14] {
            push_word(&mut out, v);
        }
        push_word(&mut out, *id);
        push_string_or_id(&mut out, &StringOrId::Ordinal(0x80));
        push_text(&mut out, text);
        push_word(&mut out, 0);
    }
    out
}

/// A small container with English and German versions of a few resources, plus the locale
/// name tables.
pub fn sample_container() -> ResWriter {
    let mut w = ResWriter::new();
    w.push(6, 1, ENGLISH, &string_table(&[(0, "Open"), (1, "Close"), (2, "English (United States)")]))
        .push(6, 1, GERMAN, &string_table(&[(0, "Öffnen"), (1, ""), (2, "Deutsch (Deutschland)")]))
        .push(6, 257, GERMAN, &string_table(&[(1, "Deutsch")]))
        .push(
            4,
            1,
            ENGLISH,
            &menu(&[MenuEntry::Popup("&File", vec![MenuEntry::Item(1, "&Open")])]),
        )
        .push(
            4,
            1,
            GERMAN,
            &menu(&[MenuEntry::Popup(
                "&Datei",
                vec![MenuEntry::Item(1, "Ö&ffnen"), MenuEntry::Item(2, "&Beenden")],
            )]),
        )
        .push(5, 100, ENGLISH, &dialog("About", &[(1, "OK"), (2, "Cancel")]))
        .push(5, 100, GERMAN, &dialog("Info", &[(1, "OK"), (2, "Abbrechen")]))
        .push(5, 101, ENGLISH, &dialog("Options", &[]))
        .push_block(
            &StringOrId::text("MYDATA"),
            &StringOrId::text("BLOB"),
            ENGLISH,
            &[1, 2, 3],
        );
    w
}
