use bitflags::bitflags;
use log::trace;
use serde::Serialize;

use crate::diff::{aligned_indices, diff_sequences};
use crate::err::Result;
use crate::resource::{ResourceRow, ResourceRows, string_or_id_cell};
use crate::string_or_id::StringOrId;
use crate::utils::{ByteCursor, ORDINAL_MARKER, TITLE_ORDINAL_MARKER, escape_utf16};

bitflags! {
    /// `DS_*` dialog styles (the low word of the window style).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DialogStyle: u32 {
        const ABSALIGN = 0x0001;
        const SYSMODAL = 0x0002;
        const LOCALEDIT = 0x0020;
        const SETFONT = 0x0040;
        const MODALFRAME = 0x0080;
        const NOIDLEMSG = 0x0100;
        const SETFOREGROUND = 0x0200;

        const _ = !0;
    }
}

/// `BS_MULTILINE`; translations may toggle it on buttons to fit longer labels.
const BS_MULTILINE: u32 = 0x2000;
/// Predefined class ordinal of `BUTTON`.
const BUTTON_CLASS: u16 = 0x80;

/// Signature words at the start of a `DIALOGEX` template.
const DIALOGEX_SIGNATURE: (u16, u16) = (1, 0xFFFF);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogFont {
    pub size: u16,
    /// Only stored by `DIALOGEX` templates.
    pub weight: u16,
    pub italic: u8,
    pub charset: u8,
    #[serde(serialize_with = "crate::utils::as_string::serialize")]
    pub name: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogControl {
    pub help_id: u32,
    pub ex_style: u32,
    pub style: u32,
    pub x: i16,
    pub y: i16,
    pub cx: i16,
    pub cy: i16,
    pub id: u32,
    pub class: StringOrId,
    pub text: StringOrId,
}

impl DialogControl {
    /// Style with the bits a translation may legitimately change masked in.
    fn comparable_style(&self) -> u32 {
        if self.class == StringOrId::Ordinal(BUTTON_CLASS) {
            self.style | BS_MULTILINE
        } else {
            self.style
        }
    }

    /// Whether a translated control should be flagged against its reference counterpart.
    ///
    /// Controls must keep their id, styles and class. The text must stay an ordinal (with the
    /// same value) or stay a string, and must not be emptied or filled in. In pedantic mode a
    /// non-empty text equal on both sides is also reported.
    pub fn is_different(&self, other: &DialogControl, pedantic: bool) -> bool {
        let text_shape = match (&self.text, &other.text) {
            (StringOrId::Ordinal(a), StringOrId::Ordinal(b)) => a != b,
            (StringOrId::Text(_), StringOrId::Text(_)) => {
                self.text.is_empty_text() != other.text.is_empty_text()
            }
            _ => true,
        };

        let generic = self.id != other.id
            || self.comparable_style() != other.comparable_style()
            || self.ex_style != other.ex_style
            || self.class != other.class
            || text_shape;

        if !pedantic || generic {
            return generic;
        }

        matches!((&self.text, &other.text),
            (StringOrId::Text(a), StringOrId::Text(b)) if !a.is_empty() && a == b)
    }

    fn row_text(&self, extended: bool) -> String {
        let mut out = format!(
            "    CONTROL {}, {}, {}, 0x{:x}, {}, {}, {}, {}, 0x{:x}",
            string_or_id_cell(&self.text),
            self.id,
            string_or_id_cell(&self.class),
            self.style,
            self.x,
            self.y,
            self.cx,
            self.cy,
            self.ex_style
        );
        if extended && self.help_id != 0 {
            out.push_str(&format!(", {}", self.help_id));
        }
        out
    }
}

/// A `DIALOG` or `DIALOGEX` template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogResource {
    pub extended: bool,
    pub style: u32,
    pub ex_style: u32,
    pub help_id: u32,
    pub x: i16,
    pub y: i16,
    pub cx: i16,
    pub cy: i16,
    pub menu: StringOrId,
    pub class: StringOrId,
    pub title: StringOrId,
    pub font: Option<DialogFont>,
    controls: Vec<DialogControl>,
}

impl DialogResource {
    pub fn from_buffer(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let signature = (
            cursor.peek_u16(0, "dialog signature")?,
            cursor.peek_u16(2, "dialog version")?,
        );
        let extended = signature == DIALOGEX_SIGNATURE;

        let (help_id, ex_style, style) = if extended {
            cursor.advance(4, "dialog signature")?;
            let help_id = cursor.u32_named("dialog help id")?;
            let ex_style = cursor.u32_named("dialog exstyle")?;
            let style = cursor.u32_named("dialog style")?;
            (help_id, ex_style, style)
        } else {
            let style = cursor.u32_named("dialog style")?;
            let ex_style = cursor.u32_named("dialog exstyle")?;
            (0, ex_style, style)
        };

        let control_count = cursor.u16_named("dialog item count")?;
        let x = cursor.u16_named("dialog x")? as i16;
        let y = cursor.u16_named("dialog y")? as i16;
        let cx = cursor.u16_named("dialog cx")? as i16;
        let cy = cursor.u16_named("dialog cy")? as i16;

        let menu = cursor.string_or_id(ORDINAL_MARKER, "dialog menu")?;
        let class = cursor.string_or_id(ORDINAL_MARKER, "dialog class")?;
        let title = cursor.string_or_id(TITLE_ORDINAL_MARKER, "dialog title")?;

        let font = if DialogStyle::from_bits_retain(style).contains(DialogStyle::SETFONT) {
            Some(Self::read_font(&mut cursor, extended)?)
        } else {
            None
        };

        let mut controls = Vec::with_capacity(usize::from(control_count));
        for _ in 0..control_count {
            controls.push(Self::read_control(&mut cursor, extended)?);
        }

        trace!(
            "dialog (extended: {extended}): {} controls, {} bytes left",
            controls.len(),
            cursor.remaining()
        );
        cursor.expect_end(3, "DIALOG")?;

        Ok(DialogResource {
            extended,
            style,
            ex_style,
            help_id,
            x,
            y,
            cx,
            cy,
            menu,
            class,
            title,
            font,
            controls,
        })
    }

    fn read_font(cursor: &mut ByteCursor<'_>, extended: bool) -> Result<DialogFont> {
        let size = cursor.u16_named("font size")?;
        let (weight, italic, charset) = if extended {
            (
                cursor.u16_named("font weight")?,
                cursor.u8_named("font italic")?,
                cursor.u8_named("font charset")?,
            )
        } else {
            (0, 0, 0)
        };
        let name = cursor.null_terminated_utf16("font name")?;

        Ok(DialogFont {
            size,
            weight,
            italic,
            charset,
            name,
        })
    }

    fn read_control(cursor: &mut ByteCursor<'_>, extended: bool) -> Result<DialogControl> {
        cursor.align4("control padding")?;

        let (help_id, ex_style, style) = if extended {
            let help_id = cursor.u32_named("control help id")?;
            let ex_style = cursor.u32_named("control exstyle")?;
            let style = cursor.u32_named("control style")?;
            (help_id, ex_style, style)
        } else {
            let style = cursor.u32_named("control style")?;
            let ex_style = cursor.u32_named("control exstyle")?;
            (0, ex_style, style)
        };

        let x = cursor.u16_named("control x")? as i16;
        let y = cursor.u16_named("control y")? as i16;
        let cx = cursor.u16_named("control cx")? as i16;
        let cy = cursor.u16_named("control cy")? as i16;
        let id = if extended {
            cursor.u32_named("control id")?
        } else {
            u32::from(cursor.u16_named("control id")?)
        };

        let class = cursor.string_or_id(ORDINAL_MARKER, "control class")?;
        let text = cursor.string_or_id(ORDINAL_MARKER, "control text")?;

        let extra = cursor.u16_named("control extra data size")?;
        cursor.advance(usize::from(extra), "control extra data")?;

        Ok(DialogControl {
            help_id,
            ex_style,
            style,
            x,
            y,
            cx,
            cy,
            id,
            class,
            text,
        })
    }

    pub fn controls(&self) -> &[DialogControl] {
        &self.controls
    }

    pub fn get(&self, index: usize) -> Option<&DialogControl> {
        self.controls.get(index)
    }

    fn header_text(&self) -> String {
        let keyword = if self.extended { "DIALOGEX" } else { "DIALOG" };
        let mut out = format!("{keyword} {}, {}, {}, {}", self.x, self.y, self.cx, self.cy);
        if self.extended {
            out.push_str(&format!(", {}", self.help_id));
        }
        out
    }

    fn font_text(&self) -> String {
        match &self.font {
            None => "(no font)".to_owned(),
            Some(font) if self.extended => format!(
                "FONT {}, {}, {}, {}",
                font.size,
                escape_utf16(&font.name, true),
                font.weight,
                font.italic
            ),
            Some(font) => format!("FONT {}, {}", font.size, escape_utf16(&font.name, true)),
        }
    }

    /// Cells of the fixed rows shown before the controls.
    fn header_cells(&self) -> [String; 7] {
        [
            self.header_text(),
            format!("STYLE 0x{:x}", self.style),
            format!("EXSTYLE 0x{:x}", self.ex_style),
            format!("CAPTION {}", string_or_id_cell(&self.title)),
            format!("CLASS {}", string_or_id_cell(&self.class)),
            format!("MENU {}", string_or_id_cell(&self.menu)),
            self.font_text(),
        ]
    }

    /// Which of the [`header_cells`](Self::header_cells) differ from `master`. The caption
    /// and font are expected to be localized.
    fn header_differences(&self, master: &DialogResource) -> [bool; 7] {
        [
            false,
            self.style != master.style,
            self.ex_style != master.ex_style,
            false,
            self.class != master.class,
            self.menu != master.menu,
            false,
        ]
    }

    fn header_rows(&self, master: Option<&Self>) -> Vec<ResourceRow> {
        let Some(master) = master else {
            return self
                .header_cells()
                .into_iter()
                .map(|cell| ResourceRow::single("", cell))
                .collect();
        };

        self.header_cells()
            .into_iter()
            .zip(master.header_cells())
            .zip(self.header_differences(master))
            .map(|((left, right), differs)| {
                ResourceRow::pair("", Some(left), Some(right), differs, false)
            })
            .collect()
    }
}

impl ResourceRows for DialogResource {
    fn item_count(&self) -> usize {
        self.controls.len()
    }

    fn rows(&self, master: Option<&Self>) -> Vec<ResourceRow> {
        let mut rows = self.header_rows(master);

        let Some(master) = master else {
            rows.extend(self.controls.iter().map(|control| {
                ResourceRow::single(control.id.to_string(), control.row_text(self.extended))
            }));
            return rows;
        };

        let ops = diff_sequences(&self.controls, &master.controls, |a, b| a.id == b.id);
        rows.extend(aligned_indices(&ops).into_iter().map(|(l, r)| {
            let this = l.map(|i| &self.controls[i]);
            let other = r.map(|i| &master.controls[i]);

            let (error, warning) = match (this, other) {
                (Some(a), Some(b)) => (a.is_different(b, false), a.is_different(b, true)),
                _ => (true, true),
            };
            let id = this.or(other).map(|c| c.id).unwrap_or_default();

            ResourceRow::pair(
                id.to_string(),
                this.map(|c| c.row_text(self.extended)),
                other.map(|c| c.row_text(master.extended)),
                error,
                warning,
            )
        }));
        rows
    }
}
