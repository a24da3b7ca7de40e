use bitflags::bitflags;
use serde::Serialize;

use crate::diff::{aligned_indices, diff_sequences};
use crate::err::{ResError, Result};
use crate::resource::{ResourceRow, ResourceRows};
use crate::utils::{ByteCursor, escape_utf16};

bitflags! {
    /// `MF_*` item flags of a `MENU` template.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MenuFlags: u16 {
        const GRAYED = 0x0001;
        const DISABLED = 0x0002;
        const BITMAP = 0x0004;
        const CHECKED = 0x0008;
        const POPUP = 0x0010;
        const MENUBARBREAK = 0x0020;
        const MENUBREAK = 0x0040;
        const END = 0x0080;
        const OWNERDRAW = 0x0100;
        const SEPARATOR = 0x0800;
        const HELP = 0x4000;

        const _ = !0;
    }
}

impl MenuFlags {
    /// Bits describing the template structure rather than the item's appearance.
    pub const STRUCTURE: MenuFlags = MenuFlags::POPUP.union(MenuFlags::END);
    /// `MFT_DISABLED` in the resource compiler: either of the greyed/disabled bits.
    pub const INACTIVE: MenuFlags = MenuFlags::GRAYED.union(MenuFlags::DISABLED);
}

/// One item of a menu, with its position in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Display flags only, [`MenuFlags::STRUCTURE`] bits are cleared.
    pub state: u16,
    /// Command id, `0` for popups.
    pub id: u16,
    #[serde(serialize_with = "crate::utils::as_string::serialize")]
    pub text: Vec<u16>,
    /// Nesting depth, `0` for the menu bar.
    pub level: u32,
    pub is_popup: bool,
    /// Last item of its level.
    pub is_last: bool,
}

impl MenuItem {
    pub fn flags(&self) -> MenuFlags {
        MenuFlags::from_bits_retain(self.state)
    }

    pub fn is_separator(&self) -> bool {
        self.flags().contains(MenuFlags::SEPARATOR) || (self.text.is_empty() && !self.is_popup)
    }

    /// Items that should end up on the same row when comparing two menus.
    pub fn aligns_with(&self, other: &MenuItem) -> bool {
        self.id == other.id && self.level == other.level && self.is_popup == other.is_popup
    }

    fn title(&self) -> String {
        if self.is_separator() {
            return "SEPARATOR".to_owned();
        }

        let mut out = String::new();
        let flags = self.flags();
        if flags.contains(MenuFlags::CHECKED) {
            out.push_str("[x] ");
        }
        out.push_str(&escape_utf16(&self.text, true));
        if flags.intersects(MenuFlags::INACTIVE) {
            out.push_str(" (disabled)");
        }
        out
    }
}

/// A `MENU` template, flattened into pre-order.
///
/// ```text
/// WORD  version (0)
/// WORD  header size, skipped
/// items, recursively:
///   WORD   flags
///   WORD   id (absent for popups)
///   WCHAR  text, NUL-terminated
///   (if popup: the sub-menu items follow immediately)
/// ```
///
/// A level ends with the first item carrying `MF_END`. The tree can be rebuilt from
/// `level` and `is_popup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuResource {
    items: Vec<MenuItem>,
}

impl MenuResource {
    pub fn from_buffer(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let version = cursor.u16_named("menu version")?;
        let header_size = cursor.u16_named("menu header size")?;
        if version != 0 {
            return Err(ResError::UnsupportedVersion {
                what: "MENU",
                version,
            });
        }
        cursor.advance(usize::from(header_size), "menu header")?;

        let items = Self::parse_items(&mut cursor)?;
        cursor.expect_end(0, "MENU")?;

        Ok(MenuResource { items })
    }

    /// Reads items until the top level is closed.
    ///
    /// Nesting is tracked on the heap: `popups` holds, for every popup enclosing the current
    /// level, whether that popup was itself the last item of its own level.
    fn parse_items(cursor: &mut ByteCursor<'_>) -> Result<Vec<MenuItem>> {
        let mut items = Vec::new();
        let mut popups: Vec<bool> = Vec::new();

        loop {
            let flags = MenuFlags::from_bits_retain(cursor.u16_named("menu item flags")?);
            let is_popup = flags.contains(MenuFlags::POPUP);
            let is_last = flags.contains(MenuFlags::END);

            let id = if is_popup {
                0
            } else {
                cursor.u16_named("menu item id")?
            };
            let text = cursor.null_terminated_utf16("menu item text")?;

            items.push(MenuItem {
                state: flags.difference(MenuFlags::STRUCTURE).bits(),
                id,
                text,
                level: popups.len() as u32,
                is_popup,
                is_last,
            });

            if is_popup {
                popups.push(is_last);
                continue;
            }
            if !is_last {
                continue;
            }

            // The current level is closed. Close the enclosing ones that ended with it.
            loop {
                match popups.pop() {
                    None => return Ok(items),
                    Some(true) => {}
                    Some(false) => break,
                }
            }
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }
}

/// Tracks which tree levels still have siblings to come, to draw guide lines in front of
/// menu items.
#[derive(Debug, Clone)]
pub struct TreeGuides {
    open: Vec<bool>,
}

impl Default for TreeGuides {
    fn default() -> Self {
        TreeGuides { open: vec![true] }
    }
}

impl TreeGuides {
    const VERTICAL: &'static str = "│ ";
    const EMPTY: &'static str = "  ";
    const TEE: &'static str = "├ ";
    const ELL: &'static str = "└ ";

    /// Guides for `item`, or only the continuing vertical lines for a row with no item on
    /// this side.
    pub fn prefix(&mut self, item: Option<&MenuItem>) -> String {
        let depth = match item {
            Some(_) => self.open.len().saturating_sub(1),
            None => self.open.len(),
        };

        let mut out: String = self.open[..depth]
            .iter()
            .map(|&open| if open { Self::VERTICAL } else { Self::EMPTY })
            .collect();

        let Some(item) = item else {
            return out;
        };

        out.push_str(if item.is_last { Self::ELL } else { Self::TEE });

        match (item.is_popup, item.is_last) {
            (true, true) => {
                if let Some(last) = self.open.last_mut() {
                    *last = false;
                }
                self.open.push(true);
            }
            (true, false) => self.open.push(true),
            (false, true) => {
                self.open.pop();
                while self.open.last() == Some(&false) {
                    self.open.pop();
                }
            }
            (false, false) => {}
        }

        out
    }
}

impl ResourceRows for MenuResource {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn rows(&self, master: Option<&Self>) -> Vec<ResourceRow> {
        let mut guides = TreeGuides::default();

        let Some(master) = master else {
            return self
                .items
                .iter()
                .map(|item| {
                    let cell = guides.prefix(Some(item)) + &item.title();
                    ResourceRow::single(item.id.to_string(), cell)
                })
                .collect();
        };

        let ops = diff_sequences(&self.items, &master.items, MenuItem::aligns_with);
        let mut master_guides = TreeGuides::default();

        aligned_indices(&ops)
            .into_iter()
            .map(|(l, r)| {
                let this = l.map(|i| &self.items[i]);
                let other = r.map(|i| &master.items[i]);

                let id = this.or(other).map(|item| item.id).unwrap_or_default();
                let left = guides.prefix(this);
                let right = master_guides.prefix(other);

                let differs = match (this, other) {
                    (Some(a), Some(b)) => a.state != b.state,
                    _ => true,
                };

                ResourceRow::pair(
                    id.to_string(),
                    Some(left + &this.map(MenuItem::title).unwrap_or_default()),
                    Some(right + &other.map(MenuItem::title).unwrap_or_default()),
                    differs,
                    false,
                )
            })
            .collect()
    }
}
