use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::err::ResError;

/// A packed Windows language id: primary language in the low 10 bits, sublanguage in the
/// high 6 bits.
///
/// The text form is `PPP:SS` in lowercase hex, e.g. `009:01` for English (US) and `009:00`
/// for neutral English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LangId(u16);

impl LangId {
    /// English (US), the language translations are compared against by default.
    pub const MASTER: LangId = LangId::new(0x009, 0x01);

    pub const fn new(primary: u16, sublang: u16) -> Self {
        LangId((primary & 0x3ff) | ((sublang & 0x3f) << 10))
    }

    pub const fn from_raw(raw: u16) -> Self {
        LangId(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn primary(self) -> u16 {
        self.0 & 0x3ff
    }

    pub const fn sublang(self) -> u16 {
        self.0 >> 10
    }

    /// The neutral variant of this language (sublanguage 0).
    pub const fn base(self) -> LangId {
        LangId::new(self.primary(), 0)
    }

    pub const fn is_neutral(self) -> bool {
        self.sublang() == 0
    }
}

impl fmt::Display for LangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03x}:{:02x}", self.primary(), self.sublang())
    }
}

impl FromStr for LangId {
    type Err = ResError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResError::InvalidLangId {
            value: s.to_owned(),
        };

        let (primary, sublang) = s.split_once(':').ok_or_else(invalid)?;
        if primary.len() != 3 || sublang.len() != 2 {
            return Err(invalid());
        }
        let primary = u16::from_str_radix(primary, 16).map_err(|_| invalid())?;
        let sublang = u16::from_str_radix(sublang, 16).map_err(|_| invalid())?;
        if primary > 0x3ff || sublang > 0x3f {
            return Err(invalid());
        }

        Ok(LangId::new(primary, sublang))
    }
}

impl From<u16> for LangId {
    fn from(raw: u16) -> Self {
        LangId(raw)
    }
}

impl Serialize for LangId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
