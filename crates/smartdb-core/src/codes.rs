//! Fixed code tables shared with the C consumer of the generated table.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Interpretation of an attribute's 48-bit raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RawEncoding {
    Hex48,
    #[default]
    Dec48,
}

impl RawEncoding {
    /// Every encoding, in declaration order.
    pub const ALL: [RawEncoding; 2] = [RawEncoding::Hex48, RawEncoding::Dec48];

    /// Look up an encoding by its XML code (`hex48`, `dec48`).
    pub fn from_code(code: &str) -> Option<RawEncoding> {
        Self::ALL.into_iter().find(|raw| raw.code() == code)
    }

    /// Code used in the XML description.
    pub const fn code(self) -> &'static str {
        match self {
            RawEncoding::Hex48 => "hex48",
            RawEncoding::Dec48 => "dec48",
        }
    }

    /// Enumerator name in the generated C source.
    pub const fn c_enum(self) -> &'static str {
        match self {
            RawEncoding::Hex48 => "SMART_ATTR_RAW_HEX48",
            RawEncoding::Dec48 => "SMART_ATTR_RAW_DEC48",
        }
    }
}

impl fmt::Display for RawEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Coarse classification of what an attribute measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AttrType {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "poh"))]
    PowerOnHours,
    #[cfg_attr(feature = "serde", serde(rename = "temperature"))]
    Temperature,
    #[cfg_attr(feature = "serde", serde(rename = "reallocations"))]
    Reallocations,
    #[cfg_attr(feature = "serde", serde(rename = "pending_reallocations"))]
    PendingReallocations,
    #[cfg_attr(feature = "serde", serde(rename = "crc_count"))]
    CrcCount,
}

impl AttrType {
    /// Every type, in declaration order.
    pub const ALL: [AttrType; 6] = [
        AttrType::None,
        AttrType::PowerOnHours,
        AttrType::Temperature,
        AttrType::Reallocations,
        AttrType::PendingReallocations,
        AttrType::CrcCount,
    ];

    /// Look up a type by its XML code, e.g. `temperature`.
    pub fn from_code(code: &str) -> Option<AttrType> {
        Self::ALL.into_iter().find(|ty| ty.code() == code)
    }

    /// Code used in the XML `type` attribute.
    pub const fn code(self) -> &'static str {
        match self {
            AttrType::None => "none",
            AttrType::PowerOnHours => "poh",
            AttrType::Temperature => "temperature",
            AttrType::Reallocations => "reallocations",
            AttrType::PendingReallocations => "pending_reallocations",
            AttrType::CrcCount => "crc_count",
        }
    }

    /// Enumerator name in the generated C source.
    pub const fn c_enum(self) -> &'static str {
        match self {
            AttrType::None => "SMART_ATTR_TYPE_NONE",
            AttrType::PowerOnHours => "SMART_ATTR_TYPE_POH",
            AttrType::Temperature => "SMART_ATTR_TYPE_TEMP",
            AttrType::Reallocations => "SMART_ATTR_TYPE_REALLOC",
            AttrType::PendingReallocations => "SMART_ATTR_TYPE_REALLOC_PENDING",
            AttrType::CrcCount => "SMART_ATTR_TYPE_CRC_ERRORS",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Comma separated list of codes, used in diagnostics.
pub(crate) fn code_list<I>(codes: I) -> String
where
    I: IntoIterator<Item = &'static str>,
{
    codes.into_iter().collect::<Vec<_>>().join(", ")
}
