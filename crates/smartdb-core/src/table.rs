//! Attribute records built from `<default>` blocks, keyed by attribute ID.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;
use smartdb_xml::Element;
use tracing::{debug, warn};

use crate::codes::{code_list, AttrType, RawEncoding};
use crate::registry::NameRegistry;
use crate::DbError;

/// Offset value meaning "no temperature offset".
pub const NO_TEMP_OFFSET: i32 = -1;

const ID_RANGE: std::ops::RangeInclusive<i64> = 1..=255;
const TEMP_OFFSET_RANGE: std::ops::RangeInclusive<i64> = 1..=254;

/// Metadata for one SMART attribute ID.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AttributeRecord {
    pub id: u8,
    /// Declared name, if the `<attr>` referenced one.
    pub name: Option<String>,
    pub raw: RawEncoding,
    /// Type code inherited from the referenced name, `none` otherwise.
    pub type_code: String,
    /// Temperature correction in `1..=254`, or [`NO_TEMP_OFFSET`].
    pub temp_offset: i32,
}

impl AttributeRecord {
    /// Resolve the stored type code.
    pub fn attr_type(&self) -> Result<AttrType, DbError> {
        AttrType::from_code(&self.type_code).ok_or_else(|| DbError::UnknownTypeCode {
            code: self.type_code.clone(),
            known: code_list(AttrType::ALL.iter().map(|ty| ty.code())),
        })
    }
}

/// Child elements accepted inside `<attr>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrField {
    Id,
    Name,
    Raw,
    TempOffset,
}

impl AttrField {
    fn from_tag(tag: &str) -> Option<AttrField> {
        match tag {
            "id" => Some(AttrField::Id),
            "name" => Some(AttrField::Name),
            "raw" => Some(AttrField::Raw),
            "tempoffset" => Some(AttrField::TempOffset),
            _ => None,
        }
    }
}

/// Attribute records sorted by ID. Re-declaring an ID replaces the earlier
/// record.
#[derive(Debug, Default, Clone)]
pub struct AttributeTable {
    records: BTreeMap<u8, AttributeRecord>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an `<attr>` element against `names` and store the record.
    pub fn add_element(&mut self, element: &Element, names: &NameRegistry) -> Result<(), DbError> {
        if element.tag != "attr" {
            return Err(DbError::UnknownTag {
                level: "default",
                tag: element.tag.clone(),
            });
        }

        let mut id = None;
        let mut name = None;
        let mut raw = RawEncoding::default();
        let mut type_code = AttrType::default().code().to_string();
        let mut temp_offset = NO_TEMP_OFFSET;

        for child in &element.children {
            let field = AttrField::from_tag(&child.tag).ok_or_else(|| DbError::UnknownTag {
                level: "attr",
                tag: child.tag.clone(),
            })?;
            if let Some(nested) = child.children.first() {
                return Err(DbError::UnexpectedChild {
                    parent: child.tag.clone(),
                    tag: nested.tag.clone(),
                });
            }
            let text = child.trimmed_text().unwrap_or_default();
            match field {
                AttrField::Id => {
                    let value = parse_int("id", text)?;
                    if !ID_RANGE.contains(&value) {
                        return Err(DbError::IdOutOfRange(value));
                    }
                    id = Some(value as u8);
                }
                AttrField::Name => {
                    let code = names
                        .lookup(text)
                        .ok_or_else(|| DbError::UnknownName(text.to_string()))?;
                    type_code = code.to_string();
                    name = Some(text.to_string());
                }
                AttrField::Raw => {
                    raw = RawEncoding::from_code(text).ok_or_else(|| {
                        DbError::UnknownRawEncoding {
                            value: text.to_string(),
                            known: code_list(RawEncoding::ALL.iter().map(|raw| raw.code())),
                        }
                    })?;
                }
                AttrField::TempOffset => {
                    let value = parse_int("tempoffset", text)?;
                    if !TEMP_OFFSET_RANGE.contains(&value) {
                        return Err(DbError::TempOffsetOutOfRange(value));
                    }
                    temp_offset = value as i32;
                }
            }
        }

        let id = id.ok_or_else(|| DbError::MissingId {
            name: name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
        })?;
        self.insert(AttributeRecord {
            id,
            name,
            raw,
            type_code,
            temp_offset,
        });
        Ok(())
    }

    /// Store `record`, replacing any record with the same ID.
    pub fn insert(&mut self, record: AttributeRecord) {
        debug!(
            id = record.id,
            name = record.name.as_deref().unwrap_or(""),
            raw = %record.raw,
            type_code = %record.type_code,
            temp_offset = record.temp_offset,
            "attribute record"
        );
        if let Some(previous) = self.records.insert(record.id, record) {
            warn!(
                id = previous.id,
                replaced = previous.name.as_deref().unwrap_or(""),
                "attribute id declared more than once, keeping the later declaration"
            );
        }
    }

    pub fn get(&self, id: u8) -> Option<&AttributeRecord> {
        self.records.get(&id)
    }

    /// Lowest-ID record whose type code is `ty`.
    pub fn first_of_type(&self, ty: AttrType) -> Option<&AttributeRecord> {
        self.records
            .values()
            .find(|record| record.type_code == ty.code())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeRecord> {
        self.records.values()
    }
}

fn parse_int(field: &'static str, text: &str) -> Result<i64, DbError> {
    text.parse().map_err(|_| DbError::InvalidInteger {
        field,
        value: text.to_string(),
    })
}
