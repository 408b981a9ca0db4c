#![cfg_attr(docsrs, feature(doc_cfg))]
//! SMART attribute database: name registry, attribute table and C emission.
//!
//! A description document looks like this:
//!
//! ```xml
//! <smartdb>
//!   <names>
//!     <name type="temperature">Airflow_Temperature</name>
//!   </names>
//!   <default>
//!     <attr><id>190</id><name>Airflow_Temperature</name><tempoffset>20</tempoffset></attr>
//!   </default>
//! </smartdb>
//! ```
//!
//! Blocks are processed in document order. Names must be declared before an
//! `<attr>` references them.

use std::path::Path;

use smartdb_xml::{Element, XmlError};
use thiserror::Error;
use tracing::{debug, info};

pub mod codes;
pub mod emit;
pub mod registry;
pub mod table;

pub use codes::{AttrType, RawEncoding};
pub use emit::{render, EmitConfig};
pub use registry::{NameEntry, NameRegistry};
pub use table::{AttributeRecord, AttributeTable, NO_TEMP_OFFSET};

/// Tag of the document root.
pub const ROOT_TAG: &str = "smartdb";

/// Error type produced while validating or emitting a description.
#[derive(Debug, Error)]
pub enum DbError {
    /// The document could not be read or is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("root element must be <smartdb>, found <{0}>")]
    UnexpectedRoot(String),
    /// An element tag is not allowed at this level.
    #[error("tag <{tag}> is unknown at {level} level")]
    UnknownTag { level: &'static str, tag: String },
    /// A leaf element contains a nested element.
    #[error("<{parent}> cannot have a child element, found <{tag}>")]
    UnexpectedChild { parent: String, tag: String },
    #[error("<name> declaration is empty")]
    EmptyName,
    #[error("name '{0}' is declared more than once")]
    DuplicateName(String),
    /// An `<attr>` references a name that was not declared before it.
    #[error("attribute references undeclared name '{0}'")]
    UnknownName(String),
    #[error("<{field}> is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },
    #[error("attribute id {0} is outside 1..=255")]
    IdOutOfRange(i64),
    #[error("temperature offset {0} is outside 1..=254")]
    TempOffsetOutOfRange(i64),
    #[error("unknown raw encoding '{value}', expected one of: {known}")]
    UnknownRawEncoding { value: String, known: String },
    /// An `<attr>` has no `<id>` child.
    #[error("attribute '{name}' has no <id>")]
    MissingId { name: String },
    /// A type code reached emission without matching a known [`AttrType`].
    #[error("cannot find key \"{code}\" in the known attribute code list: {known}")]
    UnknownTypeCode { code: String, known: String },
    #[error("format: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Top-level blocks of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Names,
    Default,
}

impl Section {
    fn from_tag(tag: &str) -> Option<Section> {
        match tag {
            "names" => Some(Section::Names),
            "default" => Some(Section::Default),
            _ => None,
        }
    }
}

/// Validated contents of one description document.
#[derive(Debug, Default, Clone)]
pub struct SmartDb {
    pub names: NameRegistry,
    pub attributes: AttributeTable,
}

impl SmartDb {
    /// Validate a parsed document.
    pub fn from_root(root: &Element) -> Result<Self, DbError> {
        if root.tag != ROOT_TAG {
            return Err(DbError::UnexpectedRoot(root.tag.clone()));
        }
        let mut db = SmartDb::default();
        for block in &root.children {
            let section = Section::from_tag(&block.tag).ok_or_else(|| DbError::UnknownTag {
                level: ROOT_TAG,
                tag: block.tag.clone(),
            })?;
            debug!(?section, entries = block.children.len(), "processing block");
            for element in &block.children {
                match section {
                    Section::Names => db.names.register_element(element)?,
                    Section::Default => db.attributes.add_element(element, &db.names)?,
                }
            }
        }
        info!(
            names = db.names.len(),
            attributes = db.attributes.len(),
            "smartdb description validated"
        );
        Ok(db)
    }

    /// Validate an XML document held in memory.
    pub fn parse(xml: &str) -> Result<Self, DbError> {
        let root = smartdb_xml::parse_document(xml)?;
        Self::from_root(&root)
    }

    /// Load and validate the document stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let root = smartdb_xml::load(path)?;
        Self::from_root(&root)
    }

    /// Render the fallback table and its accessor.
    pub fn render(&self, config: &EmitConfig) -> Result<String, DbError> {
        emit::render(&self.attributes, config)
    }
}

/// Load, validate and render the description at `path` in one step.
pub fn generate(path: impl AsRef<Path>, config: &EmitConfig) -> Result<String, DbError> {
    SmartDb::load(path)?.render(config)
}
