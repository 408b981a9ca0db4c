//! SMART attribute database generator facade.
//!
//! Re-exports the XML loader and the validation/emission core so callers can
//! depend on a single crate.

pub use smartdb_core::{
    generate, render, AttrType, AttributeRecord, AttributeTable, DbError, EmitConfig, NameEntry,
    NameRegistry, RawEncoding, SmartDb, NO_TEMP_OFFSET,
};

pub mod xml {
    //! Document loading.
    pub use smartdb_xml::{load, parse_document, Element, XmlError};
}
