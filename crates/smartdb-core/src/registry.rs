//! Registry of declared attribute names and their semantic type codes.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;
use smartdb_xml::Element;
use tracing::debug;

use crate::codes::AttrType;
use crate::DbError;

/// A declared attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NameEntry {
    pub name: String,
    /// Type code exactly as declared. Checked against [`AttrType`] only when
    /// an attribute using this name is emitted.
    pub type_code: String,
}

/// Names declared in `<names>` blocks, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    entries: Vec<NameEntry>,
    index: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a `<name type="...">Text</name>` element and register it.
    pub fn register_element(&mut self, element: &Element) -> Result<(), DbError> {
        if element.tag != "name" {
            return Err(DbError::UnknownTag {
                level: "names",
                tag: element.tag.clone(),
            });
        }
        let name = element.trimmed_text().unwrap_or_default();
        if name.is_empty() {
            return Err(DbError::EmptyName);
        }
        if let Some(child) = element.children.first() {
            return Err(DbError::UnexpectedChild {
                parent: format!("name '{name}'"),
                tag: child.tag.clone(),
            });
        }
        let type_code = element
            .attribute("type")
            .unwrap_or(AttrType::default().code());
        self.register(name, type_code)
    }

    /// Register `name` with the given type code. Names are unique.
    pub fn register(&mut self, name: &str, type_code: &str) -> Result<(), DbError> {
        if self.index.contains_key(name) {
            return Err(DbError::DuplicateName(name.to_string()));
        }
        debug!(name, type_code, "registered attribute name");
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(NameEntry {
            name: name.to_string(),
            type_code: type_code.to_string(),
        });
        Ok(())
    }

    /// Declared type code for `name`.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].type_code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartdb_xml::parse_document;

    fn name_element(xml: &str) -> Element {
        parse_document(xml).expect("parse xml")
    }

    #[test]
    fn type_defaults_to_none() {
        let mut registry = NameRegistry::new();
        registry
            .register_element(&name_element("<name> Power_On_Hours </name>"))
            .expect("register");
        registry
            .register_element(&name_element(
                r#"<name type="temperature">Airflow_Temperature</name>"#,
            ))
            .expect("register");
        assert_eq!(registry.lookup("Power_On_Hours"), Some("none"));
        assert_eq!(registry.lookup("Airflow_Temperature"), Some("temperature"));
        assert_eq!(registry.lookup("Missing"), None);
        let order: Vec<_> = registry.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(order, ["Power_On_Hours", "Airflow_Temperature"]);
    }

    #[test]
    fn names_split_by_cdata_keep_inner_spaces() {
        let mut registry = NameRegistry::new();
        registry
            .register_element(&name_element("<name> Power <![CDATA[On]]> </name>"))
            .expect("register");
        assert_eq!(registry.lookup("Power On"), Some("none"));
    }

    #[test]
    fn unknown_type_codes_are_kept_verbatim() {
        let mut registry = NameRegistry::new();
        registry
            .register_element(&name_element(r#"<name type="bogus">X</name>"#))
            .expect("register");
        assert_eq!(registry.lookup("X"), Some("bogus"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = NameRegistry::new();
        registry.register("Seek_Error_Rate", "none").expect("first");
        let err = registry
            .register_element(&name_element("<name>Seek_Error_Rate</name>"))
            .unwrap_err();
        assert!(matches!(err, DbError::DuplicateName(name) if name == "Seek_Error_Rate"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn malformed_name_elements_are_rejected() {
        let mut registry = NameRegistry::new();
        assert!(matches!(
            registry.register_element(&name_element("<name>   </name>")),
            Err(DbError::EmptyName)
        ));
        assert!(matches!(
            registry.register_element(&name_element("<name/>")),
            Err(DbError::EmptyName)
        ));
        assert!(matches!(
            registry.register_element(&name_element("<name>A<b/></name>")),
            Err(DbError::UnexpectedChild { .. })
        ));
        assert!(matches!(
            registry.register_element(&name_element("<label>A</label>")),
            Err(DbError::UnknownTag { level: "names", .. })
        ));
        assert!(registry.is_empty());
    }
}
