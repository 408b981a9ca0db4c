//! Render an [`AttributeTable`] as a C translation unit.

use std::fmt::Write;

use tracing::error;

use crate::codes::AttrType;
use crate::table::{AttributeRecord, AttributeTable};
use crate::DbError;

/// Names used in the generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Header providing `smart_table_t` and the enumerators.
    pub header: String,
    /// Identifier of the static table.
    pub table_ident: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            header: "smartdb.h".to_string(),
            table_ident: "defaults".to_string(),
        }
    }
}

/// Render the complete translation unit.
///
/// Every record's type code is resolved before anything is written, so an
/// unknown code yields an error and no partial output.
pub fn render(table: &AttributeTable, config: &EmitConfig) -> Result<String, DbError> {
    let mut entries = Vec::with_capacity(table.len());
    for record in table.iter() {
        let ty = record.attr_type().map_err(|err| {
            error!(id = record.id, code = %record.type_code, "{err}");
            err
        })?;
        entries.push((record, ty));
    }

    let mut out = String::new();
    writeln!(out, "#include \"{}\"", config.header)?;
    writeln!(out, "static const smart_table_t {} = {{", config.table_ident)?;
    writeln!(out, ".num_attrs = {},", entries.len())?;
    writeln!(out, ".attrs = {{")?;
    for (record, ty) in entries {
        write_entry(&mut out, record, ty)?;
    }
    writeln!(out, "}}")?;
    writeln!(out, "}};")?;
    writeln!(
        out,
        "const smart_table_t * smart_table_for_disk(const char *vendor, const char *model, const char *firmware)"
    )?;
    writeln!(out, "{{")?;
    writeln!(out, "(void)vendor;")?;
    writeln!(out, "(void)model;")?;
    writeln!(out, "(void)firmware;")?;
    writeln!(out, "return &{};", config.table_ident)?;
    writeln!(out, "}}")?;
    Ok(out)
}

fn write_entry(out: &mut String, record: &AttributeRecord, ty: AttrType) -> std::fmt::Result {
    let name = match record.name.as_deref() {
        Some(name) => c_string(name)?,
        None => "NULL".to_string(),
    };
    writeln!(
        out,
        "{{.id={}, .type={}, .name={name}, .raw={}, .offset={}}},",
        record.id,
        ty.c_enum(),
        record.raw.c_enum(),
        record.temp_offset
    )
}

/// Quote `value` as a C string literal.
fn c_string(value: &str) -> Result<String, std::fmt::Error> {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            // octal escapes stop after three digits, hex ones do not
            c if c.is_ascii_control() => write!(quoted, "\\{:03o}", c as u32)?,
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Ok(quoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::RawEncoding;
    use crate::table::NO_TEMP_OFFSET;

    fn record(id: u8, name: Option<&str>, type_code: &str) -> AttributeRecord {
        AttributeRecord {
            id,
            name: name.map(str::to_string),
            raw: RawEncoding::Dec48,
            type_code: type_code.to_string(),
            temp_offset: NO_TEMP_OFFSET,
        }
    }

    #[test]
    fn renders_full_translation_unit() {
        let mut table = AttributeTable::new();
        table.insert(AttributeRecord {
            raw: RawEncoding::Hex48,
            temp_offset: 20,
            ..record(190, Some("Airflow_Temperature"), "temperature")
        });
        table.insert(record(9, Some("Power_On_Hours"), "none"));

        let out = render(&table, &EmitConfig::default()).expect("render");
        let expected = "\
#include \"smartdb.h\"
static const smart_table_t defaults = {
.num_attrs = 2,
.attrs = {
{.id=9, .type=SMART_ATTR_TYPE_NONE, .name=\"Power_On_Hours\", .raw=SMART_ATTR_RAW_DEC48, .offset=-1},
{.id=190, .type=SMART_ATTR_TYPE_TEMP, .name=\"Airflow_Temperature\", .raw=SMART_ATTR_RAW_HEX48, .offset=20},
}
};
const smart_table_t * smart_table_for_disk(const char *vendor, const char *model, const char *firmware)
{
(void)vendor;
(void)model;
(void)firmware;
return &defaults;
}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_table_still_has_accessor() {
        let out = render(&AttributeTable::new(), &EmitConfig::default()).expect("render");
        assert!(out.contains(".num_attrs = 0,\n.attrs = {\n}\n};\n"));
        assert!(out.ends_with("return &defaults;\n}\n"));
    }

    #[test]
    fn custom_names_are_used() {
        let config = EmitConfig {
            header: "gen/smart.h".to_string(),
            table_ident: "fallback".to_string(),
        };
        let out = render(&AttributeTable::new(), &config).expect("render");
        assert!(out.starts_with("#include \"gen/smart.h\"\nstatic const smart_table_t fallback = {"));
        assert!(out.contains("return &fallback;"));
    }

    #[test]
    fn unnamed_attribute_renders_null() {
        let mut table = AttributeTable::new();
        table.insert(record(5, None, "none"));
        let out = render(&table, &EmitConfig::default()).expect("render");
        assert!(out.contains("{.id=5, .type=SMART_ATTR_TYPE_NONE, .name=NULL, .raw=SMART_ATTR_RAW_DEC48, .offset=-1},"));
    }

    #[test]
    fn unknown_type_code_aborts() {
        let mut table = AttributeTable::new();
        table.insert(record(9, Some("Power_On_Hours"), "none"));
        table.insert(record(12, Some("Odd"), "bogus"));
        let err = render(&table, &EmitConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"bogus\""), "{message}");
        assert!(
            message.contains(
                "none, poh, temperature, reallocations, pending_reallocations, crc_count"
            ),
            "{message}"
        );
    }

    #[test]
    fn names_are_escaped() {
        assert_eq!(c_string("plain"), Ok("\"plain\"".to_string()));
        assert_eq!(c_string(r#"a"b\c"#), Ok(r#""a\"b\\c""#.to_string()));
        assert_eq!(c_string("x\u{1}y\u{7f}"), Ok("\"x\\001y\\177\"".to_string()));
    }
}
