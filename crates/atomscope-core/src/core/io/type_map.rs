use crate::core::chemistry;
use crate::core::models::type_map::TypeMapRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeMapIoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML serialization error for '{path}': {source}")]
    TomlWrite {
        path: String,
        source: toml::ser::Error,
    },
    #[error("Invalid type id '{key}' in '{path}' (expected a positive integer)")]
    InvalidTypeId { path: String, key: String },
    #[error("Unsupported type-map file extension for '{0}' (expected .csv or .toml)")]
    UnsupportedExtension(String),
}

/// On-disk TOML layout: a `[type-map]` table with string keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TypeMapDocument {
    #[serde(rename = "type-map", default)]
    type_map: BTreeMap<String, String>,
}

enum TableFormat {
    Csv,
    Toml,
}

impl TableFormat {
    fn of(path: &Path) -> Result<Self, TypeMapIoError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("toml") => Ok(Self::Toml),
            _ => Err(TypeMapIoError::UnsupportedExtension(display(path))),
        }
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn canonical_row(type_id: u32, element: &str) -> TypeMapRow {
    match chemistry::canonical_symbol(element) {
        Some(symbol) => TypeMapRow::new(type_id, symbol),
        None if chemistry::is_placeholder(element) => TypeMapRow::unresolved(type_id),
        None => TypeMapRow::new(type_id, element),
    }
}

/// Loads a type-map table, choosing CSV or TOML by extension.
///
/// Element symbols are case-normalized; rows are returned in file order (use
/// [`crate::core::typemap::normalize`] to de-duplicate and sort).
pub fn load_type_map(path: &Path) -> Result<Vec<TypeMapRow>, TypeMapIoError> {
    match TableFormat::of(path)? {
        TableFormat::Csv => load_csv(path),
        TableFormat::Toml => load_toml(path),
    }
}

/// Writes a type-map table, choosing CSV or TOML by extension.
pub fn save_type_map(path: &Path, rows: &[TypeMapRow]) -> Result<(), TypeMapIoError> {
    match TableFormat::of(path)? {
        TableFormat::Csv => save_csv(path, rows),
        TableFormat::Toml => save_toml(path, rows),
    }
}

fn load_csv(path: &Path) -> Result<Vec<TypeMapRow>, TypeMapIoError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TypeMapIoError::Csv {
            path: display(path),
            source: e,
        })?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<TypeMapRow>() {
        let record = result.map_err(|e| TypeMapIoError::Csv {
            path: display(path),
            source: e,
        })?;
        if record.type_id == 0 {
            return Err(TypeMapIoError::InvalidTypeId {
                path: display(path),
                key: "0".to_string(),
            });
        }
        rows.push(canonical_row(record.type_id, &record.element));
    }
    Ok(rows)
}

fn save_csv(path: &Path, rows: &[TypeMapRow]) -> Result<(), TypeMapIoError> {
    let csv_error = |e| TypeMapIoError::Csv {
        path: display(path),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| TypeMapIoError::Io {
        path: display(path),
        source: e,
    })
}

/// Parses `[type-map]` TOML text into rows sorted by type id.
pub fn parse_toml(content: &str, path: &Path) -> Result<Vec<TypeMapRow>, TypeMapIoError> {
    let document: TypeMapDocument = toml::from_str(content).map_err(|e| TypeMapIoError::Toml {
        path: display(path),
        source: e,
    })?;
    let mut rows = document
        .type_map
        .iter()
        .map(|(key, element)| match key.trim().parse::<u32>() {
            Ok(type_id) if type_id > 0 => Ok(canonical_row(type_id, element)),
            _ => Err(TypeMapIoError::InvalidTypeId {
                path: display(path),
                key: key.clone(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by_key(|r| r.type_id);
    Ok(rows)
}

fn load_toml(path: &Path) -> Result<Vec<TypeMapRow>, TypeMapIoError> {
    let content = std::fs::read_to_string(path).map_err(|e| TypeMapIoError::Io {
        path: display(path),
        source: e,
    })?;
    parse_toml(&content, path)
}

fn save_toml(path: &Path, rows: &[TypeMapRow]) -> Result<(), TypeMapIoError> {
    let document = TypeMapDocument {
        type_map: rows
            .iter()
            .map(|r| (r.type_id.to_string(), r.element.clone()))
            .collect(),
    };
    let content = toml::to_string(&document).map_err(|e| TypeMapIoError::TomlWrite {
        path: display(path),
        source: e,
    })?;
    std::fs::write(path, content).map_err(|e| TypeMapIoError::Io {
        path: display(path),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_csv_normalizes_symbols() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.csv");
        fs::write(&path, "type_id,element\n1, SI\n2,o\n3,E\n").unwrap();

        let rows = load_type_map(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                TypeMapRow::new(1, "Si"),
                TypeMapRow::new(2, "O"),
                TypeMapRow::unresolved(3)
            ]
        );
    }

    #[test]
    fn load_csv_fails_for_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "type_id,element\nabc,Si\n").unwrap();
        assert!(matches!(load_type_map(&path), Err(TypeMapIoError::Csv { .. })));
    }

    #[test]
    fn load_toml_reads_string_keys_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.toml");
        fs::write(&path, "[type-map]\n\"2\" = \"O\"\n\"1\" = \"si\"\n").unwrap();

        let rows = load_type_map(&path).unwrap();
        assert_eq!(rows, vec![TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "O")]);
    }

    #[test]
    fn load_toml_rejects_non_numeric_keys() {
        let result = parse_toml("[type-map]\nfoo = \"Si\"\n", Path::new("inline.toml"));
        assert!(matches!(result, Err(TypeMapIoError::InvalidTypeId { key, .. }) if key == "foo"));
    }

    #[test]
    fn load_fails_for_missing_file_and_unknown_extension() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_type_map(&dir.path().join("missing.toml")),
            Err(TypeMapIoError::Io { .. })
        ));
        assert!(matches!(
            load_type_map(&dir.path().join("types.json")),
            Err(TypeMapIoError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn saved_tables_load_back_in_both_formats() {
        let dir = tempdir().unwrap();
        let rows = vec![TypeMapRow::new(1, "Si"), TypeMapRow::unresolved(2)];
        for name in ["out.csv", "out.toml"] {
            let path = dir.path().join(name);
            save_type_map(&path, &rows).unwrap();
            assert_eq!(load_type_map(&path).unwrap(), rows, "format {}", name);
        }
    }
}
