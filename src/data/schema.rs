//! Schema Normalizer Module
//! Maps each department's source column names onto the shared canonical
//! schema and tags rows with their department.
//!
//! The rename maps live in an embedded JSON table rather than in code, so a
//! new department is a config edit, not a new branch.

use polars::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// The canonical column set, in output order. This is the wire contract
/// between the normalizer and everything downstream.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "Name",
    "Designation",
    "Journal Publications",
    "Conference Publications",
    "Total Publications",
    "Books/Chapters",
    "Patents",
    "Projects",
    "Citations",
    "H Index",
    "Department",
];

/// The metric columns that must be numeric after cleaning.
pub const METRIC_COLUMNS: [&str; 8] = [
    "Journal Publications",
    "Conference Publications",
    "Total Publications",
    "Books/Chapters",
    "Patents",
    "Projects",
    "Citations",
    "H Index",
];

/// Which source table a row originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Department {
    Ece,
    Cse,
}

impl Department {
    pub const ALL: [Department; 2] = [Department::Ece, Department::Cse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Ece => "ECE",
            Department::Cse => "CSE",
        }
    }

    /// Inverse of `as_str`, for reading the Department column back out.
    pub fn from_tag(tag: &str) -> Option<Department> {
        Department::ALL.into_iter().find(|d| d.as_str() == tag)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{department}: no source column maps to required column '{column}'")]
    MissingColumn {
        department: Department,
        column: String,
    },
    #[error("no rename map configured for department {0}")]
    UnknownDepartment(Department),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Deserialize)]
struct SchemaConfig {
    departments: HashMap<String, HashMap<String, String>>,
}

const RENAME_CONFIG: &str = include_str!("rename_maps.json");

fn config() -> &'static SchemaConfig {
    static CONFIG: OnceLock<SchemaConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        serde_json::from_str(RENAME_CONFIG).expect("embedded rename_maps.json is valid")
    })
}

/// Normalize one department's raw table to the canonical schema.
///
/// Headers are trimmed, source columns renamed per the department's map, the
/// Department tag attached, and exactly the canonical columns selected in
/// fixed order. Columns neither mapped nor already canonical are dropped.
/// All output columns are strings; numeric coercion is the merger's job.
pub fn normalize(raw: &DataFrame, department: Department) -> Result<DataFrame, SchemaError> {
    let rename_map = config()
        .departments
        .get(department.as_str())
        .ok_or(SchemaError::UnknownDepartment(department))?;

    let mut df = raw.clone();

    // Stray whitespace in exported headers is common; compare trimmed.
    for name in df.get_column_names_owned() {
        let trimmed = name.trim();
        if trimmed != name.as_str() {
            df.rename(&name, trimmed.into())?;
        }
    }

    for (source, canonical) in rename_map {
        if source != canonical && df.column(source).is_ok() {
            df.rename(source, canonical.as_str().into())?;
        }
    }

    df.with_column(Column::new(
        "Department".into(),
        vec![department.as_str(); df.height()],
    ))?;

    let mut columns = Vec::with_capacity(CANONICAL_COLUMNS.len());
    for name in CANONICAL_COLUMNS {
        let column = df
            .column(name)
            .map_err(|_| SchemaError::MissingColumn {
                department,
                column: name.to_string(),
            })?
            .cast(&DataType::String)?;
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ece_raw() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Name of Professor".into(), vec!["A. Rao", "B. Iyer"]),
            Column::new("Designation".into(), vec!["Professor", "Asst. Professor"]),
            Column::new("Number of Journal Publications".into(), vec!["5", "2"]),
            Column::new("Number of Conference Publications".into(), vec!["3", "4"]),
            Column::new("Number of Publications (Total)".into(), vec!["8", "6"]),
            Column::new("Books/Chapters Count".into(), vec!["1", "0"]),
            Column::new("Patents Count".into(), vec!["2", "0"]),
            Column::new("Projects Count".into(), vec!["1", "1"]),
            Column::new("Citations Count".into(), vec!["40", "11"]),
            Column::new("H Index Count".into(), vec!["12", "3"]),
        ])
        .unwrap()
    }

    #[test]
    fn ece_headers_map_to_canonical_schema() {
        let df = normalize(&ece_raw(), Department::Ece).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, CANONICAL_COLUMNS.to_vec());

        let dept = df.column("Department").unwrap().get(0).unwrap().to_string();
        assert!(dept.contains("ECE"));
    }

    #[test]
    fn unmapped_extra_columns_are_dropped() {
        let mut raw = ece_raw();
        raw.with_column(Column::new("Cabin Number".into(), vec!["12", "14"]))
            .unwrap();

        let df = normalize(&raw, Department::Ece).unwrap();
        assert_eq!(df.width(), CANONICAL_COLUMNS.len());
        assert!(df.column("Cabin Number").is_err());
    }

    #[test]
    fn missing_source_column_names_department_and_field() {
        let raw = ece_raw().drop("Citations Count").unwrap();
        let err = normalize(&raw, Department::Ece).unwrap_err();
        match err {
            SchemaError::MissingColumn { department, column } => {
                assert_eq!(department, Department::Ece);
                assert_eq!(column, "Citations");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_whitespace_is_tolerated() {
        let raw = DataFrame::new(vec![
            Column::new("  Name of professor ".into(), vec!["C. Nair"]),
            Column::new("Designation".into(), vec!["Professor"]),
            Column::new("Number of Journal Publications".into(), vec!["7"]),
            Column::new("Number of Conference Publications".into(), vec!["2"]),
            Column::new("Number of Publications (Total)".into(), vec!["9"]),
            Column::new("Books/Chapters (Count)".into(), vec!["1"]),
            Column::new("Patents (Count)".into(), vec!["0"]),
            Column::new("Projects (Count)".into(), vec!["3"]),
            Column::new("Citations".into(), vec!["55"]),
            Column::new("H index".into(), vec!["9"]),
        ])
        .unwrap();

        let df = normalize(&raw, Department::Cse).unwrap();
        let name = df.column("Name").unwrap().get(0).unwrap().to_string();
        assert!(name.contains("C. Nair"));
    }
}
