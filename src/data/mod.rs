//! Data module - tolerant loading, schema normalization, merge and clean.

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{load_table, LoadError};
pub use merger::{content_hash, merge_and_clean, MergeCache, MergeError};
pub use schema::{normalize, Department, SchemaError, CANONICAL_COLUMNS, METRIC_COLUMNS};

use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::info;

/// One user-supplied file: display name plus its full contents.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum InputSelectionError {
    #[error("please upload TWO files (one for ECE, one for CSE); got {0}")]
    NotEnoughFiles(usize),
    #[error("could not distinguish files; ensure filenames contain 'ECE' and 'CSE'")]
    UnrecognizedPair,
}

/// Anything that can abort the load → normalize → merge pipeline.
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Tag a file by case-insensitive filename substring. ECE is checked first,
/// so a name containing both substrings tags as ECE.
pub fn department_of(file_name: &str) -> Option<Department> {
    let upper = file_name.to_uppercase();
    if upper.contains("ECE") {
        Some(Department::Ece)
    } else if upper.contains("CSE") {
        Some(Department::Cse)
    } else {
        None
    }
}

/// Resolve the uploaded files into an (ECE, CSE) pair, or say exactly what
/// is missing. No partial computation happens on failure.
pub fn pair_files(files: &[UploadedFile]) -> Result<(&UploadedFile, &UploadedFile), InputSelectionError> {
    if files.len() < 2 {
        return Err(InputSelectionError::NotEnoughFiles(files.len()));
    }

    let mut ece = None;
    let mut cse = None;
    for file in files {
        match department_of(&file.name) {
            Some(Department::Ece) if ece.is_none() => ece = Some(file),
            Some(Department::Cse) if cse.is_none() => cse = Some(file),
            _ => {}
        }
    }

    match (ece, cse) {
        (Some(e), Some(c)) => Ok((e, c)),
        _ => Err(InputSelectionError::UnrecognizedPair),
    }
}

/// Full pipeline for one file pair: parse both files, normalize each to the
/// canonical schema, then merge and clean. The result is memoized in `cache`
/// under the pair's content hashes.
pub fn build_dataset(
    ece: &UploadedFile,
    cse: &UploadedFile,
    cache: &mut MergeCache,
) -> Result<DataFrame, DataError> {
    let key = (content_hash(&ece.bytes), content_hash(&cse.bytes));

    cache.get_or_insert_with(key, || {
        info!(ece = ece.name, cse = cse.name, "building dataset");
        let ece_df = normalize(&load_table(&ece.name, &ece.bytes)?, Department::Ece)?;
        let cse_df = normalize(&load_table(&cse.name, &cse.bytes)?, Department::Cse)?;
        Ok(merge_and_clean(&ece_df, &cse_df)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    const ECE_CSV: &[u8] = b"Name of Professor,Designation,Number of Journal Publications,\
Number of Conference Publications,Number of Publications (Total),Books/Chapters Count,\
Patents Count,Projects Count,Citations Count,H Index Count\n\
A. Rao,Professor,5,3,8,1,2,1,40,12\n";

    const CSE_CSV: &[u8] = b"Name of professor,Designation,Number of Journal Publications,\
Number of Conference Publications,Number of Publications (Total),Books/Chapters (Count),\
Patents (Count),Projects (Count),Citations,H index\n\
D. Shah,Associate Professor,6,2,8,0,1,2,75,10\n";

    #[test]
    fn single_file_is_rejected_before_any_parsing() {
        let files = vec![file("ECE_report.csv", ECE_CSV)];
        match pair_files(&files) {
            Err(InputSelectionError::NotEnoughFiles(1)) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn untaggable_pair_is_rejected() {
        let files = vec![file("dept_a.csv", b"x"), file("dept_b.csv", b"y")];
        assert!(matches!(
            pair_files(&files),
            Err(InputSelectionError::UnrecognizedPair)
        ));
    }

    #[test]
    fn tagging_is_case_insensitive_and_ece_wins_ties() {
        assert_eq!(department_of("ece_data.csv"), Some(Department::Ece));
        assert_eq!(department_of("CSE_final.xlsx"), Some(Department::Cse));
        assert_eq!(department_of("ECE_and_CSE.csv"), Some(Department::Ece));
        assert_eq!(department_of("physics.csv"), None);
    }

    #[test]
    fn end_to_end_pipeline_produces_clean_merged_table() {
        let ece = file("ece_data.csv", ECE_CSV);
        let cse = file("cse_data.csv", CSE_CSV);
        let mut cache = MergeCache::new();

        let df = build_dataset(&ece, &cse, &mut cache).unwrap();
        assert_eq!(df.height(), 2);

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, CANONICAL_COLUMNS.to_vec());

        // A. Rao's row carries its ECE tag and numeric journal count.
        let journal = df
            .column("Journal Publications")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert_eq!(journal, 5.0);

        let dept = df.column("Department").unwrap().get(0).unwrap().to_string();
        assert!(dept.contains("ECE"));

        // Same pair again comes from the cache.
        let again = build_dataset(&ece, &cse, &mut cache).unwrap();
        assert!(df.equals(&again));
        assert_eq!(cache.computations(), 1);
    }
}
