use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::PredictError;
use crate::haplogroup::types::{
    DetailRow, DetailTable, Expected, IntermediateBranches, MarkerCall, Sample,
};

/// File name of the global intermediate-branch list.
const INTERMEDIATES_FILE: &str = "Intermediates.txt";

/// Extension of per-sample marker-call tables when scanning a directory.
const SAMPLE_EXT: &str = "out";

/// Resolves the input argument to the list of per-sample tables. A directory
/// is walked recursively for `.out` files; anything else is a single table.
/// The list is sorted so repeated runs report samples in the same order.
pub fn collect_sample_tables(input: &Path) -> Result<Vec<PathBuf>, PredictError> {
    if !input.exists() {
        return Err(PredictError::MissingInput(input.to_path_buf()));
    }
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    walk(input, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), std::io::Error> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().map_or(false, |ext| ext == SAMPLE_EXT) {
            files.push(path);
        }
    }
    Ok(())
}

/// Loads one per-sample marker-call table: tab-delimited with a header row
/// carrying at least `haplogroup`, `state` and `marker_name`. Extra columns
/// are ignored.
pub fn read_sample_table(path: &Path) -> Result<Sample, PredictError> {
    if !path.exists() {
        return Err(PredictError::MissingInput(path.to_path_buf()));
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|source| malformed(path, source))?;

    let mut calls = Vec::new();
    for row in reader.deserialize::<MarkerCall>() {
        calls.push(row.map_err(|source| malformed(path, source))?);
    }
    Ok(Sample::new(sample_name(path), calls))
}

fn malformed(path: &Path, source: csv::Error) -> PredictError {
    PredictError::MalformedTable {
        path: path.to_path_buf(),
        source,
    }
}

/// Sample name is the file name up to the first dot.
fn sample_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    match file.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file,
    }
}

/// Loads the global intermediate-branch list, one haplogroup name per line.
pub fn read_intermediates(tables: &Path) -> Result<IntermediateBranches, PredictError> {
    let path = tables.join(INTERMEDIATES_FILE);
    if !path.exists() {
        return Err(PredictError::MissingInput(path));
    }
    let content = std::fs::read_to_string(&path)?;
    let names = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string());
    Ok(IntermediateBranches::new(names))
}

/// Lazily loaded cache of per-root `<ROOT>_int.txt` detail tables, shared
/// across all samples of a run. A missing or unreadable file yields an empty
/// table; QC1 then degrades to 0.0 downstream.
pub struct DetailTables {
    dir: PathBuf,
    cache: HashMap<String, DetailTable>,
}

impl DetailTables {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn for_root(&mut self, root: &str) -> &DetailTable {
        let path = self.dir.join(format!("{}_int.txt", root));
        self.cache
            .entry(root.to_string())
            .or_insert_with(|| read_detail_table(&path))
    }
}

/// Headerless two-column tab-delimited table: haplogroup name, expected state
/// (possibly slash-separated alternatives). Any parse failure yields an empty
/// table rather than an error.
fn read_detail_table(path: &Path) -> DetailTable {
    let mut reader = match ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(_) => return DetailTable::default(),
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(_) => return DetailTable::default(),
        };
        if let (Some(haplogroup), Some(expected)) = (record.get(0), record.get(1)) {
            rows.push(DetailRow {
                haplogroup: haplogroup.to_string(),
                expected: Expected::parse(expected),
            });
        }
    }
    DetailTable { rows }
}
