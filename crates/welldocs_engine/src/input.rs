use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use scrape_logging::scrape_debug;
use thiserror::Error;
use welldocs_core::InputRecord;

/// Names of the CSV columns holding the listing URL and the well identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub link: String,
    pub external_id: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            link: "Document Access".to_string(),
            external_id: "Api Num".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file {0} not found")]
    NotFound(PathBuf),
    #[error("input must contain a {0:?} column")]
    MissingColumn(String),
    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub fn load_input(path: &Path, columns: &InputColumns) -> Result<Vec<InputRecord>, InputError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(InputError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    read_input(file, columns)
}

/// Reads records in file order, dropping rows where either column is empty.
pub fn read_input<R: Read>(
    reader: R,
    columns: &InputColumns,
) -> Result<Vec<InputRecord>, InputError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| InputError::MissingColumn(name.to_string()))
    };
    let link_idx = position(&columns.link)?;
    let id_idx = position(&columns.external_id)?;

    let mut records = Vec::new();
    for (line, row) in csv.records().enumerate() {
        let row = row?;
        let url = row.get(link_idx).unwrap_or_default();
        let external_id = row.get(id_idx).unwrap_or_default();
        if url.is_empty() || external_id.is_empty() {
            scrape_debug!("Skipping input row {} with missing values", line + 2);
            continue;
        }
        records.push(InputRecord::new(url, external_id));
    }
    Ok(records)
}
