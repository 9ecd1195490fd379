use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use labeler_core::{Dataset, Label, Record, BODY_COLUMN, LABEL_COLUMN, REASON_COLUMN};
use labeler_logging::{labeler_debug, labeler_error};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid label `{value}`")]
    InvalidLabel { row: usize, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Value of the `html_url` field when `body` is a JSON object carrying it as a string.
pub fn extract_html_url(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("html_url")?.as_str().map(str::to_owned)
}

/// Parse a CSV dataset with a header row and at least a `body` column.
pub fn load<R: Read>(reader: R) -> Result<Dataset, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_owned).collect();
    let position = |name: &str| columns.iter().position(|c| c == name);
    let body_idx = position(BODY_COLUMN).ok_or(ParseError::MissingColumn(BODY_COLUMN))?;
    let label_idx = position(LABEL_COLUMN);
    let reason_idx = position(REASON_COLUMN);

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let raw = result?;
        let body = raw.get(body_idx).unwrap_or_default().to_owned();

        let label = match label_idx.and_then(|i| raw.get(i)) {
            Some(cell) => Label::from_cell(cell).ok_or_else(|| ParseError::InvalidLabel {
                row,
                value: cell.to_owned(),
            })?,
            None => Label::Unset,
        };
        let reason = reason_idx
            .and_then(|i| raw.get(i))
            .unwrap_or_default()
            .to_owned();

        let passthrough = raw
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != body_idx && Some(*i) != label_idx && Some(*i) != reason_idx)
            .map(|(_, cell)| cell.to_owned())
            .collect();

        records.push(Record {
            derived_url: extract_html_url(&body).unwrap_or_default(),
            body,
            label,
            reason,
            passthrough,
        });
    }

    labeler_debug!(
        "Loaded dataset rows={} columns={:?}",
        records.len(),
        columns
    );
    Ok(Dataset::new(columns, records))
}

pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::SourceNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(load(io::BufReader::new(file))?)
}

/// Like [`load_file`], but a missing file is reported and yields an empty dataset.
pub fn load_file_or_empty(path: &Path) -> Result<Dataset, LoadError> {
    match load_file(path) {
        Err(LoadError::SourceNotFound(missing)) => {
            labeler_error!("File {:?} not found, starting with an empty dataset", missing);
            Ok(Dataset::empty())
        }
        other => other,
    }
}
