use labeler_core::{ColumnRole, Dataset};

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(String),
}

/// Write `dataset` as `\n`-terminated CSV with minimal quoting.
///
/// Label and reason cells come from the typed record fields; an empty reason
/// is written as an empty field.
pub fn serialize(dataset: &Dataset) -> Result<Vec<u8>, SerializeError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(dataset.columns())?;
    let roles = dataset.column_roles();
    for record in dataset.records() {
        let cells = roles.iter().map(|role| match role {
            ColumnRole::Body => record.body.as_str(),
            ColumnRole::Label => record.label.as_cell(),
            ColumnRole::Reason => record.reason.as_str(),
            ColumnRole::Passthrough(i) => record
                .passthrough
                .get(*i)
                .map(String::as_str)
                .unwrap_or_default(),
        });
        writer.write_record(cells)?;
    }

    writer
        .into_inner()
        .map_err(|err| SerializeError::Flush(err.to_string()))
}
