/// A single ingestion record could not be normalized.
///
/// Never fatal to a batch: the record is skipped and the error is returned
/// next to the accepted specs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{adapter} record #{record_index}: {reason}")]
pub struct SchemaError {
    /// Position of the offending record in the submitted batch.
    pub record_index: usize,
    /// Name of the adapter that produced the record.
    pub adapter: String,
    pub reason: String,
}

impl SchemaError {
    pub fn new(record_index: usize, adapter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record_index,
            adapter: adapter.into(),
            reason: reason.into(),
        }
    }
}
