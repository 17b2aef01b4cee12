/// Persistence-layer errors reported by `ILineageStorage` backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("stored row is corrupt: {details}")]
    CorruptRow { details: String },
}
