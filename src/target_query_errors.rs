use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetQueryError {
    #[error("Malformed parameter catalogue entry for '{0}': {1}")]
    MalformedCatalogEntry(String, String),

    #[error("Remote identifier declared more than once in the parameter catalogue: {0}")]
    DuplicateRemoteIdentifier(String),

    #[error("Column not found in table: {0}")]
    MissingColumn(String),

    #[error("Row has {found} cells but the table has {expected} columns")]
    RowLengthMismatch { expected: usize, found: usize },

    #[error("Cannot derive a cycle number from file name: {0}")]
    MalformedFilename(String),

    #[error("Cannot cast value '{value}' of column '{column}' to float")]
    InvalidFloat { column: String, value: String },

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for TargetQueryError {
    fn eq(&self, other: &Self) -> bool {
        use TargetQueryError::*;
        match (self, other) {
            (MalformedCatalogEntry(a1, a2), MalformedCatalogEntry(b1, b2)) => a1 == b1 && a2 == b2,
            (DuplicateRemoteIdentifier(a), DuplicateRemoteIdentifier(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                RowLengthMismatch {
                    expected: e1,
                    found: f1,
                },
                RowLengthMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (MalformedFilename(a), MalformedFilename(b)) => a == b,
            (
                InvalidFloat {
                    column: c1,
                    value: v1,
                },
                InvalidFloat {
                    column: c2,
                    value: v2,
                },
            ) => c1 == c2 && v1 == v2,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,

            // source errors carry no comparable payload, same variant is enough
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
