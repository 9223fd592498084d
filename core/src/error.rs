use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    /// A business rule failed. Aborts the whole run; nothing is persisted.
    #[error("{0}")]
    Validation(String),

    /// A computed value does not fit its fixed column.
    #[error("The {field} length exceeds the limit ({actual} > {width})")]
    FormatOverflow {
        field:  &'static str,
        width:  usize,
        actual: usize,
    },

    #[error("{op} failed: {source}")]
    Dependency {
        op:     &'static str,
        #[source]
        source: Box<GenError>,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    FormatOverflow,
    DependencyFailure,
}

impl GenError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GenError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::Validation(_) => ErrorKind::ValidationFailed,
            GenError::FormatOverflow { .. } => ErrorKind::FormatOverflow,
            GenError::Dependency { source, .. } => match source.kind() {
                ErrorKind::DependencyFailure => ErrorKind::DependencyFailure,
                inner => inner,
            },
            _ => ErrorKind::DependencyFailure,
        }
    }

    /// Only collaborator failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::DependencyFailure
    }
}

/// Tags repository and storage failures with the operation that produced them.
pub trait During<T> {
    fn during(self, op: &'static str) -> GenResult<T>;
}

impl<T> During<T> for GenResult<T> {
    fn during(self, op: &'static str) -> GenResult<T> {
        self.map_err(|e| match e.kind() {
            ErrorKind::DependencyFailure => GenError::Dependency { op, source: Box::new(e) },
            _ => e,
        })
    }
}
