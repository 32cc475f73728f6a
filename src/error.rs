use thiserror::Error;

/// Failures at the collation table boundary. The algorithms themselves never fail.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("collation table encoding: {0}")]
    Encoding(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
