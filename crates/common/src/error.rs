//! Fatal compile errors

/// Errors that abort a compile. Recoverable issues are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The input is not valid syntax; nothing is emitted.
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    #[error("invalid transform options: {0}")]
    Options(#[from] serde_json::Error),

    /// A compiler bug, such as a template whose markers disagree with its
    /// walker program.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl CompileError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
