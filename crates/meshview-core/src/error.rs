pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Response body is not valid JSON: {message}")]
    InvalidJson { message: String },

    /// The body parsed as JSON but does not have the grid shape.
    ///
    /// `path` is a dotted JSON path (`mesh.segments[3].a.y`); `$` names the document root.
    #[error("Schema mismatch at `{path}`: expected {expected}")]
    SchemaMismatch { path: String, expected: &'static str },

    #[error("Invalid config: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn schema(path: impl Into<String>, expected: &'static str) -> Self {
        Self::SchemaMismatch {
            path: path.into(),
            expected,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }
}
