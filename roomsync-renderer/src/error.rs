use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Template failed to parse, or rendering hit a missing variable.
    #[error("template error: {0}")]
    Tera(#[from] tera::Error),

    /// Override directory or one of its files could not be read.
    #[error("failed to read template override {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
