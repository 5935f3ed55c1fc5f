use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read row data from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in row data")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of rows or an object with a `rows` array")]
    UnexpectedShape,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,

    #[error("invalid palette color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
