use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no system sans-serif font found")]
    NoSystemFont,
    #[error("font face source not found")]
    FaceNotFound,
    #[error("failed to parse font data")]
    InvalidFont,
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),
}
