//! Error types for the sandbox

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SandboxError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("duplicate material name: {0}")]
    DuplicateName(String),

    #[error("{count} materials registered, at most {max} fit a material id")]
    TooManyMaterials { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, SandboxError>;
