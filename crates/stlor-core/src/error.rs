use thiserror::Error;

/// Fatal pipeline errors. Unmapped classifications are not errors (they
/// fall back to `Uncategorized` with a warning), but reference-data and
/// cross-file integrity defects abort the run.
#[derive(Debug, Error)]
pub enum Error {
    /// A mapping table carries the same raw string twice.
    #[error("duplicate mapping entry for {0:?}")]
    DuplicateMappingKey(String),

    /// A reservation with parcels is absent from the aggregate cross-check
    /// table, signalling a mismatch between input files.
    #[error("reservation {0:?} is missing from the aggregate cross-check table")]
    MissingAggregate(String),

    /// PNG encoding of a pattern tile failed.
    #[error("pattern tile encoding failed: {0}")]
    PatternEncode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
