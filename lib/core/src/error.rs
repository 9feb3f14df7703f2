use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input vectors are not valid: {0}")]
    InvalidInput(String),

    #[error("Stored vectors are not valid, error while parsing: {0}")]
    CatalogParseFailure(String),

    #[error("Stored vectors variable not found: {0}")]
    CatalogNotFound(String),

    #[error("Stored vectors variable has an invalid shape: {0}")]
    CatalogShapeInvalid(String),

    #[error("The vector length is 0, cannot calculate (input {input}, {owner}/{file})")]
    DegenerateVector {
        input: usize,
        owner: String,
        file: String,
    },

    #[error("The cosine similarity is NaN (input {input}, {owner}/{file})")]
    NonNumericSimilarity {
        input: usize,
        owner: String,
        file: String,
    },

    #[error("No results above threshold {threshold} - try a lower threshold")]
    NoResultsAboveThreshold { threshold: f32 },

    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code, used by the HTTP surface
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::CatalogParseFailure(_) => "catalog_parse_failure",
            Error::CatalogNotFound(_) => "catalog_not_found",
            Error::CatalogShapeInvalid(_) => "catalog_shape_invalid",
            Error::DegenerateVector { .. } => "degenerate_vector",
            Error::NonNumericSimilarity { .. } => "non_numeric_similarity",
            Error::NoResultsAboveThreshold { .. } => "no_results_above_threshold",
            Error::VectorLengthMismatch { .. } => "vector_length_mismatch",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io(_) => "io",
        }
    }
}
