use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("profile has no samples")]
    EmptyProfile,
    #[error("distance decreases at sample {index}: {previous} m -> {current} m")]
    NonMonotonicDistance {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// Failure to build a single mark out of a metadata record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarkError {
    #[error("{kind} mark '{name}' is missing field '{field}'")]
    MissingField {
        kind: String,
        name: String,
        field: &'static str,
    },
    #[error("{kind} mark '{name}' must start before it ends ({start} km >= {end} km)")]
    InvalidSpan {
        kind: String,
        name: String,
        start: f64,
        end: f64,
    },
}
