//! Error types for the clustering pipeline

use thiserror::Error;

/// Errors raised by the vectorizer, the k-means engine, the reducer and the
/// pipeline that chains them. Each stage either succeeds fully or returns one
/// of these; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Empty vocabulary: no document has any term left after tokenization")]
    EmptyVocabulary,

    #[error("Invalid cluster count: k = {k} must be between 1 and {documents}")]
    InvalidClusterCount { k: usize, documents: usize },

    #[error("Insufficient rank: {requested} components requested, rank is {rank}")]
    InsufficientRank { requested: usize, rank: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
