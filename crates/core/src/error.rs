//! Error types for deck forking.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::SlidePosition;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while forking a deck.
///
/// Everything here is a precondition failure and fatal: the run aborts
/// before the document is mutated. There is no partial-success mode.
#[derive(Error, Debug)]
pub enum Error {
    /// The base document or the mapping table does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The output file already exists and overwriting was not permitted.
    #[error("Output file already exists (pass --overwrite to replace it): {0}")]
    OutputCollision(PathBuf),

    /// No usable decision source was supplied.
    #[error("No usable criterion: the notes search text must be non-empty")]
    MissingCriterion,

    /// The mapping table has fewer rows than the document has slides.
    #[error("Mapping has {rows} rows but the deck has {slides} slides - check the mapping file")]
    MappingShortfall { rows: usize, slides: usize },

    /// A mapping row's keep flag could not be parsed as a boolean.
    #[error("Mapping line {line}: unrecognized keep flag {token:?}")]
    MappingParse { line: usize, token: String },

    /// The document has no slide list container.
    #[error("The presentation has no slide list")]
    EmptySlideList,

    /// A slide position past the end of the slide list was requested.
    #[error("Slide position {0} is out of range")]
    SlideOutOfRange(SlidePosition),

    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error (PPTX container).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (PPTX container).
    #[error("XML parsing error: {0}")]
    Xml(String),
}
