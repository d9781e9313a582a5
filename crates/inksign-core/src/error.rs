use inksign_pdf::PdfError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Audit integrity failure: {0}")]
    Integrity(String),

    #[error("Document operation failed: {0}")]
    Document(String),

    #[error("Storage operation failed: {0}")]
    Store(String),
}

impl From<PdfError> for SignError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Parse(msg) | PdfError::Operation(msg) => SignError::Document(msg),
            PdfError::Decode(msg) => SignError::Decode(msg),
            PdfError::Configuration(msg) => SignError::Configuration(msg),
        }
    }
}
