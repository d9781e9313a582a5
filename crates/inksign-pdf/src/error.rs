use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to decode image payload: {0}")]
    Decode(String),

    #[error("Invalid viewport configuration: {0}")]
    Configuration(String),

    #[error("PDF operation failed: {0}")]
    Operation(String),
}
