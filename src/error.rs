use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The input is not a readable DOCX container.
    #[error("invalid docx: {0}")]
    InvalidDocx(String),

    /// A mandatory archive member is absent.
    #[error("missing required member: {0}")]
    MissingMember(&'static str),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}
