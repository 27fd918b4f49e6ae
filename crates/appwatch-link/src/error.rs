//! Error types for appwatch-link

/// Reasons a desktop entry file could not be turned into a [`Link`](crate::Link).
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No [Desktop Entry] group")]
    MissingGroup,

    #[error("Missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Unknown entry type: {0}")]
    UnknownType(String),
}
