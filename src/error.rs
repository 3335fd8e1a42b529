use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Two galleries must never share a popup element.
    #[error("popup with id '{0}' already exists")]
    DuplicatePopup(String),
    #[error("unknown positioning strategy '{0}'")]
    UnknownStrategy(String),
    #[error("invalid gallery options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error("environment error: {0}")]
    Environment(String),
}
