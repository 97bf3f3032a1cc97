use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store error: {0}")]
    Store(#[from] csv::Error),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}
