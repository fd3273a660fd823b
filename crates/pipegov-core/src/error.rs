use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovError {
    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    #[error("rule file could not be read: {0}")]
    RuleFileUnreadable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GovError>;
