use thiserror::Error;

pub type Result<T> = std::result::Result<T, CuboError>;

#[derive(Debug, Error)]
pub enum CuboError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown metric {0}")]
    UnknownMetric(String),
    #[error("unknown dimension {0}")]
    UnknownDimension(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("execution error: {0}")]
    Execution(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
