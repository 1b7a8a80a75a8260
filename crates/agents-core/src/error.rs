use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InstallerError>;
