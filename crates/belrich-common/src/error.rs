use thiserror::Error;

#[derive(Debug, Error)]
pub enum BelrichError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("BEL syntax error at position {position}: {message} (in `{line}`)")]
    BelSyntax {
        line: String,
        position: usize,
        message: String,
    },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("Statement service error: {0}")]
    Service(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BelrichError {
    pub fn bel_syntax(line: &str, position: usize, message: impl Into<String>) -> Self {
        BelrichError::BelSyntax {
            line: line.to_string(),
            position,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BelrichError>;
