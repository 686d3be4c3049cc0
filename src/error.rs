use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Chart container `{0}` not found")]
    MissingContainer(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
