use thiserror::Error;

#[derive(Error, Debug)]
pub enum XdpstatError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid CPU count {requested}. Must be between 1 and {max}")]
    InvalidCpuCount { requested: usize, max: usize },

    #[error("CPU {cpu} out of range. Table has {cpus} per-CPU records")]
    CpuOutOfRange { cpu: usize, cpus: usize },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XdpstatError>;
