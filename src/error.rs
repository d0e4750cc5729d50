use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CatFactoryError {
    Config(ConfigError),
    Storage(StorageError),
}

#[derive(Debug)]
pub enum ConfigError {
    Parse { file: String, message: String },
    UnknownPatch { id: String },
    UnknownAction { name: String },
}

#[derive(Debug)]
pub enum StorageError {
    Io { path: String, source: io::Error },
    Serialize { message: String },
    NoConfigDir,
}

impl fmt::Display for CatFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatFactoryError::Config(e) => write!(f, "Configuration error: {e}"),
            CatFactoryError::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for CatFactoryError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { file, message } => {
                write!(f, "Failed to parse {file}: {message}")
            }
            ConfigError::UnknownPatch { id } => write!(f, "Unknown sound patch '{id}'"),
            ConfigError::UnknownAction { name } => write!(f, "No sound mapped for action '{name}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => write!(f, "I/O error on {path}: {source}"),
            StorageError::Serialize { message } => write!(f, "Serialization failed: {message}"),
            StorageError::NoConfigDir => {
                write!(f, "Could not determine a config directory for this platform")
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<ConfigError> for CatFactoryError {
    fn from(e: ConfigError) -> Self {
        CatFactoryError::Config(e)
    }
}

impl From<StorageError> for CatFactoryError {
    fn from(e: StorageError) -> Self {
        CatFactoryError::Storage(e)
    }
}
