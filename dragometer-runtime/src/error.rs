use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ProducerError {
    #[error("invalid producer identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("no built-in producer named '{identifier}' and no library at {tried}")]
    NotFound { identifier: String, tried: String },
    #[error("failed to load producer library {path}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("invalid producer {0}: function \"dragometer_main\" is required")]
    MissingEntryPoint(PathBuf),
    #[error("producer {0} does not export an ABI version; rebuild it against dragometer-plugin")]
    MissingAbiVersion(PathBuf),
    #[error("producer {path} was built for ABI version {found}, host expects {expected}; rebuild it")]
    AbiMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("producer failed: {0}")]
    Failed(String),
}
