use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GroupError {
    /// Bad caller input, e.g. an unrecognized matching type.
    InvalidInput(String),
    /// The input source does not exist.
    FileNotFound(PathBuf),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank id column, blank pattern).
    ConfigValidation(String),
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for GroupError {}
