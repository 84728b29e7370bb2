use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrascopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TerrascopeError>;
