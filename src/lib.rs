pub mod core;
pub mod index;
pub mod index_cmd;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type IndexResult<T> = Result<T, IndexError>;
