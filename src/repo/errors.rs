use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("'{0}' is not a valid git repository")]
    InvalidRepository(PathBuf),

    #[error("git {args} exited with status {code:?}")]
    Command { args: String, code: Option<i32> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
