use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Failure outcomes of a directory operation. "No such user", "username
/// taken" and a storage fault are distinct variants so callers can tell
/// them apart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username and password must both be provided")]
    InvalidArgument,
    #[error("a user with that username already exists")]
    AlreadyExists,
    #[error("no user with that username exists")]
    NotFound,
    #[error("the user directory has been closed")]
    Unavailable,
    #[error("storage fault: {0}")]
    Storage(#[from] anyhow::Error),
}
