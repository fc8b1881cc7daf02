pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid calendar date: {value:?}")]
    InvalidDate { value: String },

    #[error("invalid content feed: {message}")]
    InvalidFeed { message: String },

    #[error("content feed JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
