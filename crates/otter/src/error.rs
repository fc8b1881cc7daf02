use crate::circle::CircleId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown circle: {id}")]
    UnknownCircle { id: CircleId },

    #[error("invalid circle {label:?}: {message}")]
    InvalidCircle { label: String, message: String },

    #[error("invalid simulation config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
