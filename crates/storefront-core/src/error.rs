use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown section kind: {token:?}")]
    UnknownSectionKind { token: String },

    #[error("standard section requires a non-empty title")]
    EmptyTitle,
}

impl ModelError {
    #[must_use]
    pub fn unknown(token: impl Into<String>) -> Self {
        Self::UnknownSectionKind {
            token: token.into(),
        }
    }
}
