use shared::error::{ADDRESS_NOT_FOUND_MESSAGE, EMPTY_ADDRESS_MESSAGE, TRANSPORT_FAILURE_MESSAGE};
use thiserror::Error;

/// Terminal outcome of a failed lookup. `Display` yields the exact message
/// shown to the user; transport details stay in `detail` for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{}", EMPTY_ADDRESS_MESSAGE)]
    EmptyAddress,
    #[error("{}", TRANSPORT_FAILURE_MESSAGE)]
    Transport { detail: String },
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorKind {
    Validation,
    Transport,
    NotFound,
}

impl LookupError {
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }

    /// Server-reported failure; an absent or empty message falls back to the
    /// generic not-found text.
    pub fn rejected(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self::Rejected(message),
            _ => Self::Rejected(ADDRESS_NOT_FOUND_MESSAGE.to_string()),
        }
    }

    pub fn kind(&self) -> LookupErrorKind {
        match self {
            Self::EmptyAddress => LookupErrorKind::Validation,
            Self::Transport { .. } => LookupErrorKind::Transport,
            Self::Rejected(_) => LookupErrorKind::NotFound,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Transport { detail } => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid server url '{url}': {source}")]
    Parse {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' in server url '{url}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },
}
