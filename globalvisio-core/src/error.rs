use thiserror::Error;

/// Unified error type for the globalvisio workspace.
///
/// Every public operation of the client converts transport, provider, and
/// lookup failures into one of these variants; nothing panics past an
/// operation boundary.
#[derive(Debug, Error)]
pub enum GvError {
    /// Network-level failure (connect, timeout, TLS, ...).
    ///
    /// Stored as a message so this crate stays free of HTTP types; the
    /// client crate converts its transport errors into this variant.
    #[error("transport error: {0}")]
    Transport(String),

    /// The auth endpoint refused the credentials or returned a non-200.
    #[error("authentication failed: {message}")]
    Auth {
        /// Provider error message (or transport error text).
        message: String,
    },

    /// A non-200 data response carrying a provider message body.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// The provider's `message` field, or the raw body when undecodable.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// The response was valid JSON but missing expected keys, or the
    /// payload was declared empty by the provider.
    #[error("unexpected response shape: {what}")]
    Schema {
        /// Description of the missing or empty part.
        what: String,
    },

    /// A lookup matched nothing.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. `site matching ["Paris"]`.
        what: String,
    },

    /// A site lookup matched more than one candidate; the lookup fails
    /// closed rather than guessing.
    #[error("ambiguous lookup: {what} matched {count} candidates")]
    Ambiguous {
        /// Description of the lookup that was attempted.
        what: String,
        /// Number of candidates that matched.
        count: usize,
    },

    /// A write was refused because the target point is not an API point.
    #[error("refusing to write to non-API point: {label}")]
    Rejected {
        /// Human label of the point that was targeted.
        label: String,
    },

    /// Invalid caller input.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl GvError {
    /// Helper: build a `Transport` error from any displayable source.
    pub fn transport(e: impl std::fmt::Display) -> Self {
        Self::Transport(e.to_string())
    }

    /// Helper: build an `Auth` error with the provider's message.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Helper: build an `Api` error from a status code and message body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Helper: build a `Decode` error from any displayable source.
    pub fn decode(e: impl std::fmt::Display) -> Self {
        Self::Decode(e.to_string())
    }

    /// Helper: build a `Schema` error for a description of the missing part.
    pub fn schema(what: impl Into<String>) -> Self {
        Self::Schema { what: what.into() }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
