use thiserror::Error;

/// Top-level error type for the `arubaos-api` crate.
///
/// Only unexpected conditions end up here. Expected, reportable results
/// (VLAN already present, echo mismatch after a write, entity not found)
/// are returned as [`Outcome`](crate::Outcome) or `Option` instead.
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction / input ────────────────────────────────────────
    /// The switch configuration was rejected at construction time.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A caller-supplied argument failed local validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Login did not yield a session cookie.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built with the requested TLS settings.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The switch answered with something that is not the expected JSON.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Well-formed JSON carrying an in-band error message.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Composite operations ────────────────────────────────────────
    /// The requested change conflicts with the switch's current state.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// A multi-step change completed without errors but the switch did not
    /// converge to the requested state.
    #[error("Postcondition violated: {message}")]
    Postcondition { message: String },

    /// One step of a multi-step change failed. Earlier steps are not
    /// rolled back; `context` names what was being attempted.
    #[error("{context}")]
    Mutation {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns `true` if the switch reported that the requested entity
    /// does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Api { message, .. } => {
                let message = message.to_ascii_lowercase();
                message.contains("not found") || message.contains("does not exist")
            }
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Mutation { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error a caller may choose to
    /// retry. The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The innermost error of a [`Mutation`](Self::Mutation) chain.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Mutation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
