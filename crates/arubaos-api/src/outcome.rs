use std::fmt;

/// Result of a change request that the switch may legitimately decline.
///
/// Expected, reportable conditions (already in the wanted state, entity
/// absent, echo mismatch after a write) are values of this type. Anything
/// unexpected is an [`Error`](crate::Error) instead.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The switch accepted the change.
    Applied,
    /// Nothing to do; the switch was already in the requested state.
    AlreadySatisfied,
    /// The change was not applied.
    NotApplied { reason: String },
}

impl Outcome {
    pub(crate) fn not_applied(reason: impl Into<String>) -> Self {
        Self::NotApplied {
            reason: reason.into(),
        }
    }

    /// `true` for [`Applied`](Self::Applied) and
    /// [`AlreadySatisfied`](Self::AlreadySatisfied).
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::NotApplied { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::AlreadySatisfied => f.write_str("already satisfied"),
            Self::NotApplied { reason } => write!(f, "not applied: {reason}"),
        }
    }
}
