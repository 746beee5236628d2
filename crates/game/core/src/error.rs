//! Shared error classification for game-core.
//!
//! Each subsystem defines its own rejection type next to the operations it
//! validates (`ActionError`, `TierError`, `SustainedError`). They all
//! implement [`GameError`] so callers can decide how loudly to report a
//! rejection without matching on every variant.

/// How a rejection should be treated by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same command may succeed later: cooldowns, resources, gold.
    Recoverable,
    /// The command does not fit the current state and will keep failing.
    Validation,
    /// Content or state is inconsistent.
    Internal,
    /// The run is over.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core rejection types.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and clients, e.g. `ACTION_ON_COOLDOWN`.
    fn error_code(&self) -> &'static str;
}
