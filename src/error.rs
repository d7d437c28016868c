//! Error types.
//!
//! Absence of a focus target is not an error: focus queries return `Option`.

use thiserror::Error;

use crate::types::WindowId;

/// Errors raised by [`Signal`](crate::reactive::Signal) field access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The key was not present when the signal was created.
    #[error("unknown signal key `{0}`")]
    UnknownKey(String),
}

/// Errors raised while parsing a key notation such as `"Shift+Tab"` or `"<C-l>"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
}

/// Errors raised while parsing a position or size such as `"50%"` or `"12"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dimension `{0}`")]
pub struct DimensionParseError(pub String);

/// Failures reported by a [`Host`](crate::host::Host) or a [`Layout`](crate::layout::Layout).
///
/// The renderer logs and tolerates these; they never abort the reactive core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("window {0} no longer exists")]
    StaleWindow(WindowId),
    #[error("layout is not mounted")]
    NotMounted,
    #[error("host backend error: {0}")]
    Backend(String),
}
