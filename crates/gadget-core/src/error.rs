//! Error types for the gadget runtime core.

use std::fmt;

use crate::timer::TimerToken;

/// The main error type for gadget core operations.
#[derive(Debug)]
pub enum GadgetError {
    /// Timer-related error.
    Timer(TimerError),
    /// Geometry value error.
    Value(ValueError),
}

impl fmt::Display for GadgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "Timer error: {err}"),
            Self::Value(err) => write!(f, "Value error: {err}"),
        }
    }
}

impl std::error::Error for GadgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Value(err) => Some(err),
        }
    }
}

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The token does not name a live timer.
    UnknownToken(TimerToken),
    /// Every token in the token space is in use.
    TokensExhausted,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken(token) => write!(f, "Unknown timer token {}", token.get()),
            Self::TokensExhausted => write!(f, "No free timer tokens left"),
        }
    }
}

impl std::error::Error for TimerError {}

/// Errors produced while parsing pixel or relative geometry strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The string is empty.
    Empty,
    /// The string is not a number, optionally followed by `%`.
    Malformed(String),
    /// The value is negative where only non-negative values are allowed.
    Negative(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty geometry value"),
            Self::Malformed(text) => write!(f, "Malformed geometry value {text:?}"),
            Self::Negative(text) => write!(f, "Negative geometry value {text:?}"),
        }
    }
}

impl std::error::Error for ValueError {}

impl From<TimerError> for GadgetError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

impl From<ValueError> for GadgetError {
    fn from(err: ValueError) -> Self {
        Self::Value(err)
    }
}

/// A specialized Result type for gadget core operations.
pub type Result<T> = std::result::Result<T, GadgetError>;
