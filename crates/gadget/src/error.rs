//! Error types for element trees and views.

use std::fmt;
use std::path::PathBuf;

use gadget_core::{GadgetError, TimerError, ValueError};
use gadget_render::RenderError;

use crate::element::ElementId;

/// Errors from structural edits of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// The element factory does not know this kind.
    UnknownKind(String),
    /// The element id is stale or was never issued by this view.
    UnknownElement(ElementId),
    /// The element is not a child of the container it was used with.
    NotAChild(ElementId),
    /// The element kind has no child container.
    NoContainer(ElementId),
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "Unknown element kind {kind:?}"),
            Self::UnknownElement(id) => write!(f, "Unknown element {id:?}"),
            Self::NotAChild(id) => write!(f, "Element {id:?} is not a child of this container"),
            Self::NoContainer(id) => write!(f, "Element {id:?} cannot have children"),
        }
    }
}

impl std::error::Error for ElementError {}

/// Errors while reading a view configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has wrongly typed fields.
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read config {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "Invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}

/// The error type for view operations.
#[derive(Debug)]
pub enum ViewError {
    /// Structural edit error.
    Element(ElementError),
    /// Configuration error.
    Config(ConfigError),
    /// Timer or geometry value error from the core crate.
    Core(GadgetError),
    /// Image or surface error.
    Render(RenderError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(err) => write!(f, "Element error: {err}"),
            Self::Config(err) => write!(f, "Config error: {err}"),
            Self::Core(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "Render error: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Element(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Core(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<ElementError> for ViewError {
    fn from(err: ElementError) -> Self {
        Self::Element(err)
    }
}

impl From<ConfigError> for ViewError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<GadgetError> for ViewError {
    fn from(err: GadgetError) -> Self {
        Self::Core(err)
    }
}

impl From<TimerError> for ViewError {
    fn from(err: TimerError) -> Self {
        Self::Core(err.into())
    }
}

impl From<ValueError> for ViewError {
    fn from(err: ValueError) -> Self {
        Self::Core(err.into())
    }
}

impl From<RenderError> for ViewError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

/// A specialized Result type for view operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;
