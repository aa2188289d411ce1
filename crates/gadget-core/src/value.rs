//! Pixel-or-relative geometry values.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A geometry value as written in gadget markup: either an absolute pixel
/// count or a fraction of the parent's corresponding extent.
///
/// The textual form is a decimal number for pixels (`"40"`, `"-3.5"`) and a
/// decimal number followed by `%` for relative values (`"50%"` parses to
/// `Relative(0.5)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryValue {
    /// An absolute value in pixels.
    Pixel(f64),
    /// A fraction of the parent extent (1.0 == 100%).
    Relative(f64),
}

impl GeometryValue {
    /// Reject negative values, for properties such as width and height.
    pub fn non_negative(self) -> Result<Self, ValueError> {
        let v = match self {
            Self::Pixel(v) | Self::Relative(v) => v,
        };
        if v < 0.0 {
            Err(ValueError::Negative(self.to_string()))
        } else {
            Ok(self)
        }
    }

    /// Resolve to pixels against the given parent extent.
    #[inline]
    pub fn resolve(self, parent_extent: f64) -> f64 {
        match self {
            Self::Pixel(v) => v,
            Self::Relative(f) => f * parent_extent,
        }
    }

    /// Whether this is a relative value.
    #[inline]
    pub fn is_relative(self) -> bool {
        matches!(self, Self::Relative(_))
    }
}

impl FromStr for GeometryValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ValueError::Empty);
        }

        let (number, relative) = match text.strip_suffix('%') {
            Some(number) => (number.trim_end(), true),
            None => (text, false),
        };

        let value: f64 = number
            .parse()
            .map_err(|_| ValueError::Malformed(s.to_string()))?;
        if !value.is_finite() {
            return Err(ValueError::Malformed(s.to_string()));
        }

        Ok(if relative {
            Self::Relative(value / 100.0)
        } else {
            Self::Pixel(value)
        })
    }
}

impl fmt::Display for GeometryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixel(v) => write!(f, "{v}"),
            Self::Relative(v) => write!(f, "{}%", v * 100.0),
        }
    }
}
