//! Declared component sizes.
//!
//! The state-sync layer sends sizes as CSS-like strings. An empty string
//! means the component sizes itself to its content, a percentage is relative
//! to the space its parent allocates, anything else is a fixed pixel size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while interpreting shared state.
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("invalid size: {0:?}")]
    InvalidSize(String),
}

/// How a component is sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SizeSpec {
    /// Sized by content.
    #[default]
    Undefined,
    /// Fixed size in pixels.
    Fixed(f64),
    /// Percentage of the space allocated by the parent.
    Relative(f64),
}

impl SizeSpec {
    /// Parse a declared size string.
    ///
    /// Accepts `""`, `"50%"`, `"120px"` and bare numbers (pixels).
    pub fn parse(input: &str) -> Result<SizeSpec, StateError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(SizeSpec::Undefined);
        }
        let invalid = || StateError::InvalidSize(input.to_string());
        if let Some(pct) = trimmed.strip_suffix('%') {
            let value: f64 = pct.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            return Ok(SizeSpec::Relative(value));
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        let value: f64 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        Ok(SizeSpec::Fixed(value))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, SizeSpec::Undefined)
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, SizeSpec::Relative(_))
    }

    /// The percentage for relative sizes.
    pub fn percent(&self) -> Option<f64> {
        match self {
            SizeSpec::Relative(pct) => Some(*pct),
            _ => None,
        }
    }

    /// Short label used in diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            SizeSpec::Undefined => "undefined",
            SizeSpec::Relative(_) => "relative",
            SizeSpec::Fixed(_) => "fixed",
        }
    }
}
