//! Error types for the styling engine.

use thiserror::Error;

/// Errors that can occur when parsing a color.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Unknown color name.
    #[error("unknown color name: {0}")]
    UnknownName(String),

    /// Invalid hex color format.
    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    /// Invalid RGB color format.
    #[error("invalid RGB color: {0}")]
    InvalidRgb(String),

    /// Palette index outside 0-255.
    #[error("color number must be 0-255, got {0}")]
    NumberOutOfRange(i64),
}

/// Errors that can occur when parsing a style.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StyleParseError {
    /// Invalid color in style.
    #[error("invalid color in style: {0}")]
    InvalidColor(#[from] ColorParseError),

    /// Unknown style attribute.
    #[error("unknown style attribute: {0}")]
    UnknownAttribute(String),

    /// `not` must be followed by an attribute name.
    #[error("expected attribute after 'not', got {0:?}")]
    ExpectedAttribute(Option<String>),

    /// `on` must be followed by a color.
    #[error("expected color after 'on'")]
    ExpectedColor,

    /// Empty style specification.
    #[error("empty style specification")]
    Empty,
}

/// Errors that can occur when parsing markup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Unclosed tag (missing `]`).
    #[error("unclosed tag starting at position {0}")]
    UnclosedTag(usize),

    /// Empty tag content.
    #[error("empty tag at position {0}")]
    EmptyTag(usize),
}
