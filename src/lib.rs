//! Terminal styling engine.
//!
//! This crate models the substrate that higher-level terminal widgets are
//! built on: colors with capability-aware downgrading, styles with
//! inheritable attributes, Unicode cell-width measurement, styled text with
//! editable spans, a bracket-tag markup language, and an ANSI/SGR codec.
//!
//! # Overview
//!
//! The markup format uses square brackets for styling:
//!
//! - `[bold]text[/]` - apply bold styling
//! - `[red]text[/]` - apply a red foreground color
//! - `[on blue]text[/]` - apply a blue background color
//! - `[bold white on blue]text[/]` - combined styling
//! - `[link=https://example.com]text[/]` - hyperlink
//! - `[/]` - close the most recent tag
//! - `\[` - escaped bracket (literal `[`)
//!
//! # Usage
//!
//! ```
//! use richtext::{ColorSystem, Style, markup};
//!
//! // Parse markup into styled text.
//! let text = markup::parse("[bold red]Hello[/] World").unwrap();
//! assert_eq!(text.plain(), "Hello World");
//!
//! // Render to terminal escape sequences.
//! let mut out = String::new();
//! for segment in text.render() {
//!     segment.render(&mut out, ColorSystem::TrueColor).unwrap();
//! }
//! assert!(out.starts_with("\x1b[1;31m"));
//!
//! // Work with the individual types.
//! let style = Style::parse("bold white on blue").unwrap();
//! assert_eq!(style.render_ansi(ColorSystem::TrueColor), "\x1b[1;37;44m");
//! ```
//!
//! Callers supply the target [`ColorSystem`] explicitly; no capability
//! detection or terminal I/O happens here.

pub mod ansi;
pub mod cells;
pub mod color;
pub mod error;
pub mod markup;
pub mod segment;
pub mod style;
pub mod text;

// Re-export main types at crate root
pub use color::{Color, ColorSystem, ColorTriplet, ContrastRating};
pub use error::{ColorParseError, MarkupError, StyleParseError};
pub use segment::{ControlCode, Segment, SegmentLine};
pub use style::{Attributes, Style};
pub use text::{Span, Text};
