//! Styles: colors, attributes and hyperlinks combined.
//!
//! A [`Style`] tracks *two* attribute masks: the attribute values and which
//! of them were explicitly set. The distinction is what makes nested styles
//! work: "never mentioned bold" inherits from the base style, while
//! "explicitly not bold" locally disables an inherited bold.

use bitflags::bitflags;

use crate::color::{Color, ColorSystem};
use crate::error::StyleParseError;

bitflags! {
    /// Text attribute flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attributes: u16 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const REVERSE = 1 << 5;
        const CONCEAL = 1 << 6;
        const STRIKE = 1 << 7;
        const OVERLINE = 1 << 8;
    }
}

/// SGR enable/disable code per attribute, in serialization order.
/// Bold and dim share the disable code 22.
const ATTRIBUTE_CODES: [(Attributes, u8, u8); 9] = [
    (Attributes::BOLD, 1, 22),
    (Attributes::DIM, 2, 22),
    (Attributes::ITALIC, 3, 23),
    (Attributes::UNDERLINE, 4, 24),
    (Attributes::BLINK, 5, 25),
    (Attributes::REVERSE, 7, 27),
    (Attributes::CONCEAL, 8, 28),
    (Attributes::STRIKE, 9, 29),
    (Attributes::OVERLINE, 53, 55),
];

/// Terminal hyperlink open/close via OSC 8.
pub(crate) const LINK_CLOSE: &str = "\x1b]8;;\x1b\\";

/// A complete style: optional colors, dual attribute masks, optional link.
///
/// # Examples
///
/// ```
/// use richtext::{ColorSystem, Style};
///
/// let style = Style::parse("bold red on white").unwrap();
/// assert_eq!(style.render_ansi(ColorSystem::TrueColor), "\x1b[1;31;47m");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground color.
    pub color: Option<Color>,
    /// Background color.
    pub bgcolor: Option<Color>,
    /// Attribute values.
    pub attributes: Attributes,
    /// Which attributes were explicitly set (on or off).
    pub set_attributes: Attributes,
    /// Hyperlink target (rendered via OSC 8).
    pub link: Option<String>,
}

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a style from foreground and background colors.
    pub fn from_color(color: Option<Color>, bgcolor: Option<Color>) -> Self {
        Self {
            color,
            bgcolor,
            ..Self::default()
        }
    }

    /// Returns true if nothing is set: no colors, no attributes, no link.
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.bgcolor.is_none()
            && self.set_attributes.is_empty()
            && self.link.is_none()
    }

    /// Explicitly set or clear a single attribute.
    pub fn set_attribute(&mut self, attribute: Attributes, enabled: bool) {
        self.set_attributes |= attribute;
        self.attributes.set(attribute, enabled);
    }

    fn with_attribute(mut self, attribute: Attributes) -> Self {
        self.set_attribute(attribute, true);
        self
    }

    /// Enable bold.
    pub fn bold(self) -> Self {
        self.with_attribute(Attributes::BOLD)
    }

    /// Enable dim.
    pub fn dim(self) -> Self {
        self.with_attribute(Attributes::DIM)
    }

    /// Enable italic.
    pub fn italic(self) -> Self {
        self.with_attribute(Attributes::ITALIC)
    }

    /// Enable underline.
    pub fn underline(self) -> Self {
        self.with_attribute(Attributes::UNDERLINE)
    }

    /// Enable blink.
    pub fn blink(self) -> Self {
        self.with_attribute(Attributes::BLINK)
    }

    /// Enable reverse video.
    pub fn reverse(self) -> Self {
        self.with_attribute(Attributes::REVERSE)
    }

    /// Enable conceal.
    pub fn conceal(self) -> Self {
        self.with_attribute(Attributes::CONCEAL)
    }

    /// Enable strikethrough.
    pub fn strike(self) -> Self {
        self.with_attribute(Attributes::STRIKE)
    }

    /// Enable overline.
    pub fn overline(self) -> Self {
        self.with_attribute(Attributes::OVERLINE)
    }

    /// Set the foreground color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the background color.
    pub fn on(mut self, color: Color) -> Self {
        self.bgcolor = Some(color);
        self
    }

    /// Set the hyperlink target.
    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Apply `overlay` on top of this style.
    ///
    /// Per attribute bit the overlay wins if it set the bit explicitly
    /// (on *or* off), otherwise the base value is inherited. Colors and
    /// link follow overlay-present-wins-else-inherit.
    pub fn combine(&self, overlay: &Style) -> Style {
        Style {
            color: overlay.color.or(self.color),
            bgcolor: overlay.bgcolor.or(self.bgcolor),
            attributes: (self.attributes & !overlay.set_attributes)
                | (overlay.attributes & overlay.set_attributes),
            set_attributes: self.set_attributes | overlay.set_attributes,
            link: overlay.link.clone().or_else(|| self.link.clone()),
        }
    }

    /// Parse a style from a string like `"bold red on white"`.
    ///
    /// Supported tokens:
    /// - Attributes: `bold`/`b`, `dim`/`d`, `italic`/`i`, `underline`/`u`,
    ///   `blink`, `reverse`/`r`, `conceal`, `strike`/`s`, `overline`/`o`
    /// - `not` flips the next attribute to explicitly-off
    /// - `on` makes the next color token the background
    /// - `link=<url>` sets the hyperlink
    /// - anything else is parsed as a color (see [`Color::parse`])
    ///
    /// The first unrecognized token aborts parsing with an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use richtext::{Attributes, Style};
    ///
    /// let style = Style::parse("bold white on blue").unwrap();
    /// assert!(style.attributes.contains(Attributes::BOLD));
    /// assert!(style.color.is_some());
    /// assert!(style.bgcolor.is_some());
    /// ```
    pub fn parse(input: &str) -> Result<Self, StyleParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(StyleParseError::Empty);
        }

        let mut style = Style::new();
        let mut words = input.split_whitespace();

        while let Some(word) = words.next() {
            let lower = word.to_lowercase();

            if lower == "not" {
                let next = words.next();
                let attribute = next
                    .and_then(|word| attribute_for(&word.to_lowercase()))
                    .ok_or_else(|| StyleParseError::ExpectedAttribute(next.map(String::from)))?;
                style.set_attribute(attribute, false);
                continue;
            }

            if lower == "on" {
                let color_word = words.next().ok_or(StyleParseError::ExpectedColor)?;
                style.bgcolor = Some(Color::parse(color_word)?);
                continue;
            }

            if let Some(url) = word.strip_prefix("link=") {
                style.link = Some(url.to_string());
                continue;
            }

            if let Some(attribute) = attribute_for(&lower) {
                style.set_attribute(attribute, true);
                continue;
            }

            match Color::parse(word) {
                Ok(color) => style.color = Some(color),
                // A plain word that is no known color reads as a typoed
                // attribute; syntactic color forms keep their own error.
                Err(crate::error::ColorParseError::UnknownName(_)) => {
                    return Err(StyleParseError::UnknownAttribute(word.to_string()));
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok(style)
    }

    /// The semicolon-joined SGR parameters for this style.
    ///
    /// Colors are downgraded to `system` first. An unset style yields `"0"`
    /// so the emitted sequence is never empty.
    pub fn ansi_codes(&self, system: ColorSystem) -> String {
        let mut codes: Vec<String> = Vec::new();

        for (attribute, enable, disable) in ATTRIBUTE_CODES {
            if self.set_attributes.contains(attribute) {
                let code = if self.attributes.contains(attribute) {
                    enable
                } else {
                    disable
                };
                let code = code.to_string();
                // Bold and dim share a disable code; don't emit it twice.
                if codes.last() != Some(&code) {
                    codes.push(code);
                }
            }
        }

        if let Some(color) = &self.color {
            codes.extend(color.ansi_codes(true, system));
        }
        if let Some(bgcolor) = &self.bgcolor {
            codes.extend(bgcolor.ansi_codes(false, system));
        }

        if codes.is_empty() {
            "0".to_string()
        } else {
            codes.join(";")
        }
    }

    /// Render the full escape prefix for this style.
    ///
    /// Emits the SGR sequence and, when a link is set, the OSC 8 hyperlink
    /// open. The matching link close is the renderer's responsibility.
    pub fn render_ansi(&self, system: ColorSystem) -> String {
        let mut out = format!("\x1b[{}m", self.ansi_codes(system));
        if let Some(link) = &self.link {
            out.push_str("\x1b]8;;");
            out.push_str(link);
            out.push_str("\x1b\\");
        }
        out
    }
}

/// Look up an attribute name or abbreviation.
fn attribute_for(word: &str) -> Option<Attributes> {
    match word {
        "bold" | "b" => Some(Attributes::BOLD),
        "dim" | "d" => Some(Attributes::DIM),
        "italic" | "i" => Some(Attributes::ITALIC),
        "underline" | "u" => Some(Attributes::UNDERLINE),
        "blink" => Some(Attributes::BLINK),
        "reverse" | "r" => Some(Attributes::REVERSE),
        "conceal" => Some(Attributes::CONCEAL),
        "strike" | "s" | "strikethrough" => Some(Attributes::STRIKE),
        "overline" | "o" => Some(Attributes::OVERLINE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorParseError;

    #[test]
    fn parse_single_attribute() {
        let style = Style::parse("bold").unwrap();
        assert!(style.attributes.contains(Attributes::BOLD));
        assert!(style.set_attributes.contains(Attributes::BOLD));
        assert!(!style.attributes.contains(Attributes::ITALIC));
    }

    #[test]
    fn parse_abbreviations() {
        let style = Style::parse("b i u").unwrap();
        assert!(style.attributes.contains(Attributes::BOLD));
        assert!(style.attributes.contains(Attributes::ITALIC));
        assert!(style.attributes.contains(Attributes::UNDERLINE));
    }

    #[test]
    fn parse_not_flips_next_attribute_only() {
        let style = Style::parse("not bold italic").unwrap();
        assert!(style.set_attributes.contains(Attributes::BOLD));
        assert!(!style.attributes.contains(Attributes::BOLD));
        // "italic" after the negated pair is a plain enable.
        assert!(style.attributes.contains(Attributes::ITALIC));
    }

    #[test]
    fn parse_not_requires_attribute() {
        assert!(matches!(
            Style::parse("not red"),
            Err(StyleParseError::ExpectedAttribute(Some(_)))
        ));
        assert!(matches!(
            Style::parse("not"),
            Err(StyleParseError::ExpectedAttribute(None))
        ));
    }

    #[test]
    fn parse_colors() {
        let style = Style::parse("red").unwrap();
        assert_eq!(style.color, Some(Color::Standard(1)));
        assert!(style.bgcolor.is_none());

        let style = Style::parse("white on blue").unwrap();
        assert_eq!(style.color, Some(Color::Standard(7)));
        assert_eq!(style.bgcolor, Some(Color::Standard(4)));
    }

    #[test]
    fn parse_on_requires_color() {
        assert!(matches!(
            Style::parse("red on"),
            Err(StyleParseError::ExpectedColor)
        ));
    }

    #[test]
    fn parse_link() {
        let style = Style::parse("bold link=https://example.com").unwrap();
        assert_eq!(style.link.as_deref(), Some("https://example.com"));
        assert!(style.attributes.contains(Attributes::BOLD));
    }

    #[test]
    fn parse_unknown_token_aborts() {
        assert!(matches!(
            Style::parse("bold wrogn"),
            Err(StyleParseError::UnknownAttribute(_))
        ));
        assert!(matches!(
            Style::parse("#zzz"),
            Err(StyleParseError::InvalidColor(ColorParseError::InvalidHex(_)))
        ));
        assert!(matches!(Style::parse("  "), Err(StyleParseError::Empty)));
    }

    #[test]
    fn combine_overlay_wins_when_set() {
        let base = Style::parse("bold red").unwrap();
        let overlay = Style::parse("not bold on blue").unwrap();
        let combined = base.combine(&overlay);
        assert!(!combined.attributes.contains(Attributes::BOLD));
        assert!(combined.set_attributes.contains(Attributes::BOLD));
        assert_eq!(combined.color, Some(Color::Standard(1)));
        assert_eq!(combined.bgcolor, Some(Color::Standard(4)));
    }

    #[test]
    fn combine_with_unset_overlay_is_identity() {
        let base = Style::parse("bold red on white").unwrap();
        assert_eq!(base.combine(&Style::new()), base);
    }

    #[test]
    fn combine_inherits_unmentioned_attributes() {
        let base = Style::new().bold().underline();
        let overlay = Style::new().italic();
        let combined = base.combine(&overlay);
        assert!(combined.attributes.contains(Attributes::BOLD));
        assert!(combined.attributes.contains(Attributes::UNDERLINE));
        assert!(combined.attributes.contains(Attributes::ITALIC));
    }

    #[test]
    fn explicitly_off_differs_from_unset() {
        let unset = Style::new();
        let off = Style::parse("not bold").unwrap();
        assert_ne!(unset, off);
        assert!(!off.is_empty());
    }

    #[test]
    fn ansi_codes_order() {
        let style = Style::parse("bold red on white").unwrap();
        assert_eq!(style.ansi_codes(ColorSystem::TrueColor), "1;31;47");
    }

    #[test]
    fn ansi_codes_disable() {
        let style = Style::parse("not italic").unwrap();
        assert_eq!(style.ansi_codes(ColorSystem::TrueColor), "23");
    }

    #[test]
    fn ansi_codes_shared_disable_emitted_once() {
        let style = Style::parse("not bold not dim").unwrap();
        assert_eq!(style.ansi_codes(ColorSystem::TrueColor), "22");
    }

    #[test]
    fn ansi_codes_empty_style_is_reset() {
        assert_eq!(Style::new().ansi_codes(ColorSystem::TrueColor), "0");
        assert_eq!(Style::new().render_ansi(ColorSystem::TrueColor), "\x1b[0m");
    }

    #[test]
    fn render_ansi_downgrades_colors() {
        let style = Style::new().color(Color::from_rgb(255, 0, 0));
        assert_eq!(style.render_ansi(ColorSystem::Standard), "\x1b[91m");
        assert_eq!(
            style.render_ansi(ColorSystem::TrueColor),
            "\x1b[38;2;255;0;0m"
        );
    }

    #[test]
    fn render_ansi_opens_link() {
        let style = Style::new().bold().link("https://example.com");
        assert_eq!(
            style.render_ansi(ColorSystem::TrueColor),
            "\x1b[1m\x1b]8;;https://example.com\x1b\\"
        );
    }
}
