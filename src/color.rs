//! Color types for terminal output.
//!
//! Colors are plain value types at one of three fidelity levels (the 16
//! standard ANSI colors, the 256-color palette, or 24-bit truecolor) plus
//! the terminal's default. A color can always be downgraded to a lower
//! [`ColorSystem`]; it is never upgraded.

use crate::error::ColorParseError;

/// An RGB triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorTriplet {
    /// Red component (0-255).
    pub red: u8,
    /// Green component (0-255).
    pub green: u8,
    /// Blue component (0-255).
    pub blue: u8,
}

/// WCAG contrast classification for a pair of colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContrastRating {
    /// Below 3.0: insufficient for any text.
    Fail,
    /// At least 3.0: acceptable for large text only.
    AaLarge,
    /// At least 4.5: acceptable for normal text.
    Aa,
    /// At least 7.0: enhanced contrast.
    Aaa,
}

impl ColorTriplet {
    /// Create a new triplet.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Format as a CSS-style hex string, e.g. `#ff8800`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Linear per-channel blend toward `other`.
    ///
    /// `factor` 0.0 returns `self`, 1.0 returns `other`.
    pub fn blend(self, other: Self, factor: f32) -> Self {
        let lerp = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * factor).round() as u8
        };
        Self::new(
            lerp(self.red, other.red),
            lerp(self.green, other.green),
            lerp(self.blue, other.blue),
        )
    }

    /// Blend toward `other` through HSL space, interpolating hue along the
    /// shortest arc. Keeps gradients between saturated colors saturated,
    /// where a straight RGB lerp would pass through gray.
    pub fn blend_hsl(self, other: Self, factor: f32) -> Self {
        let (h1, s1, l1) = rgb_to_hsl(self);
        let (h2, s2, l2) = rgb_to_hsl(other);
        // Shortest signed hue difference in (-180, 180].
        let dh = (h2 - h1 + 540.0).rem_euclid(360.0) - 180.0;
        let h = (h1 + dh * factor).rem_euclid(360.0);
        let s = s1 + (s2 - s1) * factor;
        let l = l1 + (l2 - l1) * factor;
        hsl_to_rgb(h, s, l)
    }

    /// Relative luminance per WCAG (gamma corrected, 0.0 = black, 1.0 = white).
    pub fn luminance(self) -> f64 {
        fn channel(value: u8) -> f64 {
            let c = f64::from(value) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.red) + 0.7152 * channel(self.green) + 0.0722 * channel(self.blue)
    }

    /// WCAG contrast ratio against `other`, in 1.0..=21.0.
    pub fn contrast_ratio(self, other: Self) -> f64 {
        let a = self.luminance();
        let b = other.luminance();
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Classify the contrast against `other` per WCAG thresholds.
    pub fn contrast_rating(self, other: Self) -> ContrastRating {
        let ratio = self.contrast_ratio(other);
        if ratio >= 7.0 {
            ContrastRating::Aaa
        } else if ratio >= 4.5 {
            ContrastRating::Aa
        } else if ratio >= 3.0 {
            ContrastRating::AaLarge
        } else {
            ContrastRating::Fail
        }
    }
}

fn rgb_to_hsl(t: ColorTriplet) -> (f32, f32, f32) {
    let r = f32::from(t.red) / 255.0;
    let g = f32::from(t.green) / 255.0;
    let b = f32::from(t.blue) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> ColorTriplet {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = if hp < 1.0 {
        (c, x, 0.0)
    } else if hp < 2.0 {
        (x, c, 0.0)
    } else if hp < 3.0 {
        (0.0, c, x)
    } else if hp < 4.0 {
        (0.0, x, c)
    } else if hp < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f32| -> u8 { ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8 };
    ColorTriplet::new(to_u8(r1), to_u8(g1), to_u8(b1))
}

/// Terminal color capability tier, ordered by fidelity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorSystem {
    /// The 16 standard ANSI colors.
    Standard,
    /// The 256-color palette.
    EightBit,
    /// 24-bit RGB.
    TrueColor,
}

/// A terminal color.
///
/// # Examples
///
/// ```
/// use richtext::{Color, ColorSystem};
///
/// let red = Color::parse("red").unwrap();
/// assert_eq!(red, Color::Standard(1));
///
/// let hex = Color::parse("#ff8800").unwrap();
/// let palette = hex.downgrade(ColorSystem::EightBit);
/// assert!(matches!(palette, Color::EightBit(_)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default foreground or background.
    Default,
    /// One of the 16 standard ANSI colors (0-15).
    Standard(u8),
    /// A 256-color palette index (0-255).
    EightBit(u8),
    /// A 24-bit RGB color.
    TrueColor(ColorTriplet),
}

/// Canonical RGB values for the 16 standard ANSI colors.
const STANDARD_PALETTE: [ColorTriplet; 16] = [
    ColorTriplet::new(0, 0, 0),       // black
    ColorTriplet::new(205, 0, 0),     // red
    ColorTriplet::new(0, 205, 0),     // green
    ColorTriplet::new(205, 205, 0),   // yellow
    ColorTriplet::new(0, 0, 238),     // blue
    ColorTriplet::new(205, 0, 205),   // magenta
    ColorTriplet::new(0, 205, 205),   // cyan
    ColorTriplet::new(229, 229, 229), // white
    ColorTriplet::new(127, 127, 127), // bright black
    ColorTriplet::new(255, 0, 0),     // bright red
    ColorTriplet::new(0, 255, 0),     // bright green
    ColorTriplet::new(255, 255, 0),   // bright yellow
    ColorTriplet::new(92, 92, 255),   // bright blue
    ColorTriplet::new(255, 0, 255),   // bright magenta
    ColorTriplet::new(0, 255, 255),   // bright cyan
    ColorTriplet::new(255, 255, 255), // bright white
];

/// Standard ANSI color names and their indices.
static STANDARD_NAMES: phf::Map<&'static str, u8> = phf::phf_map! {
    "black" => 0,
    "red" => 1,
    "green" => 2,
    "yellow" => 3,
    "blue" => 4,
    "magenta" => 5,
    "cyan" => 6,
    "white" => 7,
    "bright_black" => 8,
    "grey" => 8,
    "gray" => 8,
    "bright_red" => 9,
    "bright_green" => 10,
    "bright_yellow" => 11,
    "bright_blue" => 12,
    "bright_magenta" => 13,
    "bright_cyan" => 14,
    "bright_white" => 15,
};

/// Extended (web) color names resolved to RGB.
static EXTENDED_NAMES: phf::Map<&'static str, (u8, u8, u8)> = phf::phf_map! {
    "aqua" => (0, 255, 255),
    "fuchsia" => (255, 0, 255),
    "silver" => (192, 192, 192),
    "maroon" => (128, 0, 0),
    "olive" => (128, 128, 0),
    "navy" => (0, 0, 128),
    "purple" => (128, 0, 128),
    "teal" => (0, 128, 128),
    "lime" => (0, 255, 0),
    "orange" => (255, 165, 0),
    "pink" => (255, 192, 203),
    "brown" => (165, 42, 42),
    "coral" => (255, 127, 80),
    "gold" => (255, 215, 0),
    "indigo" => (75, 0, 130),
    "violet" => (238, 130, 238),
    "crimson" => (220, 20, 60),
    "darkblue" => (0, 0, 139),
    "darkcyan" => (0, 139, 139),
    "darkgreen" => (0, 100, 0),
    "darkmagenta" => (139, 0, 139),
    "darkorange" => (255, 140, 0),
    "darkred" => (139, 0, 0),
    "deeppink" => (255, 20, 147),
    "deepskyblue" => (0, 191, 255),
    "dodgerblue" => (30, 144, 255),
    "firebrick" => (178, 34, 34),
    "forestgreen" => (34, 139, 34),
    "goldenrod" => (218, 165, 32),
    "hotpink" => (255, 105, 180),
    "indianred" => (205, 92, 92),
    "khaki" => (240, 230, 140),
    "lavender" => (230, 230, 250),
    "lightblue" => (173, 216, 230),
    "lightcoral" => (240, 128, 128),
    "lightgreen" => (144, 238, 144),
    "limegreen" => (50, 205, 50),
    "midnightblue" => (25, 25, 112),
    "olivedrab" => (107, 142, 35),
    "orangered" => (255, 69, 0),
    "orchid" => (218, 112, 214),
    "plum" => (221, 160, 221),
    "royalblue" => (65, 105, 225),
    "salmon" => (250, 128, 114),
    "seagreen" => (46, 139, 87),
    "sienna" => (160, 82, 45),
    "skyblue" => (135, 206, 235),
    "slateblue" => (106, 90, 205),
    "slategray" => (112, 128, 144),
    "slategrey" => (112, 128, 144),
    "springgreen" => (0, 255, 127),
    "steelblue" => (70, 130, 180),
    "tan" => (210, 180, 140),
    "thistle" => (216, 191, 216),
    "tomato" => (255, 99, 71),
    "turquoise" => (64, 224, 208),
    "wheat" => (245, 222, 179),
    "yellowgreen" => (154, 205, 50),
};

impl Color {
    /// Create a truecolor value from components.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::TrueColor(ColorTriplet::new(red, green, blue))
    }

    /// Parse a color from a string.
    ///
    /// Supports:
    /// - `default`
    /// - Named colors: `red`, `bright_cyan`, `orange`, ...
    /// - Hex colors: `#RGB`, `#RRGGBB`, bare `RRGGBB`
    /// - RGB function: `rgb(r, g, b)`
    /// - Palette index: `color(N)` or bare `N` (0-255)
    ///
    /// # Examples
    ///
    /// ```
    /// use richtext::Color;
    ///
    /// assert_eq!(Color::parse("red").unwrap(), Color::Standard(1));
    /// assert_eq!(Color::parse("color(120)").unwrap(), Color::EightBit(120));
    /// assert_eq!(Color::parse("#ff0000").unwrap(), Color::from_rgb(255, 0, 0));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ColorParseError::UnknownName(String::new()));
        }

        let lower = input.to_lowercase();

        if lower == "default" {
            return Ok(Color::Default);
        }

        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if let Some(body) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            return Self::parse_rgb_func(body);
        }

        if let Some(body) = lower.strip_prefix("color(").and_then(|s| s.strip_suffix(')')) {
            return Self::parse_number(body.trim());
        }

        // Bare palette number: up to three decimal digits.
        if input.len() <= 3 && input.bytes().all(|b| b.is_ascii_digit()) {
            return Self::parse_number(input);
        }

        // Bare six-digit hex.
        if input.len() == 6 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::parse_hex(input);
        }

        if let Some(&number) = STANDARD_NAMES.get(lower.as_str()) {
            return Ok(Color::Standard(number));
        }
        if let Some(&(r, g, b)) = EXTENDED_NAMES.get(lower.as_str()) {
            return Ok(Color::from_rgb(r, g, b));
        }

        Err(ColorParseError::UnknownName(input.to_string()))
    }

    /// Parse a hex color (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digit = |c: u8| -> Result<u8, ColorParseError> {
            match c {
                b'0'..=b'9' => Ok(c - b'0'),
                b'a'..=b'f' => Ok(c - b'a' + 10),
                b'A'..=b'F' => Ok(c - b'A' + 10),
                _ => Err(ColorParseError::InvalidHex(format!("#{hex}"))),
            }
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = digit(bytes[0])?;
                let g = digit(bytes[1])?;
                let b = digit(bytes[2])?;
                Ok(Color::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = digit(bytes[0])? * 16 + digit(bytes[1])?;
                let g = digit(bytes[2])? * 16 + digit(bytes[3])?;
                let b = digit(bytes[4])? * 16 + digit(bytes[5])?;
                Ok(Color::from_rgb(r, g, b))
            }
            _ => Err(ColorParseError::InvalidHex(format!("#{hex}"))),
        }
    }

    /// Parse an RGB function body (the part inside the parentheses).
    fn parse_rgb_func(body: &str) -> Result<Self, ColorParseError> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ColorParseError::InvalidRgb(format!("rgb({body})")));
        }
        let channel = |part: &str| -> Result<u8, ColorParseError> {
            part.parse::<u8>()
                .map_err(|_| ColorParseError::InvalidRgb(format!("rgb({body})")))
        };
        Ok(Color::from_rgb(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
        ))
    }

    /// Parse a palette index in 0-255.
    fn parse_number(body: &str) -> Result<Self, ColorParseError> {
        let number: i64 = body
            .parse()
            .map_err(|_| ColorParseError::UnknownName(format!("color({body})")))?;
        if !(0..=255).contains(&number) {
            return Err(ColorParseError::NumberOutOfRange(number));
        }
        let number = number as u8;
        if number < 16 {
            Ok(Color::Standard(number))
        } else {
            Ok(Color::EightBit(number))
        }
    }

    /// The capability tier this color natively belongs to.
    ///
    /// [`Color::Default`] has no tier; it renders everywhere.
    pub fn system(&self) -> Option<ColorSystem> {
        match self {
            Color::Default => None,
            Color::Standard(_) => Some(ColorSystem::Standard),
            Color::EightBit(_) => Some(ColorSystem::EightBit),
            Color::TrueColor(_) => Some(ColorSystem::TrueColor),
        }
    }

    /// Resolve to an RGB triplet. `Default` has none.
    pub fn triplet(&self) -> Option<ColorTriplet> {
        match *self {
            Color::Default => None,
            Color::Standard(number) => Some(STANDARD_PALETTE[(number & 0x0F) as usize]),
            Color::EightBit(number) => Some(eight_bit_to_triplet(number)),
            Color::TrueColor(triplet) => Some(triplet),
        }
    }

    /// Downgrade this color to fit the given color system.
    ///
    /// A color that already fits is returned unchanged; downgrading never
    /// upgrades and is idempotent.
    pub fn downgrade(self, system: ColorSystem) -> Self {
        match (self, system) {
            (Color::Default, _) | (Color::Standard(_), _) => self,
            (Color::EightBit(_), ColorSystem::EightBit | ColorSystem::TrueColor) => self,
            (Color::TrueColor(_), ColorSystem::TrueColor) => self,
            (Color::TrueColor(triplet), ColorSystem::EightBit) => {
                Color::EightBit(triplet_to_eight_bit(triplet))
            }
            (Color::TrueColor(triplet), ColorSystem::Standard) => {
                Color::Standard(nearest_standard(triplet))
            }
            (Color::EightBit(number), ColorSystem::Standard) => {
                Color::Standard(nearest_standard(eight_bit_to_triplet(number)))
            }
        }
    }

    /// SGR parameters selecting this color, downgraded to `system` first.
    ///
    /// `foreground` picks the 30/38/39 family, otherwise 40/48/49.
    pub fn ansi_codes(&self, foreground: bool, system: ColorSystem) -> Vec<String> {
        match self.downgrade(system) {
            Color::Default => vec![if foreground { "39" } else { "49" }.to_string()],
            Color::Standard(number) => {
                let base: u8 = match (foreground, number < 8) {
                    (true, true) => 30 + number,
                    (true, false) => 90 + (number - 8),
                    (false, true) => 40 + number,
                    (false, false) => 100 + (number - 8),
                };
                vec![base.to_string()]
            }
            Color::EightBit(number) => {
                let lead = if foreground { "38" } else { "48" };
                vec![lead.to_string(), "5".to_string(), number.to_string()]
            }
            Color::TrueColor(t) => {
                let lead = if foreground { "38" } else { "48" };
                vec![
                    lead.to_string(),
                    "2".to_string(),
                    t.red.to_string(),
                    t.green.to_string(),
                    t.blue.to_string(),
                ]
            }
        }
    }
}

/// RGB value of a 256-color palette index.
fn eight_bit_to_triplet(index: u8) -> ColorTriplet {
    if index < 16 {
        return STANDARD_PALETTE[index as usize];
    }
    if index >= 232 {
        let gray = 8 + 10 * (index - 232);
        return ColorTriplet::new(gray, gray, gray);
    }
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let idx = index - 16;
    ColorTriplet::new(
        LEVELS[(idx / 36) as usize],
        LEVELS[((idx / 6) % 6) as usize],
        LEVELS[(idx % 6) as usize],
    )
}

/// Nearest 256-color palette index for an RGB triplet.
///
/// Grays map onto the 24-step ramp (232-255); near-black and near-white
/// snap to the cube endpoints 16/231 so the ramp never duplicates them.
/// Everything else maps into the 6x6x6 cube.
fn triplet_to_eight_bit(t: ColorTriplet) -> u8 {
    if t.red == t.green && t.green == t.blue {
        if t.red < 8 {
            return 16;
        }
        if t.red > 248 {
            return 231;
        }
        return 232 + ((t.red - 8) / 10).min(23);
    }
    16 + 36 * cube_index(t.red) + 6 * cube_index(t.green) + cube_index(t.blue)
}

/// Nearest 6x6x6 cube level for a channel value.
///
/// The cube levels `[0, 95, 135, 175, 215, 255]` are not uniformly spaced;
/// the thresholds here are the midpoints between adjacent levels.
fn cube_index(v: u8) -> u8 {
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

/// Index of the nearest standard color by squared Euclidean distance.
/// The first minimal match wins ties.
fn nearest_standard(t: ColorTriplet) -> u8 {
    let mut best = 0u8;
    let mut best_distance = u32::MAX;
    for (index, candidate) in STANDARD_PALETTE.iter().enumerate() {
        let dr = i32::from(t.red) - i32::from(candidate.red);
        let dg = i32::from(t.green) - i32::from(candidate.green);
        let db = i32::from(t.blue) - i32::from(candidate.blue);
        let distance = (dr * dr + dg * dg + db * db) as u32;
        if distance < best_distance {
            best = index as u8;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_standard() {
        assert_eq!(Color::parse("red").unwrap(), Color::Standard(1));
        assert_eq!(Color::parse("Blue").unwrap(), Color::Standard(4));
        assert_eq!(Color::parse("BRIGHT_WHITE").unwrap(), Color::Standard(15));
        assert_eq!(Color::parse("gray").unwrap(), Color::Standard(8));
    }

    #[test]
    fn parse_named_extended() {
        assert_eq!(Color::parse("orange").unwrap(), Color::from_rgb(255, 165, 0));
        assert_eq!(Color::parse("tomato").unwrap(), Color::from_rgb(255, 99, 71));
    }

    #[test]
    fn parse_default() {
        assert_eq!(Color::parse("default").unwrap(), Color::Default);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::parse("#f00").unwrap(), Color::from_rgb(255, 0, 0));
        assert_eq!(Color::parse("#ff5733").unwrap(), Color::from_rgb(255, 87, 51));
        assert_eq!(Color::parse("ff5733").unwrap(), Color::from_rgb(255, 87, 51));
    }

    #[test]
    fn parse_rgb_func() {
        assert_eq!(
            Color::parse("rgb(255, 87, 51)").unwrap(),
            Color::from_rgb(255, 87, 51)
        );
        assert_eq!(Color::parse("rgb(0,0,0)").unwrap(), Color::from_rgb(0, 0, 0));
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(Color::parse("color(5)").unwrap(), Color::Standard(5));
        assert_eq!(Color::parse("color(120)").unwrap(), Color::EightBit(120));
        assert_eq!(Color::parse("9").unwrap(), Color::Standard(9));
        assert_eq!(Color::parse("200").unwrap(), Color::EightBit(200));
    }

    #[test]
    fn parse_invalid() {
        assert!(matches!(
            Color::parse("notacolor"),
            Err(ColorParseError::UnknownName(_))
        ));
        assert!(matches!(
            Color::parse("#gg0000"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::parse("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::parse("rgb(256, 0, 0)"),
            Err(ColorParseError::InvalidRgb(_))
        ));
        assert!(matches!(
            Color::parse("color(300)"),
            Err(ColorParseError::NumberOutOfRange(300))
        ));
    }

    #[test]
    fn triplet_lookup() {
        assert_eq!(Color::Default.triplet(), None);
        assert_eq!(
            Color::Standard(9).triplet(),
            Some(ColorTriplet::new(255, 0, 0))
        );
        assert_eq!(
            Color::EightBit(196).triplet(),
            Some(ColorTriplet::new(255, 0, 0))
        );
        assert_eq!(
            Color::EightBit(232).triplet(),
            Some(ColorTriplet::new(8, 8, 8))
        );
        assert_eq!(
            Color::EightBit(231).triplet(),
            Some(ColorTriplet::new(255, 255, 255))
        );
    }

    #[test]
    fn downgrade_passthrough() {
        let rgb = Color::from_rgb(12, 34, 56);
        assert_eq!(rgb.downgrade(ColorSystem::TrueColor), rgb);
        assert_eq!(
            Color::Standard(3).downgrade(ColorSystem::Standard),
            Color::Standard(3)
        );
        assert_eq!(
            Color::EightBit(100).downgrade(ColorSystem::TrueColor),
            Color::EightBit(100)
        );
        assert_eq!(Color::Default.downgrade(ColorSystem::Standard), Color::Default);
    }

    #[test]
    fn downgrade_gray_ramp() {
        assert_eq!(
            Color::from_rgb(0, 0, 0).downgrade(ColorSystem::EightBit),
            Color::EightBit(16)
        );
        assert_eq!(
            Color::from_rgb(255, 255, 255).downgrade(ColorSystem::EightBit),
            Color::EightBit(231)
        );
        assert_eq!(
            Color::from_rgb(8, 8, 8).downgrade(ColorSystem::EightBit),
            Color::EightBit(232)
        );
        assert_eq!(
            Color::from_rgb(128, 128, 128).downgrade(ColorSystem::EightBit),
            Color::EightBit(244)
        );
    }

    #[test]
    fn downgrade_color_cube() {
        assert_eq!(
            Color::from_rgb(255, 0, 0).downgrade(ColorSystem::EightBit),
            Color::EightBit(196)
        );
        assert_eq!(
            Color::from_rgb(0, 255, 0).downgrade(ColorSystem::EightBit),
            Color::EightBit(46)
        );
        assert_eq!(
            Color::from_rgb(0, 0, 255).downgrade(ColorSystem::EightBit),
            Color::EightBit(21)
        );
    }

    #[test]
    fn downgrade_to_standard() {
        let red = Color::parse("#ff0000").unwrap();
        assert!(matches!(
            red.downgrade(ColorSystem::Standard),
            Color::Standard(1 | 9)
        ));
        assert_eq!(
            Color::from_rgb(0, 0, 0).downgrade(ColorSystem::Standard),
            Color::Standard(0)
        );
        assert_eq!(
            Color::from_rgb(255, 255, 255).downgrade(ColorSystem::Standard),
            Color::Standard(15)
        );
        assert_eq!(
            Color::EightBit(196).downgrade(ColorSystem::Standard),
            Color::Standard(9)
        );
    }

    #[test]
    fn downgrade_is_idempotent() {
        for color in [
            Color::from_rgb(200, 100, 50),
            Color::EightBit(123),
            Color::Standard(4),
            Color::Default,
        ] {
            let once = color.downgrade(ColorSystem::Standard);
            assert_eq!(once.downgrade(ColorSystem::Standard), once);
            let eight = color.downgrade(ColorSystem::EightBit);
            assert_eq!(eight.downgrade(ColorSystem::EightBit), eight);
        }
    }

    #[test]
    fn ansi_codes_standard() {
        assert_eq!(
            Color::Standard(1).ansi_codes(true, ColorSystem::TrueColor),
            vec!["31"]
        );
        assert_eq!(
            Color::Standard(9).ansi_codes(true, ColorSystem::TrueColor),
            vec!["91"]
        );
        assert_eq!(
            Color::Standard(7).ansi_codes(false, ColorSystem::TrueColor),
            vec!["47"]
        );
        assert_eq!(
            Color::Standard(15).ansi_codes(false, ColorSystem::TrueColor),
            vec!["107"]
        );
    }

    #[test]
    fn ansi_codes_extended() {
        assert_eq!(
            Color::EightBit(100).ansi_codes(true, ColorSystem::TrueColor),
            vec!["38", "5", "100"]
        );
        assert_eq!(
            Color::from_rgb(1, 2, 3).ansi_codes(false, ColorSystem::TrueColor),
            vec!["48", "2", "1", "2", "3"]
        );
        assert_eq!(
            Color::Default.ansi_codes(true, ColorSystem::Standard),
            vec!["39"]
        );
    }

    #[test]
    fn ansi_codes_downgrade_first() {
        // Truecolor red rendered on a standard terminal becomes bright red.
        assert_eq!(
            Color::from_rgb(255, 0, 0).ansi_codes(true, ColorSystem::Standard),
            vec!["91"]
        );
        assert_eq!(
            Color::from_rgb(255, 0, 0).ansi_codes(true, ColorSystem::EightBit),
            vec!["38", "5", "196"]
        );
    }

    #[test]
    fn blend_linear() {
        let black = ColorTriplet::new(0, 0, 0);
        let white = ColorTriplet::new(255, 255, 255);
        assert_eq!(black.blend(white, 0.0), black);
        assert_eq!(black.blend(white, 1.0), white);
        assert_eq!(black.blend(white, 0.5), ColorTriplet::new(128, 128, 128));
    }

    #[test]
    fn blend_hsl_stays_saturated() {
        let red = ColorTriplet::new(255, 0, 0);
        let yellow = ColorTriplet::new(255, 255, 0);
        let mid = red.blend_hsl(yellow, 0.5);
        // Halfway is orange: full red, no blue, mid green.
        assert_eq!(mid.red, 255);
        assert_eq!(mid.blue, 0);
        assert!((120..=135).contains(&mid.green), "green = {}", mid.green);
    }

    #[test]
    fn blend_hsl_shortest_arc() {
        // Red (0deg) to blue (240deg) goes backwards through magenta (300deg),
        // not forwards through green.
        let red = ColorTriplet::new(255, 0, 0);
        let blue = ColorTriplet::new(0, 0, 255);
        let mid = red.blend_hsl(blue, 0.5);
        assert!(mid.green < 30, "expected magenta-ish, got {mid:?}");
        assert!(mid.red > 200 && mid.blue > 200, "got {mid:?}");
    }

    #[test]
    fn luminance_and_contrast() {
        let black = ColorTriplet::new(0, 0, 0);
        let white = ColorTriplet::new(255, 255, 255);
        assert!(black.luminance() < 1e-6);
        assert!((white.luminance() - 1.0).abs() < 1e-6);
        assert!((white.contrast_ratio(black) - 21.0).abs() < 0.01);
        assert_eq!(white.contrast_rating(black), ContrastRating::Aaa);
        assert_eq!(white.contrast_rating(white), ContrastRating::Fail);
        // Gray on white sits in the large-text band.
        let gray = ColorTriplet::new(128, 128, 128);
        assert_eq!(white.contrast_rating(gray), ContrastRating::AaLarge);
    }

    #[test]
    fn contrast_is_symmetric() {
        let a = ColorTriplet::new(20, 60, 200);
        let b = ColorTriplet::new(250, 240, 10);
        assert!((a.contrast_ratio(b) - b.contrast_ratio(a)).abs() < 1e-9);
    }

    #[test]
    fn triplet_hex() {
        assert_eq!(ColorTriplet::new(255, 136, 0).hex(), "#ff8800");
    }

    #[test]
    fn system_ordering() {
        assert!(ColorSystem::Standard < ColorSystem::EightBit);
        assert!(ColorSystem::EightBit < ColorSystem::TrueColor);
        assert_eq!(Color::Default.system(), None);
        assert_eq!(Color::Standard(0).system(), Some(ColorSystem::Standard));
    }
}
