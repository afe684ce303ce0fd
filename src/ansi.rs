//! ANSI escape sequence codec.
//!
//! [`decode`] turns a byte stream containing SGR styling back into a
//! [`Text`] with spans; [`strip_ansi`] removes recognized sequences and
//! keeps everything else. Both tolerate garbage the way real terminals do:
//! unknown sequences are skipped, sequences truncated at end of input are
//! discarded, and nothing here returns an error.

use crate::color::Color;
use crate::style::{Attributes, Style};
use crate::text::Text;

/// A recognized escape sequence.
enum Sequence<'a> {
    /// `ESC [ params m`, carrying the SGR parameter bytes.
    Sgr(&'a str),
    /// Any other complete sequence; skipped.
    Other,
    /// Sequence cut off by end of input; discarded.
    Truncated,
}

/// Parse the escape sequence starting at `start` (which indexes an ESC).
///
/// Returns the classified sequence and the index of the first byte after it.
fn parse_escape(input: &str, start: usize) -> (Sequence<'_>, usize) {
    let bytes = input.as_bytes();
    match bytes.get(start + 1) {
        // CSI: ESC [ parameter-bytes intermediate-bytes final-byte
        Some(b'[') => {
            let mut j = start + 2;
            while j < bytes.len() && (0x30..=0x3F).contains(&bytes[j]) {
                j += 1;
            }
            while j < bytes.len() && (0x20..=0x2F).contains(&bytes[j]) {
                j += 1;
            }
            let Some(&final_byte) = bytes.get(j) else {
                return (Sequence::Truncated, bytes.len());
            };
            if !(0x40..=0x7E).contains(&final_byte) {
                // Malformed; drop what was scanned and resume at the odd byte.
                return (Sequence::Other, j);
            }
            let params = &input[start + 2..j];
            if final_byte == b'm'
                && params.bytes().all(|b| b.is_ascii_digit() || b == b';')
            {
                (Sequence::Sgr(params), j + 1)
            } else {
                (Sequence::Other, j + 1)
            }
        }
        // OSC: ESC ] ... terminated by BEL or ESC \
        Some(b']') => {
            let mut k = start + 2;
            while k < bytes.len() {
                if bytes[k] == 0x07 {
                    return (Sequence::Other, k + 1);
                }
                if bytes[k] == 0x1b && bytes.get(k + 1) == Some(&0x5C) {
                    return (Sequence::Other, k + 2);
                }
                k += 1;
            }
            (Sequence::Truncated, bytes.len())
        }
        // Two-character escape; skip ESC plus one (possibly multi-byte) char.
        Some(_) => {
            let skip = input[start + 1..].chars().next().map_or(0, char::len_utf8);
            (Sequence::Other, start + 1 + skip)
        }
        None => (Sequence::Truncated, bytes.len()),
    }
}

/// Fold a run of SGR parameters into a style.
fn apply_sgr(style: &mut Style, params: &str) {
    let values: Vec<i64> = if params.is_empty() {
        vec![0]
    } else {
        params
            .split(';')
            .map(|p| p.parse::<i64>().unwrap_or(0))
            .collect()
    };

    let mut i = 0;
    while i < values.len() {
        let code = values[i];
        i += 1;
        match code {
            0 => *style = Style::default(),
            1 => style.set_attribute(Attributes::BOLD, true),
            2 => style.set_attribute(Attributes::DIM, true),
            3 => style.set_attribute(Attributes::ITALIC, true),
            4 => style.set_attribute(Attributes::UNDERLINE, true),
            5 => style.set_attribute(Attributes::BLINK, true),
            7 => style.set_attribute(Attributes::REVERSE, true),
            8 => style.set_attribute(Attributes::CONCEAL, true),
            9 => style.set_attribute(Attributes::STRIKE, true),
            53 => style.set_attribute(Attributes::OVERLINE, true),
            22 => {
                // Normal intensity clears both bold and dim.
                style.set_attribute(Attributes::BOLD, false);
                style.set_attribute(Attributes::DIM, false);
            }
            23 => style.set_attribute(Attributes::ITALIC, false),
            24 => style.set_attribute(Attributes::UNDERLINE, false),
            25 => style.set_attribute(Attributes::BLINK, false),
            27 => style.set_attribute(Attributes::REVERSE, false),
            28 => style.set_attribute(Attributes::CONCEAL, false),
            29 => style.set_attribute(Attributes::STRIKE, false),
            55 => style.set_attribute(Attributes::OVERLINE, false),
            30..=37 => style.color = Some(Color::Standard((code - 30) as u8)),
            90..=97 => style.color = Some(Color::Standard((code - 90 + 8) as u8)),
            40..=47 => style.bgcolor = Some(Color::Standard((code - 40) as u8)),
            100..=107 => style.bgcolor = Some(Color::Standard((code - 100 + 8) as u8)),
            39 => style.color = None,
            49 => style.bgcolor = None,
            38 | 48 => {
                let foreground = code == 38;
                match values.get(i).copied() {
                    // 256-color: 38;5;N
                    Some(5) => {
                        if let Some(&n) = values.get(i + 1) {
                            if (0..=255).contains(&n) {
                                set_color(style, foreground, Color::EightBit(n as u8));
                            } else {
                                log::trace!("palette index out of range: {n}");
                            }
                        }
                        i += 2;
                    }
                    // Truecolor: 38;2;R;G;B
                    Some(2) => {
                        let rgb = (
                            values.get(i + 1).copied(),
                            values.get(i + 2).copied(),
                            values.get(i + 3).copied(),
                        );
                        if let (Some(r), Some(g), Some(b)) = rgb
                            && (0..=255).contains(&r)
                            && (0..=255).contains(&g)
                            && (0..=255).contains(&b)
                        {
                            set_color(
                                style,
                                foreground,
                                Color::from_rgb(r as u8, g as u8, b as u8),
                            );
                        }
                        i += 4;
                    }
                    _ => {
                        log::trace!("unknown extended color mode after {code}");
                        i += 1;
                    }
                }
            }
            other => log::trace!("ignoring SGR parameter {other}"),
        }
    }
}

fn set_color(style: &mut Style, foreground: bool, color: Color) {
    if foreground {
        style.color = Some(color);
    } else {
        style.bgcolor = Some(color);
    }
}

/// Decode terminal output into styled text.
///
/// Recognized SGR sequences drive a running style; every maximal run of
/// literal text under one non-empty style becomes a span. OSC sequences
/// (titles, hyperlinks) and non-SGR CSI sequences are discarded.
///
/// # Examples
///
/// ```
/// use richtext::ansi;
///
/// let text = ansi::decode("\x1b[1;31mHi\x1b[0m there");
/// assert_eq!(text.plain(), "Hi there");
/// assert_eq!(text.spans().len(), 1);
/// ```
pub fn decode(input: &str) -> Text {
    let bytes = input.as_bytes();
    let mut text = Text::new("");
    let mut style = Style::default();
    let mut run_start = 0;
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != 0x1b {
            i += 1;
            continue;
        }
        if literal_start < i {
            text.append(&input[literal_start..i]);
        }
        let (sequence, next) = parse_escape(input, i);
        if let Sequence::Sgr(params) = sequence {
            let mut updated = style.clone();
            apply_sgr(&mut updated, params);
            if updated != style {
                if text.len() > run_start && !style.is_empty() {
                    text.highlight(run_start, text.len(), style.clone());
                }
                run_start = text.len();
                style = updated;
            }
        }
        i = next;
        literal_start = i;
    }

    if literal_start < bytes.len() {
        text.append(&input[literal_start..]);
    }
    if text.len() > run_start && !style.is_empty() {
        text.highlight(run_start, text.len(), style);
    }

    text
}

/// Remove recognized escape sequences, copying everything else through.
///
/// A sequence truncated at end of input is dropped without error.
///
/// # Examples
///
/// ```
/// use richtext::ansi;
///
/// assert_eq!(ansi::strip_ansi("\x1b[31mred\x1b[0m"), "red");
/// ```
pub fn strip_ansi(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != 0x1b {
            i += 1;
            continue;
        }
        out.push_str(&input[literal_start..i]);
        let (_, next) = parse_escape(input, i);
        i = next;
        literal_start = i;
    }
    out.push_str(&input[literal_start..]);
    out
}
