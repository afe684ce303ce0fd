//! Segment: the atomic unit of styled terminal output.
//!
//! A segment is either a piece of text with one consistent style, or a
//! control code with no visible width. Renderers produce streams of
//! segments; the helpers here split, divide and pad those streams while
//! keeping cell arithmetic correct.

use std::fmt;

use smallvec::SmallVec;

use crate::cells::{cell_len, cell_to_byte_index};
use crate::color::ColorSystem;
use crate::style::{LINK_CLOSE, Style};

/// Inline storage for two segments covers the common line shapes:
/// a single styled run, or "label" + "value".
pub type SegmentLine = SmallVec<[Segment; 2]>;

/// Non-printing terminal operations, each with one fixed encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCode {
    /// Audible bell.
    Bell,
    /// Return the cursor to column zero.
    CarriageReturn,
    /// Move the cursor to the top-left corner.
    Home,
    /// Clear the screen.
    Clear,
    /// Show the cursor.
    ShowCursor,
    /// Hide the cursor.
    HideCursor,
    /// Switch to the alternate screen buffer.
    EnableAltScreen,
    /// Return from the alternate screen buffer.
    DisableAltScreen,
    /// Move the cursor up by a number of rows.
    CursorUp(u16),
    /// Move the cursor down by a number of rows.
    CursorDown(u16),
    /// Move the cursor right by a number of columns.
    CursorForward(u16),
    /// Move the cursor left by a number of columns.
    CursorBackward(u16),
    /// Move the cursor to a column (zero-based).
    CursorMoveToColumn(u16),
    /// Move the cursor to a position (zero-based).
    CursorMoveTo {
        /// Column.
        x: u16,
        /// Row.
        y: u16,
    },
    /// Erase in the current line (0 = to end, 1 = to start, 2 = all).
    EraseInLine(u8),
    /// Set the terminal window title.
    SetWindowTitle(String),
}

impl ControlCode {
    /// The escape sequence for this operation.
    pub fn ansi(&self) -> String {
        match self {
            ControlCode::Bell => "\x07".to_string(),
            ControlCode::CarriageReturn => "\r".to_string(),
            ControlCode::Home => "\x1b[H".to_string(),
            ControlCode::Clear => "\x1b[2J".to_string(),
            ControlCode::ShowCursor => "\x1b[?25h".to_string(),
            ControlCode::HideCursor => "\x1b[?25l".to_string(),
            ControlCode::EnableAltScreen => "\x1b[?1049h".to_string(),
            ControlCode::DisableAltScreen => "\x1b[?1049l".to_string(),
            ControlCode::CursorUp(n) => format!("\x1b[{n}A"),
            ControlCode::CursorDown(n) => format!("\x1b[{n}B"),
            ControlCode::CursorForward(n) => format!("\x1b[{n}C"),
            ControlCode::CursorBackward(n) => format!("\x1b[{n}D"),
            ControlCode::CursorMoveToColumn(column) => format!("\x1b[{}G", column + 1),
            ControlCode::CursorMoveTo { x, y } => format!("\x1b[{};{}H", y + 1, x + 1),
            ControlCode::EraseInLine(mode) => format!("\x1b[{mode}K"),
            ControlCode::SetWindowTitle(title) => format!("\x1b]0;{title}\x07"),
        }
    }
}

/// A styled text chunk, or a control code.
///
/// Text and control are mutually exclusive: a control segment carries no
/// text and has zero cell width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    /// The text content (empty for control segments).
    pub text: String,
    /// The style to apply (`None` = unstyled).
    pub style: Option<Style>,
    /// The control operation, if this is a control segment.
    pub control: Option<ControlCode>,
}

impl Segment {
    /// Create a segment with text and optional style.
    pub fn new(text: impl Into<String>, style: Option<Style>) -> Self {
        Self {
            text: text.into(),
            style,
            control: None,
        }
    }

    /// Create a styled segment.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(text, Some(style))
    }

    /// Create an unstyled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    /// Create a newline segment.
    pub fn line() -> Self {
        Self::new("\n", None)
    }

    /// Create a control segment.
    pub fn control(code: ControlCode) -> Self {
        Self {
            text: String::new(),
            style: None,
            control: Some(code),
        }
    }

    /// Check if this is a control segment.
    pub const fn is_control(&self) -> bool {
        self.control.is_some()
    }

    /// The display width of this segment in cells. Zero for control segments.
    pub fn cell_length(&self) -> usize {
        if self.is_control() {
            0
        } else {
            cell_len(&self.text)
        }
    }

    /// Check if this segment has neither text nor a control code.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.control.is_none()
    }

    /// Split at a cell offset into two style-preserving segments.
    ///
    /// A cut inside a double-width character keeps the whole character in
    /// the left segment. Splitting a control segment returns
    /// `(self, empty)`.
    pub fn split_cells(&self, cut: usize) -> (Segment, Segment) {
        if self.is_control() {
            return (self.clone(), Segment::default());
        }
        let byte_index = cell_to_byte_index(&self.text, cut);
        let (left, right) = self.text.split_at(byte_index);
        (
            Segment::new(left, self.style.clone()),
            Segment::new(right, self.style.clone()),
        )
    }

    /// Write this segment to `writer` as terminal output.
    ///
    /// Control segments emit their fixed sequence. Styled segments emit the
    /// style prefix, the text, a reset, and the OSC 8 close when the style
    /// carries a hyperlink.
    pub fn render(&self, writer: &mut impl fmt::Write, system: ColorSystem) -> fmt::Result {
        if let Some(code) = &self.control {
            return writer.write_str(&code.ansi());
        }
        match &self.style {
            Some(style) => {
                writer.write_str(&style.render_ansi(system))?;
                writer.write_str(&self.text)?;
                writer.write_str("\x1b[0m")?;
                if style.link.is_some() {
                    writer.write_str(LINK_CLOSE)?;
                }
                Ok(())
            }
            None => writer.write_str(&self.text),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Total cell width of a run of segments.
pub fn line_cell_length(line: &[Segment]) -> usize {
    line.iter().map(Segment::cell_length).sum()
}

/// Partition segments at cell-offset cut points.
///
/// Returns `cuts.len() + 1` lines; segments straddling a cut are split.
pub fn divide(segments: Vec<Segment>, cuts: &[usize]) -> Vec<SegmentLine> {
    if cuts.is_empty() {
        return vec![segments.into_iter().collect()];
    }

    let mut result: Vec<SegmentLine> = vec![SegmentLine::new(); cuts.len() + 1];
    let mut position = 0;
    let mut cut_index = 0;

    for segment in segments {
        if segment.is_control() {
            result[cut_index].push(segment);
            continue;
        }

        let width = segment.cell_length();
        let end = position + width;

        while cut_index < cuts.len() && cuts[cut_index] <= position {
            cut_index += 1;
        }

        if cut_index >= cuts.len() || end <= cuts[cut_index] {
            // Fits entirely in the current division.
            if !segment.text.is_empty() {
                result[cut_index].push(segment);
            }
        } else {
            // Straddles one or more cuts: split as needed.
            let mut remaining = segment;
            let mut pos = position;
            while cut_index < cuts.len() && pos + remaining.cell_length() > cuts[cut_index] {
                let (left, right) = remaining.split_cells(cuts[cut_index] - pos);
                if !left.text.is_empty() {
                    result[cut_index].push(left);
                }
                pos = cuts[cut_index];
                cut_index += 1;
                remaining = right;
            }
            if !remaining.text.is_empty() {
                let target = cut_index.min(result.len() - 1);
                result[target].push(remaining);
            }
        }

        position = end;
    }

    result
}

/// Pad or truncate a line of segments to exactly `length` cells.
///
/// Padding appends a trailing run of `pad_char` with the given style;
/// truncation splits the final straddling segment.
pub fn adjust_line_length(
    line: impl IntoIterator<Item = Segment>,
    length: usize,
    pad_char: char,
    style: Option<Style>,
) -> SegmentLine {
    let line: SegmentLine = line.into_iter().collect();
    let current = line_cell_length(&line);

    if current < length {
        let mut line = line;
        let pad: String = std::iter::repeat_n(pad_char, length - current).collect();
        line.push(Segment::new(pad, style));
        return line;
    }

    if current > length {
        let mut result = SegmentLine::new();
        let mut remaining = length;
        for segment in line {
            if segment.is_control() {
                result.push(segment);
                continue;
            }
            let width = segment.cell_length();
            if width <= remaining {
                remaining -= width;
                result.push(segment);
            } else {
                if remaining > 0 {
                    let (left, _) = segment.split_cells(remaining);
                    result.push(left);
                }
                break;
            }
        }
        return result;
    }

    line
}

/// Split a run of segments into lines at newline characters.
///
/// Control segments stay on the line that was current when they appeared.
pub fn split_lines(segments: impl IntoIterator<Item = Segment>) -> Vec<SegmentLine> {
    let mut lines: Vec<SegmentLine> = vec![SegmentLine::new()];

    for segment in segments {
        if segment.is_control() {
            lines.last_mut().expect("at least one line").push(segment);
            continue;
        }
        for (index, part) in segment.text.split('\n').enumerate() {
            if index > 0 {
                lines.push(SegmentLine::new());
            }
            if !part.is_empty() {
                lines
                    .last_mut()
                    .expect("at least one line")
                    .push(Segment::new(part, segment.style.clone()));
            }
        }
    }

    lines
}

/// Merge adjacent text segments that share a style.
pub fn simplify(segments: impl IntoIterator<Item = Segment>) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::new();

    for segment in segments {
        if segment.is_control() {
            result.push(segment);
            continue;
        }
        if segment.text.is_empty() {
            continue;
        }
        if let Some(last) = result.last_mut()
            && !last.is_control()
            && last.style == segment.style
        {
            last.text.push_str(&segment.text);
            continue;
        }
        result.push(segment);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn segment_new() {
        let seg = Segment::plain("hello");
        assert_eq!(seg.text, "hello");
        assert!(seg.style.is_none());
        assert!(!seg.is_control());
    }

    #[test]
    fn cell_length_counts_wide_chars() {
        assert_eq!(Segment::plain("hello").cell_length(), 5);
        assert_eq!(Segment::plain("日本").cell_length(), 4);
        assert_eq!(Segment::plain("a日b").cell_length(), 4);
    }

    #[test]
    fn control_segments_are_zero_width() {
        let seg = Segment::control(ControlCode::Bell);
        assert_eq!(seg.cell_length(), 0);
        assert!(seg.is_control());
        assert!(seg.text.is_empty());
    }

    #[test]
    fn control_encodings() {
        assert_eq!(ControlCode::Bell.ansi(), "\x07");
        assert_eq!(ControlCode::Clear.ansi(), "\x1b[2J");
        assert_eq!(ControlCode::CursorUp(3).ansi(), "\x1b[3A");
        assert_eq!(ControlCode::CursorMoveToColumn(0).ansi(), "\x1b[1G");
        assert_eq!(
            ControlCode::CursorMoveTo { x: 2, y: 5 }.ansi(),
            "\x1b[6;3H"
        );
        assert_eq!(
            ControlCode::SetWindowTitle("hi".to_string()).ansi(),
            "\x1b]0;hi\x07"
        );
    }

    #[test]
    fn split_cells_basic() {
        let seg = Segment::plain("hello world");
        let (left, right) = seg.split_cells(5);
        assert_eq!(left.text, "hello");
        assert_eq!(right.text, " world");
    }

    #[test]
    fn split_cells_preserves_style() {
        let seg = Segment::styled("hello", Style::new().bold());
        let (left, right) = seg.split_cells(2);
        assert_eq!(left.style, seg.style);
        assert_eq!(right.style, seg.style);
    }

    #[test]
    fn split_cells_keeps_wide_char_whole() {
        let seg = Segment::plain("日本");
        let (left, right) = seg.split_cells(1);
        assert_eq!(left.text, "日");
        assert_eq!(right.text, "本");
    }

    #[test]
    fn split_cells_control_returns_self_and_empty() {
        let seg = Segment::control(ControlCode::Home);
        let (left, right) = seg.split_cells(3);
        assert_eq!(left, seg);
        assert!(right.is_empty());
    }

    #[test]
    fn render_plain_and_styled() {
        let mut out = String::new();
        Segment::plain("hi").render(&mut out, ColorSystem::TrueColor).unwrap();
        assert_eq!(out, "hi");

        let mut out = String::new();
        Segment::styled("hi", Style::new().bold())
            .render(&mut out, ColorSystem::TrueColor)
            .unwrap();
        assert_eq!(out, "\x1b[1mhi\x1b[0m");
    }

    #[test]
    fn render_downgrades_color() {
        let style = Style::new().color(Color::from_rgb(255, 0, 0));
        let mut out = String::new();
        Segment::styled("x", style)
            .render(&mut out, ColorSystem::Standard)
            .unwrap();
        assert_eq!(out, "\x1b[91mx\x1b[0m");
    }

    #[test]
    fn render_closes_hyperlink() {
        let style = Style::new().link("https://example.com");
        let mut out = String::new();
        Segment::styled("x", style)
            .render(&mut out, ColorSystem::TrueColor)
            .unwrap();
        assert!(out.ends_with("\x1b]8;;\x1b\\"));
    }

    #[test]
    fn render_control() {
        let mut out = String::new();
        Segment::control(ControlCode::HideCursor)
            .render(&mut out, ColorSystem::TrueColor)
            .unwrap();
        assert_eq!(out, "\x1b[?25l");
    }

    #[test]
    fn divide_splits_straddling_segment() {
        let divided = divide(vec![Segment::plain("hello world")], &[5]);
        assert_eq!(divided.len(), 2);
        assert_eq!(divided[0][0].text, "hello");
        assert_eq!(divided[1][0].text, " world");
    }

    #[test]
    fn divide_multiple_cuts() {
        let divided = divide(vec![Segment::plain("abcdef")], &[2, 4]);
        assert_eq!(divided.len(), 3);
        assert_eq!(divided[0][0].text, "ab");
        assert_eq!(divided[1][0].text, "cd");
        assert_eq!(divided[2][0].text, "ef");
    }

    #[test]
    fn divide_preserves_total_width() {
        let segments = vec![
            Segment::styled("hel", Style::new().bold()),
            Segment::plain("lo world"),
        ];
        let total = line_cell_length(&segments);
        let divided = divide(segments, &[4, 7]);
        let sum: usize = divided.iter().map(|line| line_cell_length(line)).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn adjust_line_length_pads() {
        let line = adjust_line_length([Segment::plain("hi")], 5, ' ', None);
        assert_eq!(line_cell_length(&line), 5);
        assert_eq!(line[1].text, "   ");
    }

    #[test]
    fn adjust_line_length_truncates() {
        let line = adjust_line_length([Segment::plain("hello world")], 5, ' ', None);
        assert_eq!(line_cell_length(&line), 5);
        assert_eq!(line[0].text, "hello");
    }

    #[test]
    fn adjust_line_length_exact_is_identity() {
        let line = adjust_line_length([Segment::plain("abc")], 3, ' ', None);
        assert_eq!(line.len(), 1);
        assert_eq!(line[0].text, "abc");
    }

    #[test]
    fn split_lines_at_newlines() {
        let lines = split_lines([
            Segment::plain("line1\nline2"),
            Segment::plain("\nline3"),
        ]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0][0].text, "line1");
        assert_eq!(lines[1][0].text, "line2");
        assert_eq!(lines[2][0].text, "line3");
    }

    #[test]
    fn simplify_merges_same_style() {
        let style = Style::new().bold();
        let merged = simplify([
            Segment::styled("hello", style.clone()),
            Segment::styled(" ", style.clone()),
            Segment::styled("world", style),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "hello world");
    }

    #[test]
    fn simplify_keeps_distinct_styles() {
        let merged = simplify([
            Segment::styled("a", Style::new().bold()),
            Segment::plain("b"),
        ]);
        assert_eq!(merged.len(), 2);
    }
}
