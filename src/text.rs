//! Rich text with styled spans.
//!
//! A [`Text`] owns a plain UTF-8 buffer, a list of [`Span`]s referencing
//! byte ranges of that buffer, and a base style. Every editing operation
//! keeps the spans valid against the buffer it returns: offsets are
//! clipped, re-based or shifted as the text changes, and they always land
//! on character boundaries.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::cells::{cell_len, char_cell_width, clip_byte_index};
use crate::segment::{Segment, simplify};
use crate::style::Style;

/// A styled byte range over a [`Text`]'s plain buffer.
///
/// `start` is inclusive, `end` exclusive; both are byte offsets on
/// character boundaries of the owning buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Style applied over the range.
    pub style: Style,
}

impl Span {
    /// Create a new span. A reversed range is normalized.
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self {
            start: start.min(end),
            end: end.max(start),
            style,
        }
    }

    /// Check if this span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// A copy shifted right by `offset` bytes.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            style: self.style.clone(),
        }
    }
}

/// Round a byte offset down to the nearest character boundary.
fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Styled text built from a plain buffer, spans and a base style.
///
/// Operations that look mutating either rebuild the buffer in place or
/// return a new `Text`; either way the result owns independent storage and
/// its spans are valid against its own buffer.
///
/// # Examples
///
/// ```
/// use richtext::{Style, Text};
///
/// let mut text = Text::new("hello world");
/// text.highlight(0, 5, Style::parse("bold").unwrap());
/// let lines = text.wrap(5);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].plain(), "hello");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    plain: String,
    spans: Vec<Span>,
    style: Style,
}

impl Text {
    /// Create text with no spans and an empty base style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain: text.into(),
            spans: Vec::new(),
            style: Style::default(),
        }
    }

    /// Create text covered by a single styled span.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let plain: String = text.into();
        let spans = if plain.is_empty() {
            Vec::new()
        } else {
            vec![Span::new(0, plain.len(), style)]
        };
        Self {
            plain,
            spans,
            style: Style::default(),
        }
    }

    /// Assemble text from `(content, style)` pieces.
    pub fn assemble<'a>(pieces: impl IntoIterator<Item = (&'a str, Option<Style>)>) -> Self {
        let mut text = Self::new("");
        for (content, style) in pieces {
            match style {
                Some(style) => text.append_styled(content, style),
                None => text.append(content),
            }
        }
        text
    }

    /// The plain text content.
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// The style spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The base style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Set the base style.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Builder form of [`set_style`](Self::set_style).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Length of the plain text in bytes.
    pub fn len(&self) -> usize {
        self.plain.len()
    }

    /// Check if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }

    /// Display width in terminal cells.
    pub fn cell_len(&self) -> usize {
        cell_len(&self.plain)
    }

    /// Append plain text.
    pub fn append(&mut self, text: &str) {
        self.plain.push_str(text);
    }

    /// Append text covered by a styled span.
    pub fn append_styled(&mut self, text: &str, style: Style) {
        let start = self.plain.len();
        self.plain.push_str(text);
        if !text.is_empty() {
            self.spans.push(Span::new(start, self.plain.len(), style));
        }
    }

    /// Append another text, shifting its spans past the current buffer.
    pub fn append_text(&mut self, other: &Text) {
        let offset = self.plain.len();
        self.plain.push_str(&other.plain);
        self.spans
            .extend(other.spans.iter().map(|span| span.shifted(offset)));
    }

    /// Apply a style over a byte range.
    ///
    /// The range is clamped to the buffer (and to character boundaries);
    /// the span is appended without merging or deduplication.
    pub fn highlight(&mut self, start: usize, end: usize, style: Style) {
        let start = floor_boundary(&self.plain, start);
        let end = floor_boundary(&self.plain, end);
        if start < end {
            self.spans.push(Span::new(start, end, style));
        }
    }

    /// Highlight every literal occurrence of `pattern`.
    ///
    /// Each match appends one span; existing spans are preserved. The
    /// search resumes one character past each match start, so
    /// self-overlapping patterns produce a span per occurrence.
    pub fn highlight_pattern(&mut self, pattern: &str, style: &Style) {
        if pattern.is_empty() {
            return;
        }
        let mut from = 0;
        while let Some(found) = self.plain[from..].find(pattern) {
            let start = from + found;
            let end = start + pattern.len();
            self.spans.push(Span::new(start, end, style.clone()));
            let step = self.plain[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            from = start + step;
        }
    }

    /// Copy a byte range as a new, independently owned text.
    ///
    /// Offsets are clamped; spans overlapping the range are clipped and
    /// re-based to zero.
    pub fn slice(&self, start: usize, end: usize) -> Text {
        let start = floor_boundary(&self.plain, start);
        let end = floor_boundary(&self.plain, end).max(start);

        let spans = self
            .spans
            .iter()
            .filter(|span| span.start < end && span.end > start)
            .map(|span| {
                Span::new(
                    span.start.max(start) - start,
                    span.end.min(end) - start,
                    span.style.clone(),
                )
            })
            .filter(|span| !span.is_empty())
            .collect();

        Text {
            plain: self.plain[start..end].to_string(),
            spans,
            style: self.style.clone(),
        }
    }

    /// Split at newline characters into one text per line.
    ///
    /// The newlines themselves are not part of any line.
    pub fn split_lines(&self) -> Vec<Text> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (index, _) in self.plain.match_indices('\n') {
            lines.push(self.slice(start, index));
            start = index + 1;
        }
        lines.push(self.slice(start, self.plain.len()));
        lines
    }

    /// Split at the given byte offsets into `offsets.len() + 1` parts.
    pub fn divide(&self, offsets: &[usize]) -> Vec<Text> {
        let mut parts = Vec::with_capacity(offsets.len() + 1);
        let mut previous = 0;
        for &offset in offsets {
            let offset = floor_boundary(&self.plain, offset).max(previous);
            parts.push(self.slice(previous, offset));
            previous = offset;
        }
        parts.push(self.slice(previous, self.plain.len()));
        parts
    }

    /// Truncate to a maximum cell width, optionally appending an ellipsis.
    ///
    /// The ellipsis width is reserved before the cut; when it cannot fit at
    /// all the text is hard-cut without it. The ellipsis is an unstyled
    /// plain suffix. Spans past the cut are clipped or dropped.
    pub fn truncate(&mut self, max_cells: usize, ellipsis: Option<&str>) {
        if self.cell_len() <= max_cells {
            return;
        }
        match ellipsis {
            Some(ellipsis) if cell_len(ellipsis) <= max_cells => {
                let cut = clip_byte_index(&self.plain, max_cells - cell_len(ellipsis));
                *self = self.slice(0, cut);
                self.plain.push_str(ellipsis);
            }
            _ => {
                let cut = clip_byte_index(&self.plain, max_cells);
                *self = self.slice(0, cut);
            }
        }
    }

    /// Prepend `count` spaces, shifting every span right.
    pub fn pad_left(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let mut plain = String::with_capacity(self.plain.len() + count);
        plain.extend(std::iter::repeat_n(' ', count));
        plain.push_str(&self.plain);
        self.plain = plain;
        for span in &mut self.spans {
            span.start += count;
            span.end += count;
        }
    }

    /// Append `count` spaces.
    pub fn pad_right(&mut self, count: usize) {
        self.plain.extend(std::iter::repeat_n(' ', count));
    }

    /// Pad on the right so the text occupies `width` cells.
    pub fn align_left(&mut self, width: usize) {
        let current = self.cell_len();
        if current < width {
            self.pad_right(width - current);
        }
    }

    /// Pad on the left so the text occupies `width` cells.
    pub fn align_right(&mut self, width: usize) {
        let current = self.cell_len();
        if current < width {
            self.pad_left(width - current);
        }
    }

    /// Pad on both sides so the text occupies `width` cells.
    pub fn align_center(&mut self, width: usize) {
        let current = self.cell_len();
        if current < width {
            let padding = width - current;
            let left = padding / 2;
            self.pad_left(left);
            self.pad_right(padding - left);
        }
    }

    /// Greedy word wrap to a maximum cell width.
    ///
    /// Lines break at the last space preceding the overflow; a word wider
    /// than the whole line is hard-broken mid-word. Each returned line is
    /// an independently owned text with its spans re-clipped.
    pub fn wrap(&self, max_width: usize) -> Vec<Text> {
        if max_width == 0 {
            return vec![Text::new("")];
        }
        let mut lines = Vec::new();
        for line in self.split_lines() {
            if line.cell_len() <= max_width {
                lines.push(line);
            } else {
                line.wrap_line(max_width, &mut lines);
            }
        }
        lines
    }

    /// Wrap a single newline-free line into `out`.
    fn wrap_line(&self, max_width: usize, out: &mut Vec<Text>) {
        let chars: Vec<(usize, char)> = self.plain.char_indices().collect();
        let mut line_start = 0; // byte offset of the current line
        let mut width = 0;
        let mut last_space: Option<usize> = None; // index into `chars`
        let mut i = 0;

        while i < chars.len() {
            let (byte, ch) = chars[i];
            let w = char_cell_width(ch);
            if ch == ' ' {
                last_space = Some(i);
            }
            if width + w > max_width {
                // Break at the last space when one exists after the line
                // start; scanning resumes right after it, re-measuring any
                // partially consumed word. Otherwise hard-break here.
                let (cut, resume) = match last_space {
                    Some(space) if chars[space].0 > line_start => {
                        let mut after = space;
                        while after < chars.len() && chars[after].1 == ' ' {
                            after += 1;
                        }
                        (chars[space].0, after)
                    }
                    _ => (byte, i),
                };
                if cut <= line_start {
                    // A single character wider than the limit: emit it alone.
                    let next = byte + ch.len_utf8();
                    out.push(self.slice(line_start, next));
                    line_start = next;
                    i += 1;
                } else {
                    out.push(self.slice(line_start, cut));
                    line_start = if resume < chars.len() {
                        chars[resume].0
                    } else {
                        self.plain.len()
                    };
                    i = resume;
                }
                width = 0;
                last_space = None;
                continue;
            }
            width += w;
            i += 1;
        }

        if line_start < self.plain.len() {
            out.push(self.slice(line_start, self.plain.len()));
        }
    }

    /// Stretch to `width` cells by distributing spaces across word gaps.
    ///
    /// The extra space count divides evenly across the gaps; the first
    /// `extra % gaps` gaps receive one more. Span offsets are remapped
    /// through an old-to-new byte position map. Texts with fewer than two
    /// words fall back to [`align_left`](Self::align_left).
    pub fn justify(&self, width: usize) -> Text {
        let words = self.word_ranges();
        let current = self.cell_len();
        if words.len() < 2 || current >= width {
            let mut text = self.clone();
            text.align_left(width);
            return text;
        }

        let extra = width - current;
        let gaps = words.len() - 1;
        let base = extra / gaps;
        let remainder = extra % gaps;

        let mut map = vec![0usize; self.plain.len() + 1];
        let mut plain = String::with_capacity(self.plain.len() + extra);
        let mut gap = 0;

        for (byte, ch) in self.plain.char_indices() {
            if gap < gaps && byte == words[gap + 1].0 {
                let count = base + usize::from(gap < remainder);
                plain.extend(std::iter::repeat_n(' ', count));
                gap += 1;
            }
            map[byte] = plain.len();
            plain.push(ch);
        }
        map[self.plain.len()] = plain.len();

        let spans = self
            .spans
            .iter()
            .map(|span| Span::new(map[span.start], map[span.end], span.style.clone()))
            .collect();

        Text {
            plain,
            spans,
            style: self.style.clone(),
        }
    }

    /// Byte ranges of whitespace-separated words.
    fn word_ranges(&self) -> Vec<(usize, usize)> {
        let mut words = Vec::new();
        let mut start = None;
        for (byte, ch) in self.plain.char_indices() {
            if ch.is_whitespace() {
                if let Some(word_start) = start.take() {
                    words.push((word_start, byte));
                }
            } else if start.is_none() {
                start = Some(byte);
            }
        }
        if let Some(word_start) = start {
            words.push((word_start, self.plain.len()));
        }
        words
    }

    /// Render to segments, one per maximal constant-style run.
    ///
    /// The effective style of a byte is the base style combined with every
    /// covering span in insertion order, so the most recently added span
    /// wins conflicting fields.
    pub fn render(&self) -> Vec<Segment> {
        if self.plain.is_empty() {
            return Vec::new();
        }

        let len = self.plain.len();
        let mut boundaries: Vec<usize> = Vec::with_capacity(self.spans.len() * 2 + 2);
        boundaries.push(0);
        boundaries.push(len);
        for span in &self.spans {
            boundaries.push(span.start.min(len));
            boundaries.push(span.end.min(len));
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut segments = Vec::new();
        for window in boundaries.windows(2) {
            let (start, end) = (window[0], window[1]);
            if start >= end {
                continue;
            }
            let mut style = self.style.clone();
            for span in &self.spans {
                if span.start <= start && end <= span.end {
                    style = style.combine(&span.style);
                }
            }
            let text = &self.plain[start..end];
            if style.is_empty() {
                segments.push(Segment::plain(text));
            } else {
                segments.push(Segment::styled(text, style));
            }
        }

        simplify(segments)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Add for Text {
    type Output = Text;

    fn add(mut self, rhs: Text) -> Text {
        self.append_text(&rhs);
        self
    }
}

impl AddAssign for Text {
    fn add_assign(&mut self, rhs: Text) {
        self.append_text(&rhs);
    }
}
