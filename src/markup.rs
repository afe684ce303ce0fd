//! Markup parser for bracket-tag styled text.
//!
//! The markup format uses square brackets for inline styling:
//!
//! - `[bold]text[/]` - apply bold
//! - `[red on white]text[/]` - foreground and background colors
//! - `[/]` - close the most recent tag, `[/bold]` also closes one level
//! - `[link=https://example.com]text[/]` - hyperlink
//! - `\[` / `\]` - literal brackets
//!
//! Tags nest: each open tag combines its style onto the enclosing one, so
//! `[bold]a[not bold]b[/]c[/]` renders `b` without bold and `c` bold again.
//! A tag whose body does not parse as a style is rendered literally rather
//! than failing the document.

use smallvec::{SmallVec, smallvec};

use crate::error::MarkupError;
use crate::style::Style;
use crate::text::Text;

/// A token produced by the tokenizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text content.
    Text(&'a str),
    /// Opening tag content (without brackets): `bold red`.
    Open(&'a str),
    /// Closing tag: `None` for `[/]`, `Some("bold")` for `[/bold]`.
    Close(Option<&'a str>),
    /// An escaped bracket character.
    Escaped(char),
}

/// Single-pass tokenizer for markup text.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte position of the next unread character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume text up to the next `[` or escape.
    fn consume_text(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '[' {
                break;
            }
            if c == '\\' {
                let mut rest = self.input[self.pos..].chars();
                rest.next();
                if matches!(rest.next(), Some('[' | ']')) {
                    break;
                }
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// Consume a `[...]` tag. The leading `[` has not been consumed yet.
    fn consume_tag(&mut self) -> Result<Token<'a>, MarkupError> {
        let tag_start = self.pos;
        self.advance(); // consume '['

        let content_start = self.pos;
        loop {
            match self.peek() {
                Some(']') => break,
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(MarkupError::UnclosedTag(tag_start)),
            }
        }
        let content = &self.input[content_start..self.pos];
        self.advance(); // consume ']'

        if let Some(rest) = content.strip_prefix('/') {
            let rest = rest.trim();
            if rest.is_empty() {
                Ok(Token::Close(None))
            } else {
                Ok(Token::Close(Some(rest)))
            }
        } else if content.trim().is_empty() {
            Err(MarkupError::EmptyTag(tag_start))
        } else {
            Ok(Token::Open(content))
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        match self.peek() {
            Some('[') => Some(self.consume_tag()),
            Some('\\') => {
                let mut rest = self.input[self.pos..].chars();
                rest.next();
                match rest.next() {
                    Some(bracket @ ('[' | ']')) => {
                        self.advance();
                        self.advance();
                        Some(Ok(Token::Escaped(bracket)))
                    }
                    // A backslash not escaping a bracket is literal text.
                    _ => {
                        self.advance();
                        Some(Ok(Token::Text(&self.input[self.pos - 1..self.pos])))
                    }
                }
            }
            _ => Some(Ok(Token::Text(self.consume_text()))),
        }
    }
}

/// Parse markup into a [`Text`].
///
/// # Examples
///
/// ```
/// use richtext::markup;
///
/// let text = markup::parse("[bold]Hello[/] World").unwrap();
/// assert_eq!(text.plain(), "Hello World");
/// assert_eq!(text.spans().len(), 1);
/// ```
pub fn parse(markup: &str) -> Result<Text, MarkupError> {
    parse_with_style(markup, Style::default())
}

/// Parse markup with a base style seeding the tag stack.
///
/// Every open tag pushes its style combined onto the enclosing one; text
/// becomes a span over the current combined style when it is non-empty.
/// A close tag pops one level; closing past the seed is a tolerated no-op.
pub fn parse_with_style(markup: &str, base: Style) -> Result<Text, MarkupError> {
    let mut stack: SmallVec<[Style; 4]> = smallvec![base];
    let mut text = Text::new("");

    for token in Tokenizer::new(markup) {
        match token? {
            Token::Text(content) => {
                push_text(&mut text, content, &stack);
            }
            Token::Escaped(bracket) => {
                let mut buffer = [0u8; 4];
                push_text(&mut text, bracket.encode_utf8(&mut buffer), &stack);
            }
            Token::Open(content) => match Style::parse(content) {
                Ok(style) => {
                    let combined = top(&stack).combine(&style);
                    stack.push(combined);
                }
                Err(error) => {
                    log::debug!("markup tag [{content}] is not a style ({error}); rendering literally");
                    let literal = format!("[{content}]");
                    push_text(&mut text, &literal, &stack);
                }
            },
            Token::Close(_) => {
                // Popping past the seed is a no-op.
                if stack.len() > 1 {
                    stack.pop();
                }
            }
        }
    }

    Ok(text)
}

fn top<'a>(stack: &'a SmallVec<[Style; 4]>) -> &'a Style {
    stack.last().expect("style stack is seeded and never emptied")
}

fn push_text(text: &mut Text, content: &str, stack: &SmallVec<[Style; 4]>) {
    let style = top(stack);
    if style.is_empty() {
        text.append(content);
    } else {
        text.append_styled(content, style.clone());
    }
}

/// Remove markup, returning the plain text.
///
/// Escapes are unescaped. An unterminated tag is kept as literal text
/// rather than reported as an error.
pub fn strip(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut tokenizer = Tokenizer::new(markup);
    loop {
        let before = tokenizer.pos();
        match tokenizer.next() {
            Some(Ok(Token::Text(content))) => out.push_str(content),
            Some(Ok(Token::Escaped(bracket))) => out.push(bracket),
            Some(Ok(Token::Open(_) | Token::Close(_))) => {}
            Some(Err(_)) => {
                out.push_str(&markup[before..]);
                break;
            }
            None => break,
        }
    }
    out
}

/// Escape brackets so text round-trips through the parser unchanged.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '[' || c == ']' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
