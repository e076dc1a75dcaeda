//! Indentation transformation for the pyx lexer
//!
//! Rewrites the raw token stream into logical lines:
//!
//! 1. Comments are dropped, and lines holding nothing but whitespace or a comment
//!    vanish entirely. They never affect indentation.
//! 2. Inside brackets, line breaks and continuations turn into `Whitespace`, so a
//!    parameter list spread over several lines reads as one line.
//! 3. At the start of each logical line the leading width is compared against a
//!    stack of open levels: deeper pushes a level and emits `Indent`, shallower pops
//!    levels emitting one `Dedent` each.
//! 4. Each logical line ends with a `Newline`, and the stream ends with a `Newline`
//!    (when the last line had content) plus one `Dedent` per level still open.
//!
//! Unbalanced brackets would otherwise swallow the rest of the file, so a
//! declaration keyword at the start of a physical line closes any open brackets
//! and starts a new logical line.
//!
//! Tabs advance the width to the next multiple of 8. A dedent that lands between
//! two open levels pops back to the enclosing level and opens a fresh one at the
//! new width, so a badly indented line still gets a block of its own.

use crate::pyx::lexer::tokens::Token;
use crate::pyx::lexer::TokenSpan;
use std::ops::Range;

const TAB_WIDTH: usize = 8;

/// Transform raw tokens into logical lines with `Indent`/`Dedent` structure
///
/// # Example
///
/// ```text
/// def f():\n    pass\n
/// ```
/// becomes
/// `[Def, Whitespace, Name(f), LParen, RParen, Colon, Newline, Indent, Name(pass), Newline, Dedent]`
pub fn transform_indentation(source: &str, tokens: Vec<TokenSpan>) -> Vec<TokenSpan> {
    let mut state = LineState::new(source);
    for (token, span) in tokens {
        state.push(token, span);
    }
    state.finish(source.len())
}

struct LineState<'a> {
    source: &'a str,
    output: Vec<TokenSpan>,
    levels: Vec<usize>,
    bracket_depth: usize,
    line_has_content: bool,
    at_physical_start: bool,
    line_indent: usize,
}

impl<'a> LineState<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            output: Vec::new(),
            levels: vec![0],
            bracket_depth: 0,
            line_has_content: false,
            at_physical_start: true,
            line_indent: 0,
        }
    }

    fn push(&mut self, token: Token, span: Range<usize>) {
        match token {
            Token::Comment => {}
            Token::Newline => {
                if self.bracket_depth > 0 {
                    self.output.push((Token::Whitespace, span));
                } else if self.line_has_content {
                    self.output.push((Token::Newline, span));
                    self.line_has_content = false;
                }
                self.at_physical_start = true;
                self.line_indent = 0;
            }
            Token::LineContinuation => {
                if self.line_has_content {
                    self.output.push((Token::Whitespace, span));
                }
                self.at_physical_start = false;
            }
            Token::Whitespace => {
                if self.at_physical_start {
                    self.line_indent = indent_width(&self.source[span]);
                } else if self.line_has_content {
                    self.output.push((Token::Whitespace, span));
                }
            }
            token => self.push_content(token, span),
        }
    }

    fn push_content(&mut self, token: Token, span: Range<usize>) {
        if self.bracket_depth > 0 && self.at_physical_start && token.opens_declaration() {
            self.bracket_depth = 0;
            self.output.push((Token::Newline, span.start..span.start));
            self.line_has_content = false;
        }

        if !self.line_has_content && self.bracket_depth == 0 {
            self.open_line(span.start);
        }

        let delta = token.bracket_delta();
        if delta > 0 {
            self.bracket_depth += 1;
        } else if delta < 0 {
            self.bracket_depth = self.bracket_depth.saturating_sub(1);
        }

        self.output.push((token, span));
        self.line_has_content = true;
        self.at_physical_start = false;
    }

    fn open_line(&mut self, position: usize) {
        let width = self.line_indent;
        let current = self.current_level();

        if width > current {
            self.levels.push(width);
            self.output.push((Token::Indent, position..position));
            return;
        }

        while self.current_level() > width && self.levels.len() > 1 {
            self.levels.pop();
            self.output.push((Token::Dedent, position..position));
        }

        // Landed between two levels
        if width > self.current_level() {
            self.levels.push(width);
            self.output.push((Token::Indent, position..position));
        }
    }

    fn current_level(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    fn finish(mut self, end: usize) -> Vec<TokenSpan> {
        if self.line_has_content {
            self.output.push((Token::Newline, end..end));
        }
        while self.levels.len() > 1 {
            self.levels.pop();
            self.output.push((Token::Dedent, end..end));
        }
        self.output
    }
}

/// Width of a run of leading whitespace
fn indent_width(text: &str) -> usize {
    text.chars().fold(0, |width, c| match c {
        '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
        '\x0C' => 0,
        _ => width + 1,
    })
}
