//! `%`-token pattern language.
//!
//! A pattern such as `%a/%l/%n - %t.flac` mixes literal text with field
//! tokens (`%` followed by a key from [`FieldKind::key`]). The same compiled
//! [`Pattern`] drives both directions:
//!
//! - [`Pattern::match_path`] extracts field values from a file path (fn2tag)
//! - [`Pattern::generate`] builds a filename from tag values (tag2fn)
//!
//! A compiled pattern is immutable and can be shared across every file of a
//! batch.

mod generator;
mod matcher;
mod path;

pub use generator::{justify_width, zero_pad, GenerateOptions, Remap};
pub use path::{normalize, SEPARATOR};

use std::fmt;

use crate::field::FieldKind;

/// Pattern token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text, possibly empty
    Literal(String),
    /// A field placeholder
    Field(FieldKind),
}

/// A `%` that is not followed by a field key. The text is kept literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWarning {
    /// Byte offset of the `%`
    pub position: usize,
    /// Character after the `%`, `None` at end of input
    pub found: Option<char>,
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(c) => write!(
                f,
                "unrecognized field key '%{c}' at position {}, kept as literal text",
                self.position
            ),
            None => write!(
                f,
                "trailing '%' at position {}, kept as literal text",
                self.position
            ),
        }
    }
}

/// Compiled pattern
///
/// Tokens always alternate `Literal, Field, Literal, ...` and both ends are
/// literals (empty when the pattern starts or ends with a field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    warnings: Vec<PatternWarning>,
}

impl Pattern {
    /// Compile a pattern string. Never fails; malformed `%` sequences are
    /// reported through [`Pattern::warnings`].
    pub fn compile(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut warnings = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            match chars.peek().map(|&(_, next)| next) {
                Some(next) => match FieldKind::from_key(next) {
                    Some(kind) => {
                        chars.next();
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                        tokens.push(Token::Field(kind));
                    }
                    // The following character is scanned again, so `%%a`
                    // yields a literal `%` and an artist field.
                    None => {
                        warnings.push(PatternWarning { position: pos, found: Some(next) });
                        literal.push('%');
                    }
                },
                None => {
                    warnings.push(PatternWarning { position: pos, found: None });
                    literal.push('%');
                }
            }
        }
        tokens.push(Token::Literal(literal));

        Pattern {
            source: source.to_string(),
            tokens,
            warnings,
        }
    }

    /// The pattern string this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn warnings(&self) -> &[PatternWarning] {
        &self.warnings
    }

    /// Fields in pattern order
    pub fn fields(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            Token::Field(kind) => Some(*kind),
            Token::Literal(_) => None,
        })
    }

    pub fn has_fields(&self) -> bool {
        self.tokens.len() > 1
    }

    /// Literal text before the first field
    pub fn leading_literal(&self) -> &str {
        match self.tokens.first() {
            Some(Token::Literal(text)) => text,
            _ => "",
        }
    }

    /// Each field paired with the literal that follows it
    pub fn field_pairs(&self) -> impl Iterator<Item = (FieldKind, &str)> + '_ {
        self.tokens[1..].chunks_exact(2).filter_map(|pair| match pair {
            [Token::Field(kind), Token::Literal(text)] => Some((*kind, text.as_str())),
            _ => None,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Shorthand for [`Pattern::compile`]
pub fn compile(source: &str) -> Pattern {
    Pattern::compile(source)
}
