// tag2fn: build a filename from tag values

use std::str::FromStr;

use tracing::debug;

use super::{Pattern, Token, SEPARATOR};
use crate::error::{GenerateError, RemapError};
use crate::field::{track_ordinal, FieldKind};
use crate::tag_map::TagMap;

/// Replacement of one string by another over a whole generated filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
    pub from: String,
    pub to: String,
}

impl Remap {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, name: &str) -> String {
        if self.from.is_empty() {
            return name.to_string();
        }
        name.replace(&self.from, &self.to)
    }
}

impl FromStr for Remap {
    type Err = RemapError;

    /// Parse `"FROM TO"`, e.g. `"_ -"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) => Ok(Remap::new(from, to)),
            _ => Err(RemapError(s.to_string())),
        }
    }
}

/// Zero-justify width for a batch of `total` files (at least two digits)
pub fn justify_width(total: usize) -> usize {
    total.to_string().len().max(2)
}

/// Left-pad a track number with zeros, dropping any "/total" suffix
pub fn zero_pad(track: &str, width: usize) -> String {
    format!("{:0>width$}", track_ordinal(track), width = width)
}

/// Options applied while substituting tag values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Pad track numbers with leading zeros to this width
    pub justify: Option<usize>,
    /// Characters removed from substituted values
    pub strip: Vec<char>,
    /// Final replacement over the finished filename
    pub remap: Option<Remap>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-justify track numbers for a batch of `total` files
    pub fn with_justify(mut self, total: usize) -> Self {
        self.justify = Some(justify_width(total));
        self
    }

    pub fn with_strip(mut self, chars: &str) -> Self {
        self.strip = chars.chars().collect();
        self
    }

    pub fn with_remap(mut self, remap: Remap) -> Self {
        self.remap = Some(remap);
        self
    }

    fn substitute(&self, kind: FieldKind, raw: &str) -> String {
        let mut value = raw.to_string();

        if kind.is_numeric() {
            if let Some(width) = self.justify {
                value = zero_pad(&value, width);
            }
        }

        if !self.strip.is_empty() {
            value.retain(|c| !self.strip.contains(&c));
            value = value.trim().to_string();
        }

        let value = value.replace(SEPARATOR, "-");
        // "." and ".." would name the current or parent directory
        if !value.is_empty() && value.chars().all(|c| c == '.') {
            return value.replace('.', "-");
        }
        value
    }
}

fn lookup(tags: &TagMap, kind: FieldKind) -> Option<&str> {
    tags.first(kind.name())
        .or_else(|| kind.aliases().iter().find_map(|alias| tags.first(alias)))
}

impl Pattern {
    /// Build a filename from `tags`.
    ///
    /// Separators produced by tag values are replaced with `-`; separators in
    /// the pattern's own literals are kept, so the result may contain
    /// directories relative to the source file's directory. The result is
    /// always relative: leading and trailing separators are dropped.
    pub fn generate(&self, tags: &TagMap, options: &GenerateOptions) -> Result<String, GenerateError> {
        let mut name = String::new();
        for token in self.tokens() {
            match token {
                Token::Literal(text) => name.push_str(text),
                Token::Field(kind) => {
                    let raw = lookup(tags, *kind).ok_or(GenerateError::MissingField(*kind))?;
                    name.push_str(&options.substitute(*kind, raw));
                }
            }
        }

        if let Some(remap) = &options.remap {
            name = remap.apply(&name);
        }
        let name = name.trim_matches(SEPARATOR).to_string();

        debug!(pattern = %self, name = %name, "generated filename");
        Ok(name)
    }
}
