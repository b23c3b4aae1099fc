// fn2tag: extract field values from a file path
//
// Fields are consumed left to right. Each field takes the shortest run of
// text that is immediately followed by the literal after it; tracknumber only
// takes ASCII digits. A failure at any field rejects the whole path.

use tracing::debug;

use super::{normalize, Pattern, SEPARATOR};
use crate::error::NoMatch;
use crate::field::FieldKind;
use crate::tag_map::FieldValues;

/// Span of a field value at the cursor: (value length, bytes to advance)
type Span = (usize, usize);

fn digit_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

fn first_char_len(text: &str) -> Option<usize> {
    text.chars().next().map(char::len_utf8)
}

/// Locate the value of `kind` at the start of `rest`.
///
/// `literal` is the text that must follow the value, `next` the field after
/// it (if any).
fn field_span(kind: FieldKind, rest: &str, literal: &str, next: Option<FieldKind>) -> Option<Span> {
    if kind.is_numeric() {
        let digits = digit_run(rest);
        if digits == 0 {
            return None;
        }
        if literal.is_empty() {
            return Some((digits, digits));
        }
        return (1..=digits)
            .find(|&end| rest[end..].starts_with(literal))
            .map(|end| (end, end + literal.len()));
    }

    let first = first_char_len(rest)?;
    if !literal.is_empty() {
        return rest[first..]
            .find(literal)
            .map(|i| (first + i, first + i + literal.len()));
    }

    match next {
        None => Some((rest.len(), rest.len())),
        Some(next) if next.is_numeric() => rest[first..]
            .find(|c: char| c.is_ascii_digit())
            .map(|i| (first + i, first + i)),
        Some(_) => Some((first, first)),
    }
}

impl Pattern {
    /// Match a file path against this pattern.
    ///
    /// The path is first trimmed to the pattern's depth (see
    /// [`normalize`](super::normalize)). Text left after the last field is
    /// ignored.
    pub fn match_path(&self, path: &str) -> Result<FieldValues, NoMatch> {
        let normalized = normalize(self, path);
        self.match_normalized(&normalized)
    }

    /// Match text that is already trimmed to the pattern's depth.
    ///
    /// Normalized text never starts or ends with a separator, so neither do
    /// the pattern's outer literals here.
    pub fn match_normalized(&self, text: &str) -> Result<FieldValues, NoMatch> {
        let mut prefix = self.leading_literal().trim_start_matches(SEPARATOR);
        if !self.has_fields() {
            prefix = prefix.trim_end_matches(SEPARATOR);
        }
        let Some(mut rest) = text.strip_prefix(prefix) else {
            debug!(pattern = %self, text, "missing leading literal");
            return Err(NoMatch::MissingPrefix {
                expected: prefix.to_string(),
                found: text.to_string(),
            });
        };

        if !self.has_fields() {
            return if rest.is_empty() {
                Ok(FieldValues::new())
            } else {
                Err(NoMatch::TrailingText(rest.to_string()))
            };
        }

        let mut pairs: Vec<(FieldKind, &str)> = self.field_pairs().collect();
        if let Some((_, last)) = pairs.last_mut() {
            *last = last.trim_end_matches(SEPARATOR);
        }
        let mut values = FieldValues::new();
        for (index, &(kind, literal)) in pairs.iter().enumerate() {
            let next = pairs.get(index + 1).map(|&(next, _)| next);
            let Some((len, advance)) = field_span(kind, rest, literal, next) else {
                let offset = text.len() - rest.len();
                debug!(pattern = %self, text, field = %kind, offset, "field does not match");
                return Err(NoMatch::Field { field: kind, offset });
            };
            values.insert(kind, rest[..len].to_string());
            rest = &rest[advance..];
        }

        Ok(values)
    }
}
