// Pattern field table
//
// Every field a pattern can name is bound to a single key character
// (`%a`, `%l`, ...) and to the lower-case tag name used in a TagMap.
// FLAC/OGG store the same names upper-case as Vorbis comment keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata fields addressable from a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Artist,
    Album,
    Tracknumber,
    Title,
    Date,
    Genre,
    Composer,
    Junk,
    Discnumber,
}

impl FieldKind {
    pub const ALL: [FieldKind; 9] = [
        FieldKind::Artist,
        FieldKind::Album,
        FieldKind::Tracknumber,
        FieldKind::Title,
        FieldKind::Date,
        FieldKind::Genre,
        FieldKind::Composer,
        FieldKind::Junk,
        FieldKind::Discnumber,
    ];

    /// Key character following `%` in a pattern
    pub fn key(self) -> char {
        match self {
            FieldKind::Artist => 'a',
            FieldKind::Album => 'l',
            FieldKind::Tracknumber => 'n',
            FieldKind::Title => 't',
            FieldKind::Date => 'd',
            FieldKind::Genre => 'g',
            FieldKind::Composer => 'c',
            FieldKind::Junk => 'j',
            FieldKind::Discnumber => 'i',
        }
    }

    /// Look up a field by its pattern key character
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'a' => Some(FieldKind::Artist),
            'l' => Some(FieldKind::Album),
            'n' => Some(FieldKind::Tracknumber),
            't' => Some(FieldKind::Title),
            'd' => Some(FieldKind::Date),
            'g' => Some(FieldKind::Genre),
            'c' => Some(FieldKind::Composer),
            'j' => Some(FieldKind::Junk),
            'i' => Some(FieldKind::Discnumber),
            _ => None,
        }
    }

    /// Tag name (lowercase)
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Artist => "artist",
            FieldKind::Album => "album",
            FieldKind::Tracknumber => "tracknumber",
            FieldKind::Title => "title",
            FieldKind::Date => "date",
            FieldKind::Genre => "genre",
            FieldKind::Composer => "composer",
            FieldKind::Junk => "junk",
            FieldKind::Discnumber => "discnumber",
        }
    }

    /// Parse from a tag name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Vorbis comment key for this field (FLAC/OGG)
    pub fn vorbis_key(self) -> &'static str {
        match self {
            FieldKind::Artist => "ARTIST",
            FieldKind::Album => "ALBUM",
            FieldKind::Tracknumber => "TRACKNUMBER",
            FieldKind::Title => "TITLE",
            FieldKind::Date => "DATE",
            FieldKind::Genre => "GENRE",
            FieldKind::Composer => "COMPOSER",
            FieldKind::Junk => "JUNK",
            FieldKind::Discnumber => "DISCNUMBER",
        }
    }

    /// Matched by a digit-only rule and eligible for zero-justification
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Tracknumber)
    }

    /// Alternative tag names consulted when generating a filename
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FieldKind::Tracknumber => &["track"],
            _ => &[],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown field name: {s}"))
    }
}

/// Strip a "of total" suffix from a track number ("3/12" -> "3")
pub fn track_ordinal(track: &str) -> &str {
    track.split('/').next().unwrap_or(track).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_key_round_trip() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(FieldKind::from_key('x'), None);
        assert_eq!(FieldKind::from_key('%'), None);
    }

    #[rstest]
    #[case("title", Some(FieldKind::Title))]
    #[case("TITLE", Some(FieldKind::Title))]
    #[case("TrackNumber", Some(FieldKind::Tracknumber))]
    #[case("discnumber", Some(FieldKind::Discnumber))]
    #[case("track", None)]
    #[case("unknown", None)]
    fn test_field_name_parsing(#[case] input: &str, #[case] expected: Option<FieldKind>) {
        assert_eq!(FieldKind::from_name(input), expected);
    }

    #[test]
    fn test_vorbis_key_matches_name() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.vorbis_key().to_lowercase(), kind.name());
        }
    }

    #[test]
    fn test_only_tracknumber_is_numeric() {
        let numeric: Vec<_> = FieldKind::ALL.into_iter().filter(|k| k.is_numeric()).collect();
        assert_eq!(numeric, vec![FieldKind::Tracknumber]);
    }

    #[test]
    fn test_serde_uses_tag_names() {
        let json = serde_json::to_string(&FieldKind::Tracknumber).unwrap();
        assert_eq!(json, "\"tracknumber\"");
        let kind: FieldKind = serde_json::from_str("\"composer\"").unwrap();
        assert_eq!(kind, FieldKind::Composer);
    }

    #[rstest]
    #[case("1/10", "1")]
    #[case("5", "5")]
    #[case(" 07 / 12", "07")]
    fn test_track_ordinal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(track_ordinal(input), expected);
    }
}
