// Error types shared by the pattern engine and the tag container

use crate::field::FieldKind;

/// Why a path did not conform to a pattern
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoMatch {
    #[error("expected {expected:?} at the start of {found:?}")]
    MissingPrefix { expected: String, found: String },
    #[error("no value for field `{field}` at offset {offset}")]
    Field { field: FieldKind, offset: usize },
    #[error("unexpected text {0:?} after literal pattern")]
    TrailingText(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("no value for field `{0}`")]
    MissingField(FieldKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagEditError {
    #[error("expected tag=value, got {0:?}")]
    MissingValue(String),
    #[error("empty tag name in {0:?}")]
    EmptyKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected two strings separated by whitespace (e.g. \"_ -\"), got {0:?}")]
pub struct RemapError(pub String);

/// Failure reading or writing the tags of an audio file
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a FLAC file")]
    NotFlac,
    #[error("unrecognized audio format (expected FLAC, Ogg Vorbis, Ogg Opus or MP3)")]
    UnknownFormat,
    #[error("invalid Ogg stream: {0}")]
    Ogg(String),
    #[error("unsupported ID3v2 tag: {0}")]
    Id3(String),
    #[error("malformed vorbis comment: {0}")]
    MalformedComment(String),
    #[error("metadata block of {0} bytes exceeds the 24-bit length field")]
    BlockTooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        NoMatch::MissingPrefix { expected: "Live/".into(), found: "Artist".into() },
        "expected \"Live/\" at the start of \"Artist\""
    )]
    #[case(
        NoMatch::Field { field: FieldKind::Tracknumber, offset: 13 },
        "no value for field `tracknumber` at offset 13"
    )]
    #[case(
        NoMatch::TrailingText(".bak".into()),
        "unexpected text \".bak\" after literal pattern"
    )]
    fn no_match_display(#[case] error: NoMatch, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn generate_error_display() {
        let error = GenerateError::MissingField(FieldKind::Title);
        assert_eq!(error.to_string(), "no value for field `title`");
    }

    #[test]
    fn audio_error_from_io_has_source() {
        let error: AudioError = std::io::Error::other("disk gone").into();
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn errors_convert_into_anyhow() {
        let error: anyhow::Error = GenerateError::MissingField(FieldKind::Album).into();
        assert_eq!(error.to_string(), "no value for field `album`");
    }
}
