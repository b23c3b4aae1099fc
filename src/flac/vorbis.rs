// VORBIS_COMMENT implementation for FLAC

use std::io::{Cursor, Read, Write};

use crate::error::AudioError;
use crate::tag_map::TagMap;
use crate::utils::io::{read_le_u32, read_sized, write_le_u32};

/// Vendor string written when a file had no comment block
pub const DEFAULT_VENDOR: &str = concat!("pathtag ", env!("CARGO_PKG_VERSION"));

/// Vorbis comment structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_string: String,
    pub comments: Vec<(String, String)>,
}

impl Default for VorbisComment {
    fn default() -> Self {
        VorbisComment {
            vendor_string: DEFAULT_VENDOR.to_string(),
            comments: Vec::new(),
        }
    }
}

impl VorbisComment {
    /// Read Vorbis comment from reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, AudioError> {
        let vendor_string = String::from_utf8_lossy(&read_sized(reader)?).to_string();
        let comment_count = read_le_u32(reader)? as usize;

        let mut comments = Vec::new();
        for index in 0..comment_count {
            let comment_string = String::from_utf8_lossy(&read_sized(reader)?).to_string();

            // Parse comment (format: FIELD=value)
            let (field, value) = comment_string.split_once('=').ok_or_else(|| {
                AudioError::MalformedComment(format!("comment {index} has no '=': {comment_string:?}"))
            })?;
            comments.push((field.to_string(), value.to_string()));
        }

        Ok(VorbisComment {
            vendor_string,
            comments,
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, AudioError> {
        Self::read(&mut Cursor::new(data))
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_le_u32(writer, self.vendor_string.len() as u32)?;
        writer.write_all(self.vendor_string.as_bytes())?;
        write_le_u32(writer, self.comments.len() as u32)?;
        for (field, value) in &self.comments {
            let comment = format!("{field}={value}");
            write_le_u32(writer, comment.len() as u32)?;
            writer.write_all(comment.as_bytes())?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write(&mut buffer);
        buffer
    }

    /// Get a comment value by field name
    pub fn get(&self, field: &str) -> Option<&String> {
        self.comments
            .iter()
            .find(|(f, _)| f.eq_ignore_ascii_case(field))
            .map(|(_, v)| v)
    }

    pub fn to_tag_map(&self) -> TagMap {
        self.comments.iter().map(|(f, v)| (f.as_str(), v.as_str())).collect()
    }

    /// Replace all comments, keeping the vendor string
    pub fn set_tag_map(&mut self, tags: &TagMap) {
        self.comments = tags
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| (key.to_uppercase(), value.clone()))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VorbisComment {
        VorbisComment {
            vendor_string: "reference libFLAC 1.4.3".to_string(),
            comments: vec![
                ("ARTIST".to_string(), "Phish".to_string()),
                ("genre".to_string(), "Rock".to_string()),
                ("GENRE".to_string(), "Jam".to_string()),
            ],
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let comment = sample();
        let parsed = VorbisComment::from_bytes(&comment.to_bytes()).unwrap();
        assert_eq!(parsed, comment);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        assert_eq!(sample().get("artist").map(String::as_str), Some("Phish"));
        assert_eq!(sample().get("Genre").map(String::as_str), Some("Rock"));
        assert_eq!(sample().get("title"), None);
    }

    #[test]
    fn test_tag_map_merges_key_case() {
        let tags = sample().to_tag_map();
        assert_eq!(tags.get("genre").unwrap(), ["Rock", "Jam"]);
        assert_eq!(tags.first("artist"), Some("Phish"));
    }

    #[test]
    fn test_set_tag_map_writes_uppercase_keys() {
        let mut comment = sample();
        let tags: TagMap = [("title", "Tweezer"), ("genre", "Jam")].into_iter().collect();
        comment.set_tag_map(&tags);
        assert_eq!(comment.vendor_string, "reference libFLAC 1.4.3");
        assert_eq!(
            comment.comments,
            vec![
                ("GENRE".to_string(), "Jam".to_string()),
                ("TITLE".to_string(), "Tweezer".to_string()),
            ]
        );
    }

    #[test]
    fn test_comment_without_separator_is_rejected() {
        let mut data = Vec::new();
        write_le_u32(&mut data, 0).unwrap();
        write_le_u32(&mut data, 1).unwrap();
        write_le_u32(&mut data, 5).unwrap();
        data.extend_from_slice(b"TITLE");
        assert!(matches!(
            VorbisComment::from_bytes(&data),
            Err(AudioError::MalformedComment(_))
        ));
    }
}
