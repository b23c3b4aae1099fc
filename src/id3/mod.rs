// MP3 tag container (ID3v2)
//
// Named fields live in their standard text frames; any other tag is stored
// in a TXXX frame under its upper-cased name. Frames that carry no text
// (pictures, comments, ...) are kept untouched.

pub mod frames;
pub mod v2;

pub use v2::{Id3Frame, Id3v2Tag, ID3_SIGNATURE};

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AudioError;
use crate::tag_map::TagMap;
use crate::utils::io::rewrite_file;
use frames::{decode_text, encode_text, frame_id, tag_name, TextEncoding, USER_TEXT};

/// Whether `bytes` start with an MPEG audio frame sync
pub fn is_mpeg_sync(bytes: &[u8]) -> bool {
    matches!(bytes, [0xFF, second, ..] if second & 0xE0 == 0xE0)
}

#[derive(Debug)]
pub struct Id3File {
    path: PathBuf,
    tag: Id3v2Tag,
    audio_offset: u64,
}

impl Id3File {
    /// Open an MP3 file; a file without an ID3v2 tag gets an empty v2.4 tag
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let (tag, audio_offset) = match Id3v2Tag::read(&mut reader)? {
            Some(found) => found,
            None => {
                let mut start = [0u8; 2];
                let mut reader = File::open(path)?;
                let read = reader.read(&mut start)?;
                if !is_mpeg_sync(&start[..read]) {
                    return Err(AudioError::UnknownFormat);
                }
                (Id3v2Tag::default(), 0)
            }
        };

        debug!(path = %path.display(), major = tag.major, frames = tag.frames.len(), "read ID3v2 tag");
        Ok(Id3File {
            path: path.to_path_buf(),
            tag,
            audio_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tag(&self) -> &Id3v2Tag {
        &self.tag
    }

    /// Text frame holding a tag, with its description for TXXX
    fn text_of(&self, frame: &Id3Frame) -> Option<(String, Vec<String>)> {
        if !frame.is_plain(self.tag.major) {
            return None;
        }
        if frame.id == USER_TEXT {
            let mut strings = decode_text(&frame.data).into_iter();
            let description = strings.next().filter(|d| !d.is_empty())?;
            return Some((description, strings.collect()));
        }
        let name = tag_name(&frame.id)?;
        Some((name.to_string(), decode_text(&frame.data)))
    }

    pub fn tags(&self) -> TagMap {
        let mut tags = TagMap::new();
        for frame in &self.tag.frames {
            if let Some((key, values)) = self.text_of(frame) {
                for value in values.into_iter().filter(|v| !v.is_empty()) {
                    tags.append(&key, value);
                }
            }
        }
        tags
    }

    /// Replace every text frame with `tags`
    pub fn set_tags(&mut self, tags: &TagMap) {
        let mut kept = Vec::new();
        for frame in std::mem::take(&mut self.tag.frames) {
            if self.text_of(&frame).is_none() {
                kept.push(frame);
            }
        }

        let major = self.tag.major;
        let encoding = TextEncoding::for_version(major);
        for (key, values) in tags.iter() {
            let frame = match frame_id(key, major) {
                Some(id) => Id3Frame::new(id, encode_text(values, encoding)),
                None => {
                    let mut strings = vec![key.to_uppercase()];
                    strings.extend(values.iter().cloned());
                    Id3Frame::new(USER_TEXT, encode_text(&strings, encoding))
                }
            };
            kept.push(frame);
        }
        self.tag.frames = kept;
    }

    /// Rewrite the file in place with the current tags
    pub fn save(&mut self) -> Result<(), AudioError> {
        let bytes = self.tag.to_bytes()?;
        rewrite_file(&self.path, self.audio_offset, |writer, audio| {
            writer.write_all(&bytes)?;
            io::copy(audio, writer)?;
            Ok::<(), AudioError>(())
        })?;
        self.audio_offset = bytes.len() as u64;
        debug!(path = %self.path.display(), "saved ID3v2 tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FRAMES: &[u8] = b"\xff\xfb\x90\x64mpeg-audio";

    fn write_mp3(path: &Path, tag: Option<&Id3v2Tag>) {
        let mut data = match tag {
            Some(tag) => tag.to_bytes().unwrap(),
            None => Vec::new(),
        };
        data.extend_from_slice(FRAMES);
        fs::write(path, data).unwrap();
    }

    fn v23_tag() -> Id3v2Tag {
        Id3v2Tag {
            major: 3,
            frames: vec![
                Id3Frame::new("TIT2", encode_text(&["Ghost"], TextEncoding::Iso8859_1)),
                Id3Frame::new("TRCK", encode_text(&["3/12"], TextEncoding::Utf16)),
                Id3Frame::new("TYER", encode_text(&["1997"], TextEncoding::Iso8859_1)),
                Id3Frame::new(USER_TEXT, encode_text(&["VENUE", "Hampton"], TextEncoding::Utf16)),
                Id3Frame::new("APIC", vec![0, 1, 2, 3]),
            ],
        }
    }

    #[test]
    fn test_is_mpeg_sync() {
        assert!(is_mpeg_sync(b"\xff\xfb"));
        assert!(is_mpeg_sync(b"\xff\xe3\x00"));
        assert!(!is_mpeg_sync(b"\xff\x00"));
        assert!(!is_mpeg_sync(b"\xff"));
        assert!(!is_mpeg_sync(b"RIFF"));
    }

    #[test]
    fn test_tags_from_text_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_mp3(&path, Some(&v23_tag()));

        let tags = Id3File::open(&path).unwrap().tags();
        assert_eq!(tags.first("title"), Some("Ghost"));
        assert_eq!(tags.first("tracknumber"), Some("3/12"));
        assert_eq!(tags.first("date"), Some("1997"));
        assert_eq!(tags.first("venue"), Some("Hampton"));
        assert_eq!(tags.len(), 4);
    }

    #[test]
    fn test_save_keeps_other_frames_and_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_mp3(&path, Some(&v23_tag()));

        let mut mp3 = Id3File::open(&path).unwrap();
        let mut tags = mp3.tags();
        tags.set("artist", ["Phish"]);
        tags.remove("venue");
        tags.set("date", ["1997-12-31"]);
        mp3.set_tags(&tags);
        mp3.save().unwrap();

        assert!(fs::read(&path).unwrap().ends_with(FRAMES));
        let reopened = Id3File::open(&path).unwrap();
        assert_eq!(reopened.tag().major, 3);
        assert_eq!(reopened.tags(), tags);
        let ids: Vec<&str> = reopened.tag().frames.iter().map(|f| f.id.as_str()).collect();
        assert!(ids.contains(&"APIC"));
        assert!(ids.contains(&"TYER"));
        assert!(!ids.contains(&USER_TEXT));

        // a second save starts from the new audio offset
        mp3.set_tags(&[("title", "Ghost")].into_iter().collect());
        mp3.save().unwrap();
        assert!(fs::read(&path).unwrap().ends_with(FRAMES));
        assert_eq!(Id3File::open(&path).unwrap().tags().first("title"), Some("Ghost"));
    }

    #[test]
    fn test_untagged_mp3_gets_v24_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_mp3(&path, None);

        let mut mp3 = Id3File::open(&path).unwrap();
        assert!(mp3.tags().is_empty());
        mp3.set_tags(&[("title", "Fée"), ("comment", "sbd")].into_iter().collect());
        mp3.save().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"ID3\x04"));
        assert!(bytes.ends_with(FRAMES));
        let tags = Id3File::open(&path).unwrap().tags();
        assert_eq!(tags.first("title"), Some("Fée"));
        assert_eq!(tags.first("comment"), Some("sbd"));
    }

    #[test]
    fn test_non_mpeg_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        fs::write(&path, b"RIFF....WAVE").unwrap();
        assert!(matches!(Id3File::open(&path), Err(AudioError::UnknownFormat)));
    }
}
