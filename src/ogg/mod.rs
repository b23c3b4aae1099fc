// Ogg Vorbis / Ogg Opus tag container
//
// Stream layout:
// 1. Identification header, alone on the first (bos) page
// 2. Comment header, carrying a Vorbis comment (may span pages)
// 3. Vorbis only: setup header
// 4. Audio pages, starting on a fresh page
//
// Saving repaginates the header packets after the first page. When that
// changes the page count, every later page of the stream is renumbered.

pub mod page;

pub use page::{OggPage, OGG_SIGNATURE};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AudioError;
use crate::flac::VorbisComment;
use crate::tag_map::TagMap;
use crate::utils::io::rewrite_file;

/// Codec carried by an Ogg stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OggCodec {
    Vorbis,
    Opus,
}

impl OggCodec {
    fn detect(identification: &[u8]) -> Option<Self> {
        if identification.starts_with(b"\x01vorbis") {
            Some(OggCodec::Vorbis)
        } else if identification.starts_with(b"OpusHead") {
            Some(OggCodec::Opus)
        } else {
            None
        }
    }

    fn comment_magic(self) -> &'static [u8] {
        match self {
            OggCodec::Vorbis => &b"\x03vorbis"[..],
            OggCodec::Opus => &b"OpusTags"[..],
        }
    }

    /// Header packets after the identification header
    fn header_packets(self) -> usize {
        match self {
            OggCodec::Vorbis => 2,
            OggCodec::Opus => 1,
        }
    }
}

/// An Ogg file's comment header
#[derive(Debug)]
pub struct OggFile {
    path: PathBuf,
    codec: OggCodec,
    first_page: OggPage,
    comment: VorbisComment,
    /// Header packets after the comment (the Vorbis setup header)
    setup_packets: Vec<Vec<u8>>,
    /// Pages holding the comment and setup packets
    header_pages: u32,
    audio_offset: u64,
}

impl OggFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let first_page = OggPage::read(&mut reader)?
            .ok_or_else(|| AudioError::Ogg("empty stream".into()))?;
        if !first_page.is_bos() {
            return Err(AudioError::Ogg("first page does not begin a stream".into()));
        }
        let codec = OggCodec::detect(&first_page.data)
            .ok_or_else(|| AudioError::Ogg("stream is neither Vorbis nor Opus".into()))?;

        let mut audio_offset = first_page.encoded_len() as u64;
        let mut header_pages = 0;
        let mut packets: Vec<Vec<u8>> = Vec::new();
        let mut partial = Vec::new();
        while packets.len() < codec.header_packets() {
            let page = OggPage::read(&mut reader)?
                .ok_or_else(|| AudioError::Ogg("stream ends inside the header packets".into()))?;
            if page.serial != first_page.serial {
                return Err(AudioError::Ogg("multiplexed streams are not supported".into()));
            }
            audio_offset += page.encoded_len() as u64;
            header_pages += 1;

            let mut pos = 0;
            for &lacing in &page.segment_table {
                let len = lacing as usize;
                partial.extend_from_slice(&page.data[pos..pos + len]);
                pos += len;
                if lacing < 255 {
                    packets.push(std::mem::take(&mut partial));
                }
            }
        }
        if packets.len() > codec.header_packets() || !partial.is_empty() {
            return Err(AudioError::Ogg("audio data shares a page with the header packets".into()));
        }

        let mut packets = packets.into_iter();
        let comment_packet = packets.next().unwrap_or_default();
        let body = comment_packet
            .strip_prefix(codec.comment_magic())
            .ok_or_else(|| AudioError::Ogg("missing comment header".into()))?;
        let comment = VorbisComment::from_bytes(body)?;

        debug!(path = %path.display(), ?codec, header_pages, audio_offset, "read Ogg headers");
        Ok(OggFile {
            path: path.to_path_buf(),
            codec,
            first_page,
            comment,
            setup_packets: packets.collect(),
            header_pages,
            audio_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> OggCodec {
        self.codec
    }

    pub fn comment(&self) -> &VorbisComment {
        &self.comment
    }

    pub fn tags(&self) -> TagMap {
        self.comment.to_tag_map()
    }

    pub fn set_tags(&mut self, tags: &TagMap) {
        self.comment.set_tag_map(tags);
    }

    fn comment_packet(&self) -> Vec<u8> {
        let mut packet = self.codec.comment_magic().to_vec();
        packet.extend(self.comment.to_bytes());
        if self.codec == OggCodec::Vorbis {
            // framing bit
            packet.push(1);
        }
        packet
    }

    /// Rewrite the file in place with the current tags
    pub fn save(&mut self) -> Result<(), AudioError> {
        let mut packets = vec![self.comment_packet()];
        packets.extend(self.setup_packets.iter().cloned());
        let pages = page::paginate(&packets, self.first_page.serial, self.first_page.sequence + 1);
        let shift = pages.len() as i64 - i64::from(self.header_pages);
        let serial = self.first_page.serial;

        rewrite_file(&self.path, self.audio_offset, |writer, audio| {
            self.first_page.write(writer)?;
            for page in &pages {
                page.write(writer)?;
            }
            while let Some(mut page) = OggPage::read(audio)? {
                if page.serial == serial {
                    page.sequence = (i64::from(page.sequence) + shift) as u32;
                }
                page.write(writer)?;
            }
            Ok::<(), AudioError>(())
        })?;

        self.audio_offset = (self.first_page.encoded_len()
            + pages.iter().map(OggPage::encoded_len).sum::<usize>()) as u64;
        self.header_pages = pages.len() as u32;
        debug!(path = %self.path.display(), pages = pages.len(), shift, "saved Ogg comment header");
        Ok(())
    }
}
