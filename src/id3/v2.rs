// ID3v2.3 / ID3v2.4 tag
//
// Header (10 bytes): "ID3", major version, revision, flags, synchsafe size
// of everything after the header (excluding a v2.4 footer).

use std::io::{self, Read, Write};

use crate::error::AudioError;

pub const ID3_SIGNATURE: &[u8; 3] = b"ID3";

const HEADER_LEN: usize = 10;
const FLAG_UNSYNCHRONISATION: u8 = 0x80;
const FLAG_EXTENDED_HEADER: u8 = 0x40;
const FLAG_FOOTER: u8 = 0x10;
const MAX_SYNCHSAFE: usize = 1 << 28;

/// Parse synchsafe integer (7 bits per byte)
pub fn decode_synchsafe(bytes: &[u8]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}

pub fn encode_synchsafe(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

fn synchsafe_len(len: usize, what: &str) -> Result<u32, AudioError> {
    if len >= MAX_SYNCHSAFE {
        return Err(AudioError::Id3(format!("{what} of {len} bytes is too large")));
    }
    Ok(len as u32)
}

/// ID3v2 frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame {
    pub id: String,
    pub flags: u16,
    pub data: Vec<u8>,
}

impl Id3Frame {
    pub fn new(id: &str, data: Vec<u8>) -> Self {
        Id3Frame {
            id: id.to_string(),
            flags: 0,
            data,
        }
    }

    /// Whether the body is stored as-is (no compression, encryption or
    /// per-frame unsynchronisation)
    pub fn is_plain(&self, major: u8) -> bool {
        let format_flags = if major >= 4 { 0x000F } else { 0x00C0 };
        self.flags & format_flags == 0
    }
}

/// ID3v2 tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2Tag {
    pub major: u8,
    pub frames: Vec<Id3Frame>,
}

impl Default for Id3v2Tag {
    fn default() -> Self {
        Id3v2Tag {
            major: 4,
            frames: Vec::new(),
        }
    }
}

impl Id3v2Tag {
    /// Read a tag at the start of `reader`.
    ///
    /// Returns the tag and the number of bytes it occupies, or `None` when
    /// the stream does not start with a tag.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<(Self, u64)>, AudioError> {
        let mut header = [0u8; HEADER_LEN];
        match reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        if &header[0..3] != ID3_SIGNATURE {
            return Ok(None);
        }

        let major = header[3];
        if major != 3 && major != 4 {
            return Err(AudioError::Id3(format!("version 2.{major}")));
        }
        let flags = header[5];
        if flags & FLAG_UNSYNCHRONISATION != 0 {
            return Err(AudioError::Id3("unsynchronised tag".into()));
        }

        let size = decode_synchsafe(&header[6..10]) as usize;
        let mut body = vec![0u8; size];
        reader.read_exact(&mut body)?;

        let mut start = 0;
        if flags & FLAG_EXTENDED_HEADER != 0 && body.len() >= 4 {
            start = if major >= 4 {
                decode_synchsafe(&body[0..4]) as usize
            } else {
                u32::from_be_bytes([body[0], body[1], body[2], body[3]]) as usize + 4
            };
            if start > body.len() {
                return Err(AudioError::Id3("extended header overruns the tag".into()));
            }
        }

        let frames = Self::parse_frames(&body[start..], major)?;
        let footer = if major >= 4 && flags & FLAG_FOOTER != 0 { HEADER_LEN } else { 0 };
        let total = (HEADER_LEN + size + footer) as u64;
        Ok(Some((Id3v2Tag { major, frames }, total)))
    }

    fn parse_frames(body: &[u8], major: u8) -> Result<Vec<Id3Frame>, AudioError> {
        let mut frames = Vec::new();
        let mut pos = 0;
        while pos + HEADER_LEN <= body.len() {
            let header = &body[pos..pos + HEADER_LEN];
            // padding
            if header[0] == 0 {
                break;
            }
            let id = &header[0..4];
            if !id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(AudioError::Id3(format!("invalid frame id at offset {pos}")));
            }
            let id = String::from_utf8_lossy(id).into_owned();

            let size = if major >= 4 {
                decode_synchsafe(&header[4..8])
            } else {
                u32::from_be_bytes([header[4], header[5], header[6], header[7]])
            } as usize;
            let flags = u16::from_be_bytes([header[8], header[9]]);

            let start = pos + HEADER_LEN;
            let end = start + size;
            if end > body.len() {
                return Err(AudioError::Id3(format!("frame {id} overruns the tag")));
            }
            frames.push(Id3Frame {
                id,
                flags,
                data: body[start..end].to_vec(),
            });
            pos = end;
        }
        Ok(frames)
    }

    /// Serialize without padding, extended header or footer
    pub fn to_bytes(&self) -> Result<Vec<u8>, AudioError> {
        let mut body = Vec::new();
        for frame in &self.frames {
            let size = synchsafe_len(frame.data.len(), &format!("frame {}", frame.id))?;
            body.extend_from_slice(frame.id.as_bytes());
            if self.major >= 4 {
                body.extend_from_slice(&encode_synchsafe(size));
            } else {
                body.extend_from_slice(&size.to_be_bytes());
            }
            body.extend_from_slice(&frame.flags.to_be_bytes());
            body.extend_from_slice(&frame.data);
        }

        let size = synchsafe_len(body.len(), "tag")?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.extend_from_slice(ID3_SIGNATURE);
        bytes.extend_from_slice(&[self.major, 0, 0]);
        bytes.extend_from_slice(&encode_synchsafe(size));
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), AudioError> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }
}
