// FLAC metadata block implementation

use std::io::{Read, Write};

use crate::error::AudioError;
use crate::utils::io::{read_be_u24, write_be_u24};

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// Largest body a block header can describe
pub const MAX_BLOCK_LENGTH: usize = (1 << 24) - 1;

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    Reserved(u8),
}

impl FlacMetadataBlockType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FlacMetadataBlockType::StreamInfo,
            1 => FlacMetadataBlockType::Padding,
            2 => FlacMetadataBlockType::Application,
            3 => FlacMetadataBlockType::SeekTable,
            4 => FlacMetadataBlockType::VorbisComment,
            5 => FlacMetadataBlockType::CueSheet,
            6 => FlacMetadataBlockType::Picture,
            other => FlacMetadataBlockType::Reserved(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            FlacMetadataBlockType::StreamInfo => 0,
            FlacMetadataBlockType::Padding => 1,
            FlacMetadataBlockType::Application => 2,
            FlacMetadataBlockType::SeekTable => 3,
            FlacMetadataBlockType::VorbisComment => 4,
            FlacMetadataBlockType::CueSheet => 5,
            FlacMetadataBlockType::Picture => 6,
            FlacMetadataBlockType::Reserved(other) => other & 0x7F,
        }
    }
}

/// FLAC metadata block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    /// Read FLAC metadata block header from reader
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut first = [0u8; 1];
        reader.read_exact(&mut first)?;

        Ok(FlacMetadataBlockHeader {
            is_last: (first[0] & 0x80) != 0,
            block_type: FlacMetadataBlockType::from_byte(first[0] & 0x7F),
            length: read_be_u24(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let flag = if self.is_last { 0x80 } else { 0x00 };
        writer.write_all(&[flag | self.block_type.to_byte()])?;
        write_be_u24(writer, self.length)
    }
}

/// FLAC metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacMetadataBlock {
    pub header: FlacMetadataBlockHeader,
    pub data: Vec<u8>,
}

impl FlacMetadataBlock {
    /// Build a block; the last-block flag is fixed up when written
    pub fn new(block_type: FlacMetadataBlockType, data: Vec<u8>) -> Result<Self, AudioError> {
        if data.len() > MAX_BLOCK_LENGTH {
            return Err(AudioError::BlockTooLarge(data.len()));
        }
        Ok(FlacMetadataBlock {
            header: FlacMetadataBlockHeader {
                is_last: false,
                block_type,
                length: data.len() as u32,
            },
            data,
        })
    }

    /// Read FLAC metadata block from reader
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let header = FlacMetadataBlockHeader::read(reader)?;
        let mut data = vec![0u8; header.length as usize];
        reader.read_exact(&mut data)?;

        Ok(FlacMetadataBlock { header, data })
    }

    pub fn write<W: Write>(&self, writer: &mut W, is_last: bool) -> std::io::Result<()> {
        let header = FlacMetadataBlockHeader {
            is_last,
            ..self.header.clone()
        };
        header.write(writer)?;
        writer.write_all(&self.data)
    }

    /// Size on disk, header included
    pub fn encoded_len(&self) -> u64 {
        4 + self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_block_type_bytes() {
        for byte in 0..=127u8 {
            assert_eq!(FlacMetadataBlockType::from_byte(byte).to_byte(), byte);
        }
        assert_eq!(FlacMetadataBlockType::from_byte(4), FlacMetadataBlockType::VorbisComment);
    }

    #[test]
    fn test_block_round_trip_sets_last_flag() {
        let block = FlacMetadataBlock::new(FlacMetadataBlockType::Padding, vec![0; 5]).unwrap();
        let mut buffer = Vec::new();
        block.write(&mut buffer, true).unwrap();
        assert_eq!(&buffer[..4], &[0x81, 0, 0, 5]);

        let read = FlacMetadataBlock::read(&mut Cursor::new(buffer)).unwrap();
        assert!(read.header.is_last);
        assert_eq!(read.header.block_type, FlacMetadataBlockType::Padding);
        assert_eq!(read.data, vec![0; 5]);
        assert_eq!(read.encoded_len(), 9);
    }

    #[test]
    fn test_oversized_block_rejected() {
        let result = FlacMetadataBlock::new(
            FlacMetadataBlockType::Application,
            vec![0; MAX_BLOCK_LENGTH + 1],
        );
        assert!(matches!(result, Err(AudioError::BlockTooLarge(_))));
    }
}
