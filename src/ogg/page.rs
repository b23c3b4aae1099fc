// Ogg page framing
//
// Page header (27 bytes):
// - Capture pattern "OggS" (4)
// - Version 0 (1)
// - Header type: 1=continuation, 2=bos, 4=eos (1)
// - Granule position (8, LE)
// - Bitstream serial number (4, LE)
// - Page sequence number (4, LE)
// - CRC checksum (4, LE)
// - Number of segments (1)
// followed by the segment (lacing) table and the page data.

use std::io::{self, Read, Write};

use crate::error::AudioError;

pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

pub const HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const HEADER_TYPE_BOS: u8 = 0x02;

const HEADER_LEN: usize = 27;
const MAX_SEGMENTS: usize = 255;
const CRC_OFFSET: usize = 22;

/// Granule position of a page on which no packet ends
pub const NO_GRANULE: u64 = u64::MAX;

const CRC_TABLE: [u32; 256] = crc_table();

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            r = if r & 0x8000_0000 != 0 { (r << 1) ^ 0x04c1_1db7 } else { r << 1 };
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Ogg checksum: CRC-32, polynomial 0x04c11db7, zero initial value, no
/// reflection
pub fn crc32(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |crc, &byte| (crc << 8) ^ CRC_TABLE[((crc >> 24) as u8 ^ byte) as usize])
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn truncated(e: io::Error) -> AudioError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        AudioError::Ogg("truncated page".into())
    } else {
        e.into()
    }
}

/// One Ogg page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage {
    pub header_type: u8,
    pub granule_position: u64,
    pub serial: u32,
    pub sequence: u32,
    pub segment_table: Vec<u8>,
    pub data: Vec<u8>,
}

impl OggPage {
    fn empty(serial: u32, sequence: u32, header_type: u8) -> Self {
        OggPage {
            header_type,
            granule_position: NO_GRANULE,
            serial,
            sequence,
            segment_table: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Read the next page; `None` at a clean end of stream.
    ///
    /// The checksum is verified.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>, AudioError> {
        let mut header = [0u8; HEADER_LEN];
        if let Err(e) = reader.read_exact(&mut header[..1]) {
            return match e.kind() {
                io::ErrorKind::UnexpectedEof => Ok(None),
                _ => Err(e.into()),
            };
        }
        reader.read_exact(&mut header[1..]).map_err(truncated)?;

        if &header[0..4] != OGG_SIGNATURE {
            return Err(AudioError::Ogg("missing OggS capture pattern".into()));
        }
        if header[4] != 0 {
            return Err(AudioError::Ogg(format!("unknown page version {}", header[4])));
        }

        let mut granule = [0u8; 8];
        granule.copy_from_slice(&header[6..14]);
        let stored_crc = le_u32(&header[CRC_OFFSET..CRC_OFFSET + 4]);

        let mut segment_table = vec![0u8; header[26] as usize];
        reader.read_exact(&mut segment_table).map_err(truncated)?;
        let mut data = vec![0u8; segment_table.iter().map(|&x| x as usize).sum()];
        reader.read_exact(&mut data).map_err(truncated)?;

        let page = OggPage {
            header_type: header[5],
            granule_position: u64::from_le_bytes(granule),
            serial: le_u32(&header[14..18]),
            sequence: le_u32(&header[18..22]),
            segment_table,
            data,
        };
        if page.checksum() != stored_crc {
            return Err(AudioError::Ogg(format!("checksum mismatch on page {}", page.sequence)));
        }
        Ok(Some(page))
    }

    fn unchecked_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(OGG_SIGNATURE);
        bytes.push(0);
        bytes.push(self.header_type);
        bytes.extend_from_slice(&self.granule_position.to_le_bytes());
        bytes.extend_from_slice(&self.serial.to_le_bytes());
        bytes.extend_from_slice(&self.sequence.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        bytes.push(self.segment_table.len() as u8);
        bytes.extend_from_slice(&self.segment_table);
        bytes.extend_from_slice(&self.data);
        bytes
    }

    pub fn checksum(&self) -> u32 {
        crc32(&self.unchecked_bytes())
    }

    /// Serialize with a freshly computed checksum
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.unchecked_bytes();
        let crc = crc32(&bytes);
        bytes[CRC_OFFSET..CRC_OFFSET + 4].copy_from_slice(&crc.to_le_bytes());
        bytes
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.segment_table.len() + self.data.len()
    }

    pub fn is_bos(&self) -> bool {
        self.header_type & HEADER_TYPE_BOS != 0
    }
}

/// Lay `packets` out on new pages numbered from `sequence`.
///
/// The first packet starts a fresh page and the last page ends with the last
/// packet.
pub fn paginate(packets: &[Vec<u8>], serial: u32, sequence: u32) -> Vec<OggPage> {
    let mut pages = Vec::new();
    let mut page = OggPage::empty(serial, sequence, 0);

    for packet in packets {
        let full = packet.len() / 255;
        for index in 0..=full {
            if page.segment_table.len() == MAX_SEGMENTS {
                let header_type = if index > 0 { HEADER_TYPE_CONTINUATION } else { 0 };
                let next = OggPage::empty(serial, page.sequence + 1, header_type);
                pages.push(std::mem::replace(&mut page, next));
            }
            let start = index * 255;
            let len = if index < full { 255 } else { packet.len() % 255 };
            page.segment_table.push(len as u8);
            page.data.extend_from_slice(&packet[start..start + len]);
            if index == full {
                page.granule_position = 0;
            }
        }
    }
    if !page.segment_table.is_empty() {
        pages.push(page);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[test]
    fn test_crc_check_value() {
        assert_eq!(crc32(b"123456789"), 0x89a1_897f);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_page_round_trip_and_checksum() {
        let mut page = OggPage::empty(0x1234, 7, HEADER_TYPE_BOS);
        page.granule_position = 42;
        page.segment_table = vec![3];
        page.data = b"abc".to_vec();

        let bytes = page.to_bytes();
        assert_eq!(bytes.len(), page.encoded_len());
        assert_eq!(OggPage::read(&mut Cursor::new(&bytes)).unwrap(), Some(page));

        let mut corrupted = bytes.clone();
        corrupted[28] ^= 0xff;
        let result = OggPage::read(&mut Cursor::new(&corrupted));
        assert!(matches!(result, Err(AudioError::Ogg(message)) if message.contains("checksum")));
    }

    #[test]
    fn test_read_end_of_stream() {
        assert_eq!(OggPage::read(&mut Cursor::new(Vec::new())).unwrap(), None);
        assert!(matches!(
            OggPage::read(&mut Cursor::new(b"OggS\0".to_vec())),
            Err(AudioError::Ogg(_))
        ));
        assert!(matches!(
            OggPage::read(&mut Cursor::new(vec![b'X'; 40])),
            Err(AudioError::Ogg(_))
        ));
    }

    #[rstest]
    #[case(0, vec![0])]
    #[case(100, vec![100])]
    #[case(255, vec![255, 0])]
    #[case(600, vec![255, 255, 90])]
    fn test_lacing(#[case] len: usize, #[case] expected: Vec<u8>) {
        let pages = paginate(&[vec![1; len]], 1, 1);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].segment_table, expected);
        assert_eq!(pages[0].data.len(), len);
        assert_eq!(pages[0].granule_position, 0);
    }

    #[test]
    fn test_long_packet_continues_on_next_page() {
        let packet: Vec<u8> = (0..70_000u32).map(|i| i as u8).collect();
        let pages = paginate(&[packet.clone(), vec![9; 10]], 5, 1);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].segment_table.len(), 255);
        assert_eq!(pages[0].header_type, 0);
        assert_eq!(pages[0].granule_position, NO_GRANULE);
        assert_eq!(pages[1].header_type, HEADER_TYPE_CONTINUATION);
        assert_eq!(pages[1].sequence, 2);
        assert_eq!(pages[1].granule_position, 0);

        let data: Vec<u8> = pages.iter().flat_map(|p| p.data.iter().copied()).collect();
        assert_eq!(&data[..70_000], &packet[..]);
        assert_eq!(&data[70_000..], &[9; 10]);
    }
}
