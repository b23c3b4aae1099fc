// FLAC tag container
//
// Only the metadata blocks are held in memory. Saving streams the audio
// frames from the original file into a temporary sibling which then
// replaces it.

pub mod metadata;
pub mod vorbis;

pub use metadata::{FlacMetadataBlock, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use vorbis::VorbisComment;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AudioError;
use crate::tag_map::TagMap;
use crate::utils::io::rewrite_file;

/// A FLAC file's metadata
#[derive(Debug)]
pub struct FlacFile {
    path: PathBuf,
    /// Every block except VORBIS_COMMENT, in file order
    blocks: Vec<FlacMetadataBlock>,
    comment: VorbisComment,
    /// Index in `blocks` where the comment block is written back
    comment_index: usize,
    audio_offset: u64,
}

impl FlacFile {
    /// Open a FLAC file and read its metadata blocks
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let mut signature = [0u8; 4];
        match reader.read_exact(&mut signature) {
            Ok(()) if signature == *FLAC_SIGNATURE => {}
            Ok(()) => return Err(AudioError::NotFlac),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(AudioError::NotFlac),
            Err(e) => return Err(e.into()),
        }

        let mut blocks = Vec::new();
        let mut comment = None;
        let mut comment_index = None;
        let mut audio_offset = FLAC_SIGNATURE.len() as u64;
        loop {
            let block = FlacMetadataBlock::read(&mut reader)?;
            audio_offset += block.encoded_len();
            let is_last = block.header.is_last;

            if block.header.block_type != FlacMetadataBlockType::VorbisComment {
                blocks.push(block);
            } else {
                let parsed = VorbisComment::from_bytes(&block.data)?;
                match comment.as_mut() {
                    None => {
                        comment = Some(parsed);
                        comment_index = Some(blocks.len());
                    }
                    // Only one comment block is written back; keep its fields
                    Some(first) => {
                        warn!(
                            path = %path.display(),
                            fields = parsed.comments.len(),
                            "merging extra VORBIS_COMMENT block into the first"
                        );
                        first.comments.extend(parsed.comments);
                    }
                }
            }

            if is_last {
                break;
            }
        }

        debug!(path = %path.display(), blocks = blocks.len(), audio_offset, "read FLAC metadata");
        Ok(FlacFile {
            path: path.to_path_buf(),
            // Without an existing comment block, write one after STREAMINFO
            comment_index: comment_index.unwrap_or(blocks.len().min(1)),
            blocks,
            comment: comment.unwrap_or_default(),
            audio_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
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

    /// Write metadata followed by the audio frames of `audio`
    pub fn write_to<W: Write, R: Read>(&self, writer: &mut W, audio: &mut R) -> Result<(), AudioError> {
        let comment_block = FlacMetadataBlock::new(
            FlacMetadataBlockType::VorbisComment,
            self.comment.to_bytes(),
        )?;

        let mut ordered: Vec<&FlacMetadataBlock> = self.blocks.iter().collect();
        ordered.insert(self.comment_index.min(ordered.len()), &comment_block);

        writer.write_all(FLAC_SIGNATURE)?;
        let last = ordered.len() - 1;
        for (index, block) in ordered.iter().enumerate() {
            block.write(writer, index == last)?;
        }
        io::copy(audio, writer)?;
        Ok(())
    }

    /// Length of the signature and metadata blocks as written by `write_to`
    fn metadata_len(&self) -> u64 {
        let comment_block = 4 + self.comment.to_bytes().len() as u64;
        let blocks: u64 = self.blocks.iter().map(FlacMetadataBlock::encoded_len).sum();
        FLAC_SIGNATURE.len() as u64 + blocks + comment_block
    }

    /// Rewrite the file in place with the current tags
    pub fn save(&mut self) -> Result<(), AudioError> {
        rewrite_file(&self.path, self.audio_offset, |writer, audio| self.write_to(writer, audio))?;
        self.audio_offset = self.metadata_len();
        debug!(path = %self.path.display(), "saved FLAC metadata");
        Ok(())
    }
}
