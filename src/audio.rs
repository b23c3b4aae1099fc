// Audio file dispatch
//
// The container is chosen from the leading bytes, never from the extension:
// - "fLaC"          FLAC
// - "OggS"          Ogg Vorbis or Ogg Opus (decided by the first packet)
// - "ID3" or sync   MP3

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::AudioError;
use crate::flac::{FlacFile, FLAC_SIGNATURE};
use crate::id3::{is_mpeg_sync, Id3File, ID3_SIGNATURE};
use crate::ogg::{OggCodec, OggFile, OGG_SIGNATURE};
use crate::tag_map::TagMap;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Flac,
    OggVorbis,
    OggOpus,
    Mp3,
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AudioFormat::Flac => "FLAC",
            AudioFormat::OggVorbis => "Ogg Vorbis",
            AudioFormat::OggOpus => "Ogg Opus",
            AudioFormat::Mp3 => "MP3",
        })
    }
}

/// A tagged audio file of any supported format
#[derive(Debug)]
pub enum AudioFile {
    Flac(FlacFile),
    Ogg(OggFile),
    Mp3(Id3File),
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let mut signature = Vec::with_capacity(4);
        File::open(path)?.take(4).read_to_end(&mut signature)?;
        let signature = signature.as_slice();

        if signature == FLAC_SIGNATURE {
            Ok(AudioFile::Flac(FlacFile::open(path)?))
        } else if signature == OGG_SIGNATURE {
            Ok(AudioFile::Ogg(OggFile::open(path)?))
        } else if signature.starts_with(ID3_SIGNATURE) || is_mpeg_sync(signature) {
            Ok(AudioFile::Mp3(Id3File::open(path)?))
        } else {
            Err(AudioError::UnknownFormat)
        }
    }

    pub fn format(&self) -> AudioFormat {
        match self {
            AudioFile::Flac(_) => AudioFormat::Flac,
            AudioFile::Ogg(ogg) => match ogg.codec() {
                OggCodec::Vorbis => AudioFormat::OggVorbis,
                OggCodec::Opus => AudioFormat::OggOpus,
            },
            AudioFile::Mp3(_) => AudioFormat::Mp3,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            AudioFile::Flac(flac) => flac.path(),
            AudioFile::Ogg(ogg) => ogg.path(),
            AudioFile::Mp3(mp3) => mp3.path(),
        }
    }

    pub fn tags(&self) -> TagMap {
        match self {
            AudioFile::Flac(flac) => flac.tags(),
            AudioFile::Ogg(ogg) => ogg.tags(),
            AudioFile::Mp3(mp3) => mp3.tags(),
        }
    }

    pub fn set_tags(&mut self, tags: &TagMap) {
        match self {
            AudioFile::Flac(flac) => flac.set_tags(tags),
            AudioFile::Ogg(ogg) => ogg.set_tags(tags),
            AudioFile::Mp3(mp3) => mp3.set_tags(tags),
        }
    }

    /// Write the current tags back to disk
    pub fn save(&mut self) -> Result<(), AudioError> {
        match self {
            AudioFile::Flac(flac) => flac.save(),
            AudioFile::Ogg(ogg) => ogg.save(),
            AudioFile::Mp3(mp3) => mp3.save(),
        }
    }
}
