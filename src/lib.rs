//! pathtag - convert between audio file paths and tags
//!
//! A compact pattern language (`%a/%l/%n - %t.flac`) describes how tag
//! values are laid out in a path. The same [`Pattern`] extracts tags from a
//! filename and builds a filename from tags:
//!
//! ```
//! use pathtag::{FieldKind, GenerateOptions, Pattern, TagMap};
//!
//! let pattern = Pattern::compile("%a/%l/%n - %t.flac");
//!
//! let fields = pattern.match_path("/music/Artist/Album/01 - Title.flac").unwrap();
//! assert_eq!(fields[&FieldKind::Title], "Title");
//!
//! let tags = TagMap::from(&fields);
//! let name = pattern.generate(&tags, &GenerateOptions::new()).unwrap();
//! assert_eq!(name, "Artist/Album/01 - Title.flac");
//! ```

pub mod audio;
pub mod edit;
pub mod error;
pub mod field;
pub mod flac;
pub mod id3;
pub mod ogg;
pub mod pattern;
pub mod tag_map;
mod utils;

#[cfg(feature = "python")]
mod python;

pub use audio::{AudioFile, AudioFormat};
pub use edit::TagEdit;
pub use error::{AudioError, GenerateError, NoMatch, RemapError, TagEditError};
pub use field::FieldKind;
pub use flac::FlacFile;
pub use id3::Id3File;
pub use ogg::OggFile;
pub use pattern::{
    compile, justify_width, normalize, zero_pad, GenerateOptions, Pattern, PatternWarning, Remap,
    Token,
};
pub use tag_map::{FieldValues, TagMap};
