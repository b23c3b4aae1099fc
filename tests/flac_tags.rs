use std::fs;
use std::path::Path;

use pathtag::flac::{FlacMetadataBlock, FlacMetadataBlockType, VorbisComment, FLAC_SIGNATURE};
use pathtag::{FlacFile, GenerateOptions, Pattern, TagEdit, TagMap};

const FRAMES: &[u8] = b"\xff\xf8\x69\x08frame-data";

fn write_flac(path: &Path, comments: &[(&str, &str)]) {
    let mut data = FLAC_SIGNATURE.to_vec();
    FlacMetadataBlock::new(FlacMetadataBlockType::StreamInfo, vec![1; 34])
        .unwrap()
        .write(&mut data, false)
        .unwrap();
    FlacMetadataBlock::new(FlacMetadataBlockType::SeekTable, vec![2; 18])
        .unwrap()
        .write(&mut data, false)
        .unwrap();
    let comment = VorbisComment {
        vendor_string: "reference libFLAC 1.4.3 20230623".into(),
        comments: comments.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    };
    FlacMetadataBlock::new(FlacMetadataBlockType::VorbisComment, comment.to_bytes())
        .unwrap()
        .write(&mut data, false)
        .unwrap();
    FlacMetadataBlock::new(FlacMetadataBlockType::Padding, vec![0; 64])
        .unwrap()
        .write(&mut data, true)
        .unwrap();
    data.extend_from_slice(FRAMES);
    fs::write(path, data).unwrap();
}

#[test]
fn tags_from_path_are_saved_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let album = dir.path().join("Phish").join("Hampton");
    fs::create_dir_all(&album).unwrap();
    let path = album.join("03 - Tweezer.flac");
    write_flac(&path, &[("COMMENT", "sbd"), ("GENRE", "Rock")]);

    let pattern = Pattern::compile("%a/%l/%n - %t.flac");
    let fields = pattern.match_path(&path.to_string_lossy()).unwrap();

    let mut flac = FlacFile::open(&path).unwrap();
    let mut tags = flac.tags();
    TagEdit::parse_add("genre=Jam").unwrap().apply(&mut tags);
    for (kind, value) in &fields {
        tags.set(kind.name(), [value.as_str()]);
    }
    flac.set_tags(&tags);
    flac.save().unwrap();

    let reloaded = FlacFile::open(&path).unwrap();
    let saved = reloaded.tags();
    assert_eq!(saved.first("artist"), Some("Phish"));
    assert_eq!(saved.first("album"), Some("Hampton"));
    assert_eq!(saved.first("tracknumber"), Some("03"));
    assert_eq!(saved.first("title"), Some("Tweezer"));
    assert_eq!(saved.get("genre").unwrap(), ["Rock", "Jam"]);
    assert_eq!(saved.first("comment"), Some("sbd"));
    assert_eq!(reloaded.comment().vendor_string, "reference libFLAC 1.4.3 20230623");

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.ends_with(FRAMES));
}

#[test]
fn saved_file_keeps_block_order_and_last_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.flac");
    write_flac(&path, &[("TITLE", "Ghost")]);

    let mut flac = FlacFile::open(&path).unwrap();
    let tags: TagMap = [("title", "Ghost"), ("artist", "Phish")].into_iter().collect();
    flac.set_tags(&tags);
    flac.save().unwrap();

    let bytes = fs::read(&path).unwrap();
    let mut cursor = std::io::Cursor::new(&bytes[4..]);
    let mut types = Vec::new();
    loop {
        let block = FlacMetadataBlock::read(&mut cursor).unwrap();
        types.push(block.header.block_type);
        if block.header.is_last {
            break;
        }
    }
    assert_eq!(
        types,
        vec![
            FlacMetadataBlockType::StreamInfo,
            FlacMetadataBlockType::SeekTable,
            FlacMetadataBlockType::VorbisComment,
            FlacMetadataBlockType::Padding,
        ]
    );
}

#[test]
fn generated_name_uses_stored_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.flac");
    write_flac(&path, &[("TRACKNUMBER", "5/18"), ("TITLE", "Harry Hood?")]);

    let tags = FlacFile::open(&path).unwrap().tags();
    let options = GenerateOptions::new().with_justify(18).with_strip("?");
    let name = Pattern::compile("%n %t.flac").generate(&tags, &options).unwrap();
    assert_eq!(name, "05 Harry Hood.flac");
}
