// ID3v2 text frames

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

/// Text encoding types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16BE,
            3 => TextEncoding::Utf8,
            _ => TextEncoding::Iso8859_1,
        }
    }

    /// Encoding written for a tag of major version `major`
    pub fn for_version(major: u8) -> Self {
        if major >= 4 {
            TextEncoding::Utf8
        } else {
            TextEncoding::Utf16
        }
    }

    fn is_wide(self) -> bool {
        matches!(self, TextEncoding::Utf16 | TextEncoding::Utf16BE)
    }
}

/// User-defined text frame: a description followed by values
pub const USER_TEXT: &str = "TXXX";

/// Text frames and the tag names they carry
const TEXT_FRAMES: &[(&str, &str)] = &[
    ("TPE1", "artist"),
    ("TALB", "album"),
    ("TRCK", "tracknumber"),
    ("TIT2", "title"),
    ("TDRC", "date"),
    ("TYER", "date"),
    ("TCON", "genre"),
    ("TCOM", "composer"),
    ("TPOS", "discnumber"),
];

/// Tag name carried by a text frame
pub fn tag_name(frame_id: &str) -> Option<&'static str> {
    TEXT_FRAMES
        .iter()
        .find(|(id, _)| *id == frame_id)
        .map(|(_, name)| *name)
}

/// Frame that stores `tag` in a tag of major version `major`
pub fn frame_id(tag: &str, major: u8) -> Option<&'static str> {
    match tag {
        "date" if major >= 4 => Some("TDRC"),
        "date" => Some("TYER"),
        _ => TEXT_FRAMES.iter().find(|(_, name)| *name == tag).map(|(id, _)| *id),
    }
}

fn decode_string(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Iso8859_1 => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
        TextEncoding::Utf16 => match bytes {
            [0xFF, 0xFE, rest @ ..] => UTF_16LE.decode_without_bom_handling(rest).0.into_owned(),
            [0xFE, 0xFF, rest @ ..] => UTF_16BE.decode_without_bom_handling(rest).0.into_owned(),
            _ => UTF_16LE.decode_without_bom_handling(bytes).0.into_owned(),
        },
        TextEncoding::Utf16BE => UTF_16BE.decode_without_bom_handling(bytes).0.into_owned(),
        TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Split on the encoding's terminator (one zero byte, or an aligned zero
/// pair for UTF-16)
fn split_terminated(body: &[u8], encoding: TextEncoding) -> Vec<&[u8]> {
    if !encoding.is_wide() {
        return body.split(|&b| b == 0).collect();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos + 1 < body.len() {
        if body[pos] == 0 && body[pos + 1] == 0 {
            parts.push(&body[start..pos]);
            start = pos + 2;
        }
        pos += 2;
    }
    parts.push(&body[start.min(body.len())..]);
    parts
}

/// Decode a text frame body into its strings. Trailing empty strings left
/// by terminators are dropped.
pub fn decode_text(data: &[u8]) -> Vec<String> {
    let Some((&encoding, body)) = data.split_first() else {
        return Vec::new();
    };
    let encoding = TextEncoding::from_byte(encoding);
    let mut strings: Vec<String> = split_terminated(body, encoding)
        .into_iter()
        .map(|part| decode_string(part, encoding))
        .collect();
    while strings.last().is_some_and(String::is_empty) {
        strings.pop();
    }
    strings
}

fn encode_string(text: &str, encoding: TextEncoding, out: &mut Vec<u8>) {
    match encoding {
        TextEncoding::Iso8859_1 => out.extend_from_slice(&WINDOWS_1252.encode(text).0),
        TextEncoding::Utf16 => {
            out.extend_from_slice(&[0xFF, 0xFE]);
            out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        }
        TextEncoding::Utf16BE => out.extend(text.encode_utf16().flat_map(u16::to_be_bytes)),
        TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
    }
}

/// Encode strings as a text frame body, zero-separated
pub fn encode_text<S: AsRef<str>>(strings: &[S], encoding: TextEncoding) -> Vec<u8> {
    let terminator: &[u8] = if encoding.is_wide() { &[0, 0] } else { &[0] };
    let mut data = vec![encoding as u8];
    for (index, text) in strings.iter().enumerate() {
        if index > 0 {
            data.extend_from_slice(terminator);
        }
        encode_string(text.as_ref(), encoding, &mut data);
    }
    data
}
