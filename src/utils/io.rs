// Byte-order helpers for metadata blocks, and in-place file rewriting

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

/// Write little-endian 32-bit integer
pub fn write_le_u32<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read big-endian 24-bit integer
pub fn read_be_u24<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 3];
    reader.read_exact(&mut buffer)?;
    Ok(((buffer[0] as u32) << 16) | ((buffer[1] as u32) << 8) | (buffer[2] as u32))
}

/// Write the low 24 bits of `value`, big-endian
pub fn write_be_u24<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_all(&value.to_be_bytes()[1..])
}

/// Read a length-prefixed (LE u32) byte string
pub fn read_sized<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let length = read_le_u32(reader)? as usize;
    let mut buffer = vec![0u8; length];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Replace the file at `path` through a temporary sibling.
///
/// `write` receives the temporary file and the original positioned at
/// `offset`, and must copy whatever part of the original it keeps. The
/// original is closed before the temporary file takes its place.
pub fn rewrite_file<E, F>(path: &Path, offset: u64, write: F) -> Result<(), E>
where
    E: From<io::Error>,
    F: FnOnce(&mut BufWriter<&File>, &mut BufReader<File>) -> Result<(), E>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut source = File::open(path)?;
        source.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer, &mut reader)?;
        writer.flush()?;
    }
    fs::set_permissions(temp.path(), fs::metadata(path)?.permissions())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
