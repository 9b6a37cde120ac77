//! Entry-level zip plumbing for the transform engine.
//!
//! Plain file entries are copied raw. Entries that a raw copy would alter
//! (directories, symlinks, entries carrying extra fields such as extended
//! timestamps) are rebuilt from options derived from the source entry.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::warn;
use zip::read::ZipFile;
use zip::result::{ZipError, ZipResult};
use zip::write::FullFileOptions;
use zip::{ZipArchive, ZipWriter, ZIP64_BYTES_THR};

use crate::error::FilterError;

/// Central directory file header signature.
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;

/// Fixed part of a central directory file header.
const CENTRAL_HEADER_LEN: usize = 46;

/// Extra fields the writer derives from the entry itself.
const REGENERATED_FIELDS: [u16; 4] = [
    0x0001, // zip64 sizes and offsets
    0x6375, // Info-ZIP unicode comment
    0x7075, // Info-ZIP unicode path
    0x9901, // AES encryption
];

/// Opens `path` as a zip archive whose entry names are all distinct.
pub(crate) fn open(path: &Path) -> Result<ZipArchive<File>, FilterError> {
    let file = File::open(path).map_err(|e| FilterError::io(path, e))?;
    let archive = ZipArchive::new(file).map_err(|e| FilterError::archive(path, e))?;

    let mut file = File::open(path).map_err(|e| FilterError::io(path, e))?;
    let repeated = find_repeated_name(&mut file, archive.central_directory_start())
        .map_err(|e| FilterError::io(path, e))?;
    if let Some(entry) = repeated {
        return Err(FilterError::DuplicateEntry {
            archive: path.to_path_buf(),
            entry,
        });
    }

    Ok(archive)
}

/// Returns the first name the central directory starting at `start` lists twice.
///
/// The archive reader indexes entries by name, so a repeated name would
/// otherwise hide one of the entries.
fn find_repeated_name<R: Read + Seek>(reader: R, start: u64) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(reader);
    reader.seek(SeekFrom::Start(start))?;

    let mut seen = HashSet::new();
    let mut header = [0u8; CENTRAL_HEADER_LEN];
    loop {
        match reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let signature = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if signature != CENTRAL_HEADER_SIGNATURE {
            return Ok(None);
        }

        let name_len = u16::from_le_bytes([header[28], header[29]]);
        let extra_len = u16::from_le_bytes([header[30], header[31]]);
        let comment_len = u16::from_le_bytes([header[32], header[33]]);

        let mut name = vec![0u8; usize::from(name_len)];
        reader.read_exact(&mut name)?;
        reader.seek_relative(i64::from(extra_len) + i64::from(comment_len))?;

        if !seen.insert(name.clone()) {
            return Ok(Some(String::from_utf8_lossy(&name).into_owned()));
        }
    }
}

/// Copies entry `index` of `archive` into `writer` under the same name.
pub(crate) fn copy_entry<W: Write + Seek>(
    archive: &mut ZipArchive<File>,
    index: usize,
    writer: &mut ZipWriter<W>,
) -> ZipResult<()> {
    let (name, options) = {
        let entry = archive.by_index_raw(index)?;
        if entry.encrypted() {
            return Err(ZipError::UnsupportedArchive("encrypted entries are not supported"));
        }
        if !entry.comment().is_empty() {
            warn!("Comment on {} is not carried over", entry.name());
        }
        let rebuild = entry.is_dir()
            || entry.is_symlink()
            || !preserved_fields(entry.extra_data().unwrap_or_default()).is_empty();
        if !rebuild {
            return writer.raw_copy_file(entry);
        }
        (entry.name().to_string(), entry_options(&entry)?)
    };

    let mut entry = archive.by_index(index)?;
    if entry.is_dir() {
        writer.add_directory(name, options)
    } else if entry.is_symlink() {
        let mut target = String::new();
        entry.read_to_string(&mut target)?;
        writer.add_symlink(name, target, options)
    } else {
        writer.start_file(name, options)?;
        io::copy(&mut entry, writer)?;
        Ok(())
    }
}

/// Write options reproducing `entry`'s header metadata.
fn entry_options(entry: &ZipFile<'_, File>) -> ZipResult<FullFileOptions<'static>> {
    let mut options = FullFileOptions::default()
        .compression_method(entry.compression())
        .large_file(entry.compressed_size().max(entry.size()) > ZIP64_BYTES_THR);
    if let Some(modified) = entry.last_modified() {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = entry.unix_mode() {
        options = options.unix_permissions(mode);
    }
    for (header_id, data) in preserved_fields(entry.extra_data().unwrap_or_default()) {
        options.add_extra_data(header_id, data.into(), false)?;
    }
    Ok(options)
}

/// Splits a raw extra field block into `(header id, data)` pairs, leaving out
/// the fields the writer regenerates.
fn preserved_fields(mut raw: &[u8]) -> Vec<(u16, &[u8])> {
    let mut fields = Vec::new();
    while let [id_lo, id_hi, len_lo, len_hi, rest @ ..] = raw {
        let header_id = u16::from_le_bytes([*id_lo, *id_hi]);
        let len = usize::from(u16::from_le_bytes([*len_lo, *len_hi]));
        let Some(data) = rest.get(..len) else {
            break;
        };
        if !REGENERATED_FIELDS.contains(&header_id) {
            fields.push((header_id, data));
        }
        raw = &rest[len..];
    }
    fields
}
