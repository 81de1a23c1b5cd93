// src/process/archive.rs

use anyhow::{bail, Context, Result};
use std::io::{Cursor, Read, Seek};
use tracing::{debug, info, instrument};
use zip::ZipArchive;

const BOM: char = '\u{feff}';

/// Name of the single file entry whose name starts with `prefix`.
///
/// Zero or several matches are an error: the archive layout changed upstream
/// and the caller must adjust the prefix rather than get an arbitrary member.
pub fn find_member<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
) -> Result<String> {
    let mut matches = Vec::new();
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to access ZIP entry #{}", i))?;
        debug!(name = entry.name(), "archive entry");
        if entry.is_file() && entry.name().starts_with(prefix) {
            matches.push(entry.name().to_string());
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!(
            "no archive member starts with {:?}; the prefix or folder structure has changed",
            prefix
        ),
        n => bail!(
            "{} archive members start with {:?} ({}); the prefix or folder structure has changed",
            n,
            prefix,
            matches.join(", ")
        ),
    }
}

/// Open the zip in `bytes`, locate the member starting with `prefix` and
/// decode it as UTF-8, dropping a leading byte-order mark.
#[instrument(level = "info", skip(bytes), fields(len = bytes.len()))]
pub fn read_member_text(bytes: &[u8], prefix: &str) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("Failed to read ZIP archive")?;
    let name = find_member(&mut archive, prefix)?;

    let mut entry = archive
        .by_name(&name)
        .with_context(|| format!("Failed to open {}", name))?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to read {} into memory", name))?;

    let text = decode_utf8_sig(buf).with_context(|| format!("{} is not valid UTF-8", name))?;
    info!(member = %name, chars = text.len(), "extracted archive member");
    Ok(text)
}

/// UTF-8 decode that strips a leading BOM if present.
pub fn decode_utf8_sig(buf: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(buf)?;
    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
