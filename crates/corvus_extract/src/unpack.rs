use crate::{COPY_BUF_SIZE, ExtractError};
use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::ZipArchive;

/// Required path prefix on every inner-archive entry.
const ASSET_PREFIX: &str = "assets/";

/// Extension marking files whose true type is disguised; stripped on disk.
/// Only the name changes, the content is copied untouched.
const DISGUISE_EXTENSION: &str = "ys";

/// Extract every file entry of one inner archive under `dest`.
///
/// Entry paths must begin with `assets/`; that prefix is removed and a
/// trailing `.ys` extension is dropped from the destination name. Bytes are
/// copied through a fixed-size buffer so large media files never have to fit
/// in memory. One progress line per entry is printed for operator
/// visibility, with the ordinal zero-padded to the total's digit width.
///
/// Any entry failure aborts the whole unpack; the caller owns any cleanup
/// of a partially written tree.
pub fn unpack_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    dest: &Path,
) -> Result<(), ExtractError> {
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        if !archive.by_index(index)?.is_dir() {
            entries.push(index);
        }
    }

    let total = entries.len();
    let digits = total.to_string().len();
    println!("Unpacking {total} files");

    for (ordinal, index) in entries.into_iter().enumerate() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        let Some(relative) = name.strip_prefix(ASSET_PREFIX) else {
            return Err(ExtractError::UnexpectedLayout(name));
        };

        let mut target = dest.join(relative);
        if target
            .extension()
            .is_some_and(|ext| ext == DISGUISE_EXTENSION)
        {
            target.set_extension("");
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let shown = target.strip_prefix(dest).unwrap_or(&target);
        let ordinal = ordinal + 1;
        println!("({ordinal:0digits$}/{total}): {}", shown.display());

        let mut out = File::create(&target)?;
        copy_buffered(&mut entry, &mut out)?;
    }

    Ok(())
}

/// Copy reader to writer through the platform-tuned fixed buffer.
pub(crate) fn copy_buffered<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        written += n as u64;
    }
    Ok(written)
}
