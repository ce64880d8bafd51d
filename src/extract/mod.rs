// src/extract/mod.rs

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;
use zip::ZipArchive;

/// Open the archive at `zip_path` and return `(entry_name, text)` for its
/// first entry, decoded as strict UTF-8. The bike-share exports hold exactly
/// one CSV per archive; extra entries are ignored with a warning.
pub fn read_first_csv_entry(zip_path: &Path) -> Result<(String, String)> {
    let file =
        File::open(zip_path).with_context(|| format!("opening {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("reading zip archive {}", zip_path.display()))?;

    if archive.len() == 0 {
        bail!("{} contains no entries", zip_path.display());
    }
    if archive.len() > 1 {
        warn!(
            zip = %zip_path.display(),
            entries = archive.len(),
            "archive holds more than one entry; only the first is used"
        );
    }

    let mut entry = archive
        .by_index(0)
        .with_context(|| format!("opening first entry of {}", zip_path.display()))?;
    let name = entry.name().to_string();
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buf)
        .with_context(|| format!("reading {} from {}", name, zip_path.display()))?;
    let text =
        String::from_utf8(buf).with_context(|| format!("{name} is not valid UTF-8"))?;
    Ok((name, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    fn temp_zip(entries: &[(&str, &[u8])]) -> Result<NamedTempFile> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options.clone())?;
                zip.write_all(content)?;
            }
            zip.finish()?;
        }
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(&buf)?;
        Ok(tmp)
    }

    #[test]
    fn reads_the_single_entry() -> Result<()> {
        let tmp = temp_zip(&[("trips.csv", b"id\n1\n".as_slice())])?;
        let (name, text) = read_first_csv_entry(tmp.path())?;
        assert_eq!(name, "trips.csv");
        assert_eq!(text, "id\n1\n");
        Ok(())
    }

    #[test]
    fn multi_entry_archives_use_only_the_first() -> Result<()> {
        let tmp = temp_zip(&[
            ("first.csv", b"a\n1\n".as_slice()),
            ("second.csv", b"b\n2\n".as_slice()),
        ])?;
        let (name, text) = read_first_csv_entry(tmp.path())?;
        assert_eq!(name, "first.csv");
        assert_eq!(text, "a\n1\n");
        Ok(())
    }

    #[test]
    fn garbage_bytes_are_not_an_archive() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"this is not a zip archive")?;
        let err = read_first_csv_entry(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("reading zip archive"));
        Ok(())
    }

    #[test]
    fn entry_without_valid_utf8_is_an_error() -> Result<()> {
        let tmp = temp_zip(&[("bad.csv", b"id\n\xff\xfe\n".as_slice())])?;
        let err = read_first_csv_entry(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not valid UTF-8"));
        Ok(())
    }

    #[test]
    fn entry_less_archives_are_an_error() -> Result<()> {
        let tmp = temp_zip(&[])?;
        let err = read_first_csv_entry(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("contains no entries"));
        Ok(())
    }
}
