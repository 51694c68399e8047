use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use std::fs::File as StdFile;
use std::path::{Path, PathBuf};
use std::str;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, ReadError, Result};
use crate::{FENCE, PATH_MARKER};

/// Buffered writer for the bundle output file.
///
/// Each record is a path marker line, a fenced copy of the file content and
/// a blank separator line. Content that already ends with a newline is not
/// given another one, so restoring the bundle reproduces the original bytes.
pub struct BundleWriter {
    writer: BufWriter<File>,
    output_path: PathBuf,
}

impl BundleWriter {
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .await
            .map_err(|source| Error::write(path, source))?;
        Ok(Self {
            writer: BufWriter::new(file),
            output_path: path.to_path_buf(),
        })
    }

    pub async fn write_record(&mut self, rel_path: &str, content: &str) -> Result<()> {
        debug!("writing record: {rel_path}");

        self.put(format!("{PATH_MARKER}{rel_path}\n{FENCE}\n").as_bytes())
            .await?;
        self.put(content.as_bytes()).await?;
        if !content.ends_with('\n') {
            self.put(b"\n").await?;
        }
        self.put(format!("{FENCE}\n\n").as_bytes()).await
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|source| Error::write(&self.output_path, source))
    }

    async fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|source| Error::write(&self.output_path, source))
    }
}

/// Reads a file for bundling, refusing binary and non-UTF-8 content.
///
/// Failures here are per-file: the caller logs and skips, the run goes on.
pub fn read_file_text(path: &Path) -> std::result::Result<String, ReadError> {
    let file = StdFile::open(path)?;

    // Mapping a zero-length file is not portable.
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }

    let mmap = unsafe { MmapOptions::new().map(&file)? };

    let sample_size = std::cmp::min(8192, mmap.len());
    if inspect(&mmap[..sample_size]) == ContentType::BINARY {
        return Err(ReadError::Binary);
    }

    match str::from_utf8(&mmap) {
        Ok(text) => Ok(text.to_owned()),
        Err(_) => Err(ReadError::InvalidUtf8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_empty_file_as_empty_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.ts");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(read_file_text(&path).unwrap(), "");
    }

    #[test]
    fn rejects_binary_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.ts");
        let bytes: Vec<u8> = vec![0x00, 0x01, 0x02, 0xFF, 0xFE, 0x89, 0x50, 0x4E, 0x47];
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(read_file_text(&path), Err(ReadError::Binary)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        // Valid-looking text bytes with a lone continuation byte at the end.
        let mut bytes = b"let x = 1;\n".to_vec();
        bytes.push(0xC3);
        let path = dir.path().join("bad.ts");
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(read_file_text(&path), Err(ReadError::InvalidUtf8)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.ts");
        assert!(matches!(read_file_text(&path), Err(ReadError::Io(_))));
    }

    #[tokio::test]
    async fn record_layout_and_newline_handling() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("bundle.txt");

        let mut writer = BundleWriter::create(&out).await.unwrap();
        writer.write_record("a.ts", "one\n").await.unwrap();
        writer.write_record("b.ts", "two").await.unwrap();
        writer.flush().await.unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            text,
            "// a.ts\n```\none\n```\n\n// b.ts\n```\ntwo\n```\n\n"
        );
    }
}
