use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Output file for a patron: `<dir>/<name>.json`.
pub fn patron_path(output_dir: &Path, patron_name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", patron_name))
}

/// Buffered writer for one patron's JSON array.
///
/// Counts the bytes passing through so callers can report output size, and
/// serves as the sink operation blocks are expanded into.
pub struct PatronWriter<W: Write> {
    writer: BufWriter<W>,
    bytes_written: u64,
}

impl PatronWriter<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> PatronWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, inner),
            bytes_written: 0,
        }
    }

    /// Open the array.
    pub fn begin(&mut self) -> std::io::Result<()> {
        self.write_all(b"[\n")
    }

    /// Close the array and flush. Returns the total bytes written.
    pub fn finish(mut self) -> std::io::Result<u64> {
        self.write_all(b"]\n")?;
        self.writer.flush()?;
        Ok(self.bytes_written)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl<W: Write> Write for PatronWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
