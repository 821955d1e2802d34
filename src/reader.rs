//! Buffered reader for a finite access-log file

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct LogReader {
    reader: BufReader<File>,
}

impl LogReader {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("📖 Reading access log: {}", path.display());
        Ok(Self {
            reader: BufReader::new(file),
        })
    }

    /// Next line with invalid UTF-8 replaced, or `None` at end of input.
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_lines_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(&path, "line1\nline2\nline3").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("line1"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("line2"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("line3"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"host\xff.example - - [ts] \"GET / HTTP/1.0\" 200 1\n")
            .unwrap();
        drop(file);

        let mut reader = LogReader::open(&path).unwrap();
        let line = reader.read_line().unwrap().unwrap();
        assert!(line.contains('\u{FFFD}'));
        assert!(line.ends_with("200 1"));
    }
}
