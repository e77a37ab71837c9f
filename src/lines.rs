use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;

use crate::error::{Result, WndbError};
use crate::tables::is_lexicographer_file;

/// Opens a text file for line reading, decompressing `.bz2` files on the fly.
pub fn open(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|e| WndbError::io(path, e))?;
    if path.to_string_lossy().ends_with(".bz2") {
        Ok(Box::new(BufReader::new(BzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Lines of the license preamble at the top of the WNDB files start with
/// two spaces; some distributions also list the lexicographer file names.
pub fn is_header_line(line: &str) -> bool {
    line.starts_with("  ") || is_lexicographer_file(line.trim())
}

/// Parses one record per line of a WNDB file, skipping the header block and
/// blank lines. Line numbers in errors are 1-based.
pub trait LineRecord: Sized {
    fn parse_line(line: &str) -> std::result::Result<Self, String>;
}

pub struct RecordReader<T> {
    path: PathBuf,
    lines: Lines<Box<dyn BufRead + Send>>,
    line_no: usize,
    in_header: bool,
    _record: PhantomData<T>,
}

impl<T: LineRecord> RecordReader<T> {
    pub fn open(path: &Path) -> Result<RecordReader<T>> {
        Ok(RecordReader {
            path: path.to_path_buf(),
            lines: open(path)?.lines(),
            line_no: 0,
            in_header: true,
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line number of the record most recently returned.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<T: LineRecord> Iterator for RecordReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(WndbError::io(&self.path, e))),
            };
            self.line_no += 1;
            if self.in_header {
                if is_header_line(&line) {
                    continue;
                }
                self.in_header = false;
            }
            if line.trim().is_empty() {
                continue;
            }
            return Some(T::parse_line(&line).map_err(|message| WndbError::Format {
                path: self.path.clone(),
                line: self.line_no,
                message,
            }));
        }
    }
}

pub(crate) fn parse_dec(field: &str, what: &str) -> std::result::Result<u32, String> {
    field
        .parse::<u32>()
        .map_err(|_| format!("{} must be a decimal number, got {:?}", what, field))
}

pub(crate) fn parse_hex(field: &str, what: &str) -> std::result::Result<u32, String> {
    u32::from_str_radix(field, 16)
        .map_err(|_| format!("{} must be a hexadecimal number, got {:?}", what, field))
}

/// Word numbers index into a synset, so anything past `ffff` is corrupt.
pub(crate) fn parse_word_number(field: &str, what: &str) -> std::result::Result<u16, String> {
    u16::from_str_radix(field, 16)
        .map_err(|_| format!("{} must be a hexadecimal number below 10000, got {:?}", what, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines() {
        assert!(is_header_line("  1 This software and database is being provided"));
        assert!(is_header_line("noun.Tops\n"));
        assert!(!is_header_line("00001740 03 n 01 entity 0 000 | gloss"));
        assert!(!is_header_line(" leading single space"));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_dec("0042", "count"), Ok(42));
        assert_eq!(parse_hex("0a", "count"), Ok(10));
        assert!(parse_dec("0a", "count").unwrap_err().contains("decimal"));
        assert!(parse_hex("zz", "count").unwrap_err().contains("hexadecimal"));
    }
}
