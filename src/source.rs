//! Line-oriented frequency sources.
//!
//! A source is read once per build pass, so it must be re-openable:
//! [`FileSource`] reopens its file each time, and in-memory record lists
//! simply iterate again.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Layout of one source line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceFormat {
    /// `word quantized raw`. The middle column is checked but not used;
    /// `raw` is quantized by the builder.
    #[default]
    Histogram,
    /// `word weight`, with a final weight in `0..=255`.
    Weighted,
    /// `word`, every word getting the same weight.
    WordList { weight: u8 },
}

/// One word with its frequency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// 1-based position in the source.
    pub line: usize,
    pub word: String,
    /// Corpus count, used for ordering and thresholding.
    pub raw: u64,
    /// Final weight, when the source already provides one.
    pub weight: Option<u8>,
}

impl Record {
    /// A record whose weight is derived from `raw` by quantization.
    pub fn raw(line: usize, word: impl Into<String>, raw: u64) -> Self {
        Self {
            line,
            word: word.into(),
            raw,
            weight: None,
        }
    }

    /// A record with a final weight.
    pub fn weighted(line: usize, word: impl Into<String>, weight: u8) -> Self {
        Self {
            line,
            word: word.into(),
            raw: weight as u64,
            weight: Some(weight),
        }
    }
}

/// Parses one source line; blank lines yield `None`.
pub fn parse_line(line_no: usize, line: &str, format: SourceFormat) -> Result<Option<Record>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let expected = match format {
        SourceFormat::Histogram => 3,
        SourceFormat::Weighted => 2,
        SourceFormat::WordList { .. } => 1,
    };
    if fields.len() != expected {
        return Err(Error::parse(
            line_no,
            format!("expected {expected} fields, found {}", fields.len()),
        ));
    }

    let word = fields[0];
    let record = match format {
        SourceFormat::Histogram => {
            parse_number::<u64>(line_no, fields[1], "quantized frequency")?;
            let raw = parse_number::<u64>(line_no, fields[2], "raw frequency")?;
            Record::raw(line_no, word, raw)
        }
        SourceFormat::Weighted => {
            let weight = parse_number::<u8>(line_no, fields[1], "weight")?;
            Record::weighted(line_no, word, weight)
        }
        SourceFormat::WordList { weight } => Record::weighted(line_no, word, weight),
    };
    Ok(Some(record))
}

fn parse_number<T: std::str::FromStr>(line_no: usize, field: &str, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    field
        .parse()
        .map_err(|e| Error::parse(line_no, format!("invalid {what} {field:?}: {e}")))
}

/// Records parsed from a buffered reader.
pub struct Records<R> {
    lines: Lines<R>,
    format: SourceFormat,
    line_no: usize,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R, format: SourceFormat) -> Self {
        Self {
            lines: reader.lines(),
            format,
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(self.line_no, &line, self.format) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Iterator handed out by a [`FrequencySource`] for one pass.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// Something that can be read front to back, once per build pass.
///
/// Records must come in descending order of raw frequency.
pub trait FrequencySource {
    fn records(&self) -> Result<RecordIter<'_>>;
}

/// A frequency list on disk, reopened for every pass.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    format: SourceFormat,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, format: SourceFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrequencySource for FileSource {
    fn records(&self) -> Result<RecordIter<'_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(Records::new(BufReader::new(file), self.format)))
    }
}

impl FrequencySource for [Record] {
    fn records(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

impl FrequencySource for Vec<Record> {
    fn records(&self) -> Result<RecordIter<'_>> {
        self.as_slice().records()
    }
}
