//! Readers for the auxiliary WNDB files: `index.*`, `cntlist`,
//! `index.sense` and `*.exc`.
//!
//! These only turn lines into records; nothing is cross-referenced here.

use std::path::Path;

use crate::error::Result;
use crate::lines::{parse_dec, LineRecord, RecordReader};
use crate::tables::PartOfSpeech;

/// A line of an `index.{noun,verb,adj,adv}` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub pointer_symbols: Vec<String>,
    pub tagsense_cnt: u32,
    /// Position is the sense rank, starting at 1.
    pub synset_offsets: Vec<u32>,
}

impl IndexRecord {
    /// `(offset, sense number)` pairs in rank order.
    pub fn ranks(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.synset_offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| (*offset, i as u32 + 1))
    }
}

/// A line of `cntlist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    pub tag_cnt: u32,
    pub sense_key: String,
    pub sense_number: u32,
}

/// A line of `index.sense`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseInfo {
    pub sense_key: String,
    pub synset_offset: u32,
    pub sense_number: u32,
    /// `None` when the file has no count column; zero is a real count.
    pub tag_cnt: Option<u32>,
}

/// A line of `{noun,verb,adj,adv}.exc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionalForm {
    pub form: String,
    pub base_forms: Vec<String>,
}

impl LineRecord for IndexRecord {
    fn parse_line(line: &str) -> std::result::Result<IndexRecord, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(format!("expected at least 5 fields, got {}", fields.len()));
        }
        let lemma = fields[0];
        let pos = fields[1]
            .chars()
            .next()
            .filter(|_| fields[1].len() == 1)
            .and_then(PartOfSpeech::from_char)
            .ok_or_else(|| format!("unknown part of speech {:?}", fields[1]))?;
        parse_dec(fields[2], "synset count")?;
        let p_cnt = parse_dec(fields[3], "pointer symbol count")? as usize;
        let rest = &fields[4..];
        if rest.len() <= p_cnt {
            return Err(format!(
                "index entry {:?} ({}) declares {} pointer symbols but has {} remaining fields",
                lemma,
                pos,
                p_cnt,
                rest.len()
            ));
        }
        let pointer_symbols = rest[..p_cnt].iter().map(|s| s.to_string()).collect();
        let sense_cnt = parse_dec(rest[p_cnt], "sense count")? as usize;
        let end = &rest[p_cnt + 1..];

        let (tagsense_cnt, offsets) = if end.len() == sense_cnt + 1 {
            (parse_dec(end[0], "tagged sense count")?, &end[1..])
        } else if end.len() == sense_cnt {
            // WordNet 1.5 has no tagged sense count
            (0, end)
        } else {
            return Err(format!(
                "index entry {:?} ({}) has {} offsets, expected {}",
                lemma,
                pos,
                end.len(),
                sense_cnt
            ));
        };

        Ok(IndexRecord {
            lemma: lemma.to_string(),
            pos,
            pointer_symbols,
            tagsense_cnt,
            synset_offsets: offsets
                .iter()
                .map(|o| parse_dec(o, "synset offset"))
                .collect::<std::result::Result<_, _>>()?,
        })
    }
}

impl LineRecord for Count {
    fn parse_line(line: &str) -> std::result::Result<Count, String> {
        match line.split_whitespace().collect::<Vec<_>>()[..] {
            [tag_cnt, sense_key, sense_number] => Ok(Count {
                tag_cnt: parse_dec(tag_cnt, "tag count")?,
                sense_key: sense_key.to_string(),
                sense_number: parse_dec(sense_number, "sense number")?,
            }),
            ref fields => Err(format!(
                "expected tag count, sense key and sense number, got {} fields",
                fields.len()
            )),
        }
    }
}

impl LineRecord for SenseInfo {
    fn parse_line(line: &str) -> std::result::Result<SenseInfo, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let tag_cnt = match fields.len() {
            3 => None,
            4 => Some(parse_dec(fields[3], "tag count")?),
            n => {
                return Err(format!(
                    "expected sense key, offset, sense number and optional tag count, got {} fields",
                    n
                ))
            }
        };
        Ok(SenseInfo {
            sense_key: fields[0].to_string(),
            synset_offset: parse_dec(fields[1], "synset offset")?,
            sense_number: parse_dec(fields[2], "sense number")?,
            tag_cnt,
        })
    }
}

impl LineRecord for ExceptionalForm {
    fn parse_line(line: &str) -> std::result::Result<ExceptionalForm, String> {
        let mut fields = line.split_whitespace();
        let form = fields.next().ok_or("empty exception entry")?;
        let base_forms: Vec<String> = fields.map(|s| s.to_string()).collect();
        if base_forms.is_empty() {
            return Err(format!("exceptional form {:?} has no base form", form));
        }
        Ok(ExceptionalForm {
            form: form.to_string(),
            base_forms,
        })
    }
}

pub fn read_index_file(path: &Path) -> Result<RecordReader<IndexRecord>> {
    RecordReader::open(path)
}

pub fn read_count_list(path: &Path) -> Result<RecordReader<Count>> {
    RecordReader::open(path)
}

pub fn read_sense_index(path: &Path) -> Result<RecordReader<SenseInfo>> {
    RecordReader::open(path)
}

pub fn read_exceptions_file(path: &Path) -> Result<RecordReader<ExceptionalForm>> {
    RecordReader::open(path)
}
