//! Decoding of the `data.{noun,verb,adj,adv}` files.
//!
//! After the header, each line holds one synset:
//!
//! ```text
//! synset_offset lex_filenum ss_type w_cnt word lex_id [word lex_id...]
//!     p_cnt [ptr...] [f_cnt + f_num w_num [+ f_num w_num...]] | gloss
//! ```
//!
//! `w_cnt`, `lex_id` and the pointer `source/target` field are hexadecimal,
//! every other number is decimal.

use std::path::Path;

use serde_derive::Serialize;

use crate::error::Result;
use crate::lines::{parse_dec, parse_hex, parse_word_number, LineRecord, RecordReader};
use crate::tables::SynsetType;

/// Syntactic position marker of an adjective, e.g. `galore(ip)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdjPosition {
    #[serde(rename = "a")]
    Attributive,
    #[serde(rename = "p")]
    Predicative,
    #[serde(rename = "ip")]
    Postnominal,
}

impl AdjPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            AdjPosition::Attributive => "a",
            AdjPosition::Predicative => "p",
            AdjPosition::Postnominal => "ip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub word: String,
    pub lex_id: u32,
    pub adjposition: Option<AdjPosition>,
}

impl Word {
    /// The form used in index files and sense keys.
    pub fn lemma(&self) -> String {
        self.word.to_lowercase()
    }

    /// The written form, with underscores turned back into spaces.
    pub fn respaced(&self) -> String {
        self.word.replace('_', " ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub symbol: String,
    pub offset: u32,
    pub ss_type: SynsetType,
    pub source_w_num: u16,
    pub target_w_num: u16,
}

impl Pointer {
    /// A 0/0 pointer relates whole synsets rather than specific words.
    pub fn is_semantic(&self) -> bool {
        self.source_w_num == 0 && self.target_w_num == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub f_num: u32,
    /// 0 means every word of the synset.
    pub w_num: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    pub offset: u32,
    pub lex_filenum: u32,
    pub ss_type: SynsetType,
    pub words: Vec<Word>,
    pub pointers: Vec<Pointer>,
    pub frames: Vec<Frame>,
    pub gloss: String,
}

impl DataRecord {
    /// The word at a 1-based word number.
    pub fn word(&self, w_num: u16) -> Option<&Word> {
        usize::from(w_num)
            .checked_sub(1)
            .and_then(|idx| self.words.get(idx))
    }
}

impl LineRecord for DataRecord {
    fn parse_line(line: &str) -> std::result::Result<DataRecord, String> {
        parse_data_line(line)
    }
}

pub type DataRecords = RecordReader<DataRecord>;

pub fn read_data_file(path: &Path) -> Result<DataRecords> {
    RecordReader::open(path)
}

pub fn parse_data_line(line: &str) -> std::result::Result<DataRecord, String> {
    let (nongloss, gloss) = match line.find('|') {
        Some(idx) => (&line[..idx], &line[idx + 1..]),
        None => (line, ""),
    };
    let fields: Vec<&str> = nongloss.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(format!(
            "expected offset, lexicographer file, synset type and word count, got {} fields",
            fields.len()
        ));
    }

    let offset = parse_dec(fields[0], "synset offset")?;
    let lex_filenum = parse_dec(fields[1], "lexicographer file number")?;
    let ss_type = parse_ss_type(fields[2])?;
    let w_cnt = parse_hex(fields[3], "word count")? as usize;
    let rest = &fields[4..];

    let w_idx = w_cnt * 2;
    if rest.len() <= w_idx {
        return Err(format!(
            "word count {} needs {} word fields and a pointer count, found {} fields",
            w_cnt,
            w_idx,
            rest.len()
        ));
    }
    let words = parse_words(ss_type, &rest[..w_idx])?;

    let p_cnt = parse_dec(rest[w_idx], "pointer count")? as usize;
    let p_idx = w_idx + 1 + p_cnt * 4;
    if rest.len() < p_idx {
        return Err(format!(
            "pointer count {} does not match the {} pointer fields present",
            p_cnt,
            rest.len() - w_idx - 1
        ));
    }
    let pointers = parse_pointers(&rest[w_idx + 1..p_idx])?;

    let frames = match rest.get(p_idx) {
        Some(field) => {
            let f_cnt = parse_dec(field, "frame count")? as usize;
            let xs = &rest[p_idx + 1..];
            if xs.len() != f_cnt * 3 {
                return Err(format!(
                    "frame count {} does not match the {} frame fields present",
                    f_cnt,
                    xs.len()
                ));
            }
            parse_frames(xs)?
        }
        None => Vec::new(),
    };

    Ok(DataRecord {
        offset,
        lex_filenum,
        ss_type,
        words,
        pointers,
        frames,
        gloss: gloss.to_string(),
    })
}

fn parse_ss_type(field: &str) -> std::result::Result<SynsetType, String> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            SynsetType::from_char(c).ok_or_else(|| format!("unknown synset type {:?}", field))
        }
        _ => Err(format!("unknown synset type {:?}", field)),
    }
}

fn parse_words(ss_type: SynsetType, xs: &[&str]) -> std::result::Result<Vec<Word>, String> {
    xs.chunks_exact(2)
        .map(|pair| {
            let (word, adjposition) = split_adjposition(pair[0], ss_type);
            Ok(Word {
                word: word.to_string(),
                lex_id: parse_hex(pair[1], "lex_id")?,
                adjposition,
            })
        })
        .collect()
}

fn split_adjposition(word: &str, ss_type: SynsetType) -> (&str, Option<AdjPosition>) {
    if ss_type.is_adjective() {
        if let Some(stem) = word.strip_suffix("(a)") {
            return (stem, Some(AdjPosition::Attributive));
        } else if let Some(stem) = word.strip_suffix("(p)") {
            return (stem, Some(AdjPosition::Predicative));
        } else if let Some(stem) = word.strip_suffix("(ip)") {
            return (stem, Some(AdjPosition::Postnominal));
        }
    }
    (word, None)
}

fn parse_pointers(xs: &[&str]) -> std::result::Result<Vec<Pointer>, String> {
    xs.chunks_exact(4)
        .map(|group| {
            let symbol = group[0];
            let offset = parse_dec(group[1], "pointer offset")?;
            let ss_type = parse_ss_type(group[2])?;
            let src_tgt = group[3];
            if src_tgt.len() != 4 || !src_tgt.is_ascii() {
                return Err(format!(
                    "pointer source/target must be 4 hexadecimal digits, got {:?}",
                    src_tgt
                ));
            }
            let source_w_num = parse_word_number(&src_tgt[..2], "pointer source")?;
            let target_w_num = parse_word_number(&src_tgt[2..], "pointer target")?;
            if (source_w_num == 0) != (target_w_num == 0) {
                return Err(format!(
                    "pointer {} {:08}: source/target {} must be zero on both sides or on neither",
                    symbol, offset, src_tgt
                ));
            }
            Ok(Pointer {
                symbol: symbol.to_string(),
                offset,
                ss_type,
                source_w_num,
                target_w_num,
            })
        })
        .collect()
}

fn parse_frames(xs: &[&str]) -> std::result::Result<Vec<Frame>, String> {
    xs.chunks_exact(3)
        .map(|group| {
            Ok(Frame {
                f_num: parse_dec(group[1], "frame number")?,
                w_num: parse_word_number(group[2], "frame word number")?,
            })
        })
        .collect()
}
