//! Rebuilding `index.sense` from the data, index and count files.
//!
//! Each distinct lower-cased lemma of a synset gets one line:
//!
//! ```text
//! sense_key synset_offset sense_number tag_cnt
//! ```

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::Path;

use log::info;
use rayon::prelude::*;

use crate::error::{Result, WndbError};
use crate::readers::SenseInfo;
use crate::resolve::satellite_head;
use crate::sensekey::{format_sense_key, normalize_sense_key};
use crate::source::{load_count_map, load_sense_ranks, locate, require, DataFile, SenseRanks};
use crate::tables::PartOfSpeech;

/// Builds the sense index of the WNDB directory `dir`, sorted by sense key.
/// Counts come from `cntlist` if there is one. With `use_adjposition` the
/// head words of satellites keep their adjective position, as some older
/// releases did.
pub fn build_sense_index(dir: &Path, use_adjposition: bool) -> Result<Vec<SenseInfo>> {
    for pos in PartOfSpeech::ALL {
        require(dir, &format!("data.{}", pos.file_suffix()))?;
        require(dir, &format!("index.{}", pos.file_suffix()))?;
    }
    let counts = match locate(dir, "cntlist") {
        Some(path) => load_count_map(&path)?,
        None => HashMap::new(),
    };

    let per_pos = PartOfSpeech::ALL
        .par_iter()
        .map(|pos| {
            let suffix = pos.file_suffix();
            let data = DataFile::load(*pos, &require(dir, &format!("data.{}", suffix))?)?;
            let ranks = load_sense_ranks(&require(dir, &format!("index.{}", suffix))?)?;
            category_senses(&data, &ranks, &counts, use_adjposition)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut senses: Vec<SenseInfo> = per_pos.into_iter().flatten().collect();
    senses.sort_by(|a, b| {
        (&a.sense_key, a.synset_offset, a.sense_number, a.tag_cnt).cmp(&(
            &b.sense_key,
            b.synset_offset,
            b.sense_number,
            b.tag_cnt,
        ))
    });
    info!("Built {} sense index lines", senses.len());
    Ok(senses)
}

fn category_senses(
    data: &DataFile,
    ranks: &SenseRanks,
    counts: &HashMap<String, u32>,
    use_adjposition: bool,
) -> Result<Vec<SenseInfo>> {
    let mut senses = Vec::new();
    for record in data.records() {
        let head = satellite_head(record, data)?;
        let head_word = match head {
            Some(word) => match word.adjposition {
                Some(adjposition) if use_adjposition => {
                    format!("{}({})", word.lemma(), adjposition.as_str())
                }
                _ => word.lemma(),
            },
            None => String::new(),
        };

        // "A.M." and "a.m." share a line
        let mut members = HashSet::new();
        for word in &record.words {
            let lemma = word.lemma();
            if !members.insert(lemma.clone()) {
                continue;
            }
            let sense_number = ranks
                .get(&(lemma.clone(), record.offset))
                .copied()
                .ok_or_else(|| WndbError::OrphanCrossReference {
                    offset: record.offset,
                    ss_type: record.ss_type.as_char(),
                    message: format!(
                        "{} has no sense number in index.{}",
                        lemma,
                        data.pos.file_suffix()
                    ),
                })?;
            let sense_key = format_sense_key(
                &lemma,
                record.ss_type.index(),
                record.lex_filenum,
                word.lex_id,
                &head_word,
                head.map_or(0, |h| h.lex_id),
            );
            let tag_cnt = counts
                .get(&normalize_sense_key(&sense_key))
                .copied()
                .unwrap_or(0);
            senses.push(SenseInfo {
                sense_key,
                synset_offset: record.offset,
                sense_number,
                tag_cnt: Some(tag_cnt),
            });
        }
    }
    Ok(senses)
}

pub fn write_sense_index<W: Write>(senses: &[SenseInfo], mut out: W) -> io::Result<()> {
    for info in senses {
        writeln!(
            out,
            "{} {:08} {} {}",
            info.sense_key,
            info.synset_offset,
            info.sense_number,
            info.tag_cnt.unwrap_or(0)
        )?;
    }
    out.flush()
}
