//! Loading a WNDB directory.
//!
//! All data files are decoded before anything is cross-referenced, since
//! pointers may target any part of speech. The four categories are read in
//! parallel and each ends up in an immutable [`DataFile`] arena.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::data::{read_data_file, DataRecord};
use crate::error::{Result, WndbError};
use crate::lines;
use crate::readers::{
    read_count_list, read_exceptions_file, read_index_file, read_sense_index, SenseInfo,
};
use crate::resolve::RecordLookup;
use crate::sensekey::normalize_sense_key;
use crate::tables::{PartOfSpeech, SynsetType};

/// Files that must be present in a WNDB directory, possibly compressed.
pub fn required_files() -> Vec<String> {
    let mut files = Vec::new();
    for pos in PartOfSpeech::ALL {
        files.push(format!("data.{}", pos.file_suffix()));
        files.push(format!("index.{}", pos.file_suffix()));
        files.push(format!("{}.exc", pos.file_suffix()));
    }
    files.push("index.sense".to_string());
    files
}

/// Finds `name` or `name.bz2` in `dir`.
pub fn locate(dir: &Path, name: &str) -> Option<PathBuf> {
    let plain = dir.join(name);
    if plain.is_file() {
        return Some(plain);
    }
    let compressed = dir.join(format!("{}.bz2", name));
    if compressed.is_file() {
        Some(compressed)
    } else {
        None
    }
}

pub(crate) fn require(dir: &Path, name: &str) -> Result<PathBuf> {
    locate(dir, name).ok_or_else(|| WndbError::MissingRequiredFile(dir.join(name)))
}

pub fn check_required_files(dir: &Path) -> Result<()> {
    for name in required_files() {
        require(dir, &name)?;
    }
    Ok(())
}

/// The decoded records of one `data.*` file, in file order.
#[derive(Debug)]
pub struct DataFile {
    pub pos: PartOfSpeech,
    pub path: PathBuf,
    records: Vec<DataRecord>,
    by_offset: HashMap<u32, usize>,
}

impl DataFile {
    pub fn load(pos: PartOfSpeech, path: &Path) -> Result<DataFile> {
        let records = read_data_file(path)?.collect::<Result<Vec<_>>>()?;
        DataFile::from_records(pos, path, records)
    }

    pub fn from_records(pos: PartOfSpeech, path: &Path, records: Vec<DataRecord>) -> Result<DataFile> {
        let mut by_offset = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_offset.insert(record.offset, idx).is_some() {
                return Err(WndbError::DuplicateSynset {
                    offset: record.offset,
                    ss_type: record.ss_type.as_char(),
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(DataFile {
            pos,
            path: path.to_path_buf(),
            records,
            by_offset,
        })
    }

    pub fn get(&self, offset: u32) -> Option<&DataRecord> {
        self.by_offset.get(&offset).map(|idx| &self.records[*idx])
    }

    pub fn records(&self) -> &[DataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordLookup for DataFile {
    fn record(&self, ss_type: SynsetType, offset: u32) -> Option<&DataRecord> {
        if ss_type.part_of_speech() == self.pos {
            self.get(offset)
        } else {
            None
        }
    }
}

/// Sense numbers from an `index.*` file, keyed by lemma and offset.
pub type SenseRanks = HashMap<(String, u32), u32>;

pub fn load_sense_ranks(path: &Path) -> Result<SenseRanks> {
    let mut ranks = HashMap::new();
    for record in read_index_file(path)? {
        let record = record?;
        for (offset, rank) in record.ranks() {
            ranks.insert((record.lemma.to_lowercase(), offset), rank);
        }
    }
    Ok(ranks)
}

/// Exceptional forms by base form.
pub type Exceptions = HashMap<String, BTreeSet<String>>;

pub fn load_exceptions(path: &Path) -> Result<Exceptions> {
    let mut exceptions: Exceptions = HashMap::new();
    for ex in read_exceptions_file(path)? {
        let ex = ex?;
        for base in ex.base_forms {
            exceptions
                .entry(base.to_lowercase())
                .or_default()
                .insert(ex.form.clone());
        }
    }
    Ok(exceptions)
}

/// Everything read from one category's files.
struct Category {
    data: DataFile,
    ranks: SenseRanks,
    exceptions: Exceptions,
}

fn load_category(dir: &Path, pos: PartOfSpeech) -> Result<Category> {
    let suffix = pos.file_suffix();
    let data = DataFile::load(pos, &require(dir, &format!("data.{}", suffix))?)?;
    debug!("decoded {} synsets from {}", data.len(), data.path.display());
    Ok(Category {
        data,
        ranks: load_sense_ranks(&require(dir, &format!("index.{}", suffix))?)?,
        exceptions: load_exceptions(&require(dir, &format!("{}.exc", suffix))?)?,
    })
}

/// A fully loaded WNDB directory.
#[derive(Debug)]
pub struct Source {
    data: Vec<DataFile>,
    ranks: HashMap<PartOfSpeech, SenseRanks>,
    exceptions: HashMap<PartOfSpeech, Exceptions>,
    sense_index: HashMap<String, SenseInfo>,
    counts: HashMap<String, u32>,
}

impl Source {
    pub fn load(dir: &Path) -> Result<Source> {
        check_required_files(dir)?;

        info!("Loading WNDB data from {}", dir.display());
        let categories = PartOfSpeech::ALL
            .par_iter()
            .map(|pos| load_category(dir, *pos))
            .collect::<Result<Vec<_>>>()?;

        info!("Loading sense index");
        let mut sense_index = HashMap::new();
        for info in read_sense_index(&require(dir, "index.sense")?)? {
            let info = info?;
            sense_index
                .entry(normalize_sense_key(&info.sense_key))
                .or_insert(info);
        }

        let mut counts = HashMap::new();
        if let Some(path) = locate(dir, "cntlist") {
            info!("Loading count list");
            counts = load_count_map(&path)?;
        }

        let mut source = Source {
            data: Vec::with_capacity(categories.len()),
            ranks: HashMap::new(),
            exceptions: HashMap::new(),
            sense_index,
            counts,
        };
        for category in categories {
            let pos = category.data.pos;
            source.ranks.insert(pos, category.ranks);
            source.exceptions.insert(pos, category.exceptions);
            source.data.push(category.data);
        }
        Ok(source)
    }

    pub fn data_file(&self, pos: PartOfSpeech) -> Option<&DataFile> {
        self.data.iter().find(|f| f.pos == pos)
    }

    pub fn data_files(&self) -> &[DataFile] {
        &self.data
    }

    /// 1-based rank of the sense of `lemma` in synset `offset`.
    pub fn sense_rank(&self, pos: PartOfSpeech, lemma: &str, offset: u32) -> Option<u32> {
        self.ranks
            .get(&pos)
            .and_then(|ranks| ranks.get(&(lemma.to_lowercase(), offset)))
            .copied()
    }

    /// Tag count of a sense key, from `index.sense` or else `cntlist`.
    pub fn tag_count(&self, sense_key: &str) -> Option<u32> {
        let key = normalize_sense_key(sense_key);
        self.sense_index
            .get(&key)
            .and_then(|info| info.tag_cnt)
            .or_else(|| self.counts.get(&key).copied())
    }

    pub fn sense_info(&self, sense_key: &str) -> Option<&SenseInfo> {
        self.sense_index.get(&normalize_sense_key(sense_key))
    }

    pub fn exceptions(&self, pos: PartOfSpeech) -> Option<&Exceptions> {
        self.exceptions.get(&pos)
    }

    pub fn exceptional_forms(&self, pos: PartOfSpeech, base: &str) -> Option<&BTreeSet<String>> {
        self.exceptions
            .get(&pos)
            .and_then(|exceptions| exceptions.get(&base.to_lowercase()))
    }
}

impl RecordLookup for Source {
    fn record(&self, ss_type: SynsetType, offset: u32) -> Option<&DataRecord> {
        self.data_file(ss_type.part_of_speech())
            .and_then(|file| file.get(offset))
    }
}

/// Tag counts from `cntlist`, keyed by normalized sense key.
pub fn load_count_map(path: &Path) -> Result<HashMap<String, u32>> {
    let mut counts = HashMap::new();
    for count in read_count_list(path)? {
        let count = count?;
        counts.insert(normalize_sense_key(&count.sense_key), count.tag_cnt);
    }
    Ok(counts)
}

/// Reads a tab-separated `ili<TAB>offset-type` map, e.g. `i35545	00001740-a`.
/// Satellites listed as `-s` can also be found under `-a`.
pub fn load_ili_map(path: &Path) -> Result<HashMap<String, String>> {
    let reader = lines::open(path)?;
    let mut ili_map = HashMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| WndbError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
        let (ili, ssid) = match (fields.next(), fields.next(), fields.next()) {
            (Some(ili), Some(ssid), None) => (ili.trim(), ssid.trim()),
            _ => {
                return Err(WndbError::Format {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: "expected an ILI and a synset id separated by a tab".to_string(),
                })
            }
        };
        if let Some(stem) = ssid.strip_suffix("-s") {
            ili_map
                .entry(format!("{}-a", stem))
                .or_insert_with(|| ili.to_string());
        }
        ili_map.insert(ssid.to_string(), ili.to_string());
    }
    info!("Loaded {} ILI mappings", ili_map.len());
    Ok(ili_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_data_line;
    use std::fs;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn minimal_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in required_files() {
            write(dir.path(), &name, "");
        }
        dir
    }

    #[test]
    fn missing_files_are_reported_before_parsing() {
        let dir = minimal_dir();
        // garbage that would fail to decode
        write(dir.path(), "data.noun", "not a record\n");
        fs::remove_file(dir.path().join("verb.exc")).unwrap();
        match Source::load(dir.path()) {
            Err(WndbError::MissingRequiredFile(path)) => assert!(path.ends_with("verb.exc")),
            other => panic!("expected a missing file, got {:?}", other),
        }
    }

    #[test]
    fn compressed_files_are_found() {
        let dir = minimal_dir();
        fs::remove_file(dir.path().join("index.sense")).unwrap();
        let file = fs::File::create(dir.path().join("index.sense.bz2")).unwrap();
        let mut enc = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
        writeln!(enc, "entity%1:03:00:: 00001740 1 11").unwrap();
        enc.finish().unwrap();

        let source = Source::load(dir.path()).unwrap();
        assert_eq!(source.tag_count("entity%1:03:00::"), Some(11));
        assert!(source.data_file(PartOfSpeech::Noun).unwrap().is_empty());
    }

    #[test]
    fn duplicate_offsets_are_fatal() {
        let records = vec![
            parse_data_line("00001740 03 n 01 entity 0 000 | x").unwrap(),
            parse_data_line("00001740 03 n 01 thing 0 000 | y").unwrap(),
        ];
        let err = DataFile::from_records(PartOfSpeech::Noun, Path::new("data.noun"), records)
            .unwrap_err();
        assert!(matches!(err, WndbError::DuplicateSynset { offset: 1740, .. }));
    }

    #[test]
    fn loads_ranks_counts_and_exceptions() {
        let dir = minimal_dir();
        write(
            dir.path(),
            "data.noun",
            "  1 license\n00001740 03 n 01 entity 0 000 | that which exists\n00002000 03 n 01 Entity 0 000 | x\n",
        );
        write(dir.path(), "index.noun", "entity n 2 0 2 1 00002000 00001740\n");
        write(dir.path(), "noun.exc", "entities entity\ngeese goose\n");
        write(
            dir.path(),
            "index.sense",
            "entity%1:03:00:: 00001740 2\nentity%1:03:01:: 00002000 1 0\n",
        );
        write(dir.path(), "cntlist", "7 entity%1:03:00:: 2\n3 entity%1:03:01:: 1\n");

        let source = Source::load(dir.path()).unwrap();
        let nouns = source.data_file(PartOfSpeech::Noun).unwrap();
        assert_eq!(nouns.len(), 2);
        assert_eq!(nouns.records()[0].offset, 1740);
        assert_eq!(
            source.record(SynsetType::Noun, 2000).map(|r| r.words[0].word.as_str()),
            Some("Entity")
        );
        assert!(source.record(SynsetType::Verb, 2000).is_none());

        assert_eq!(source.sense_rank(PartOfSpeech::Noun, "Entity", 2000), Some(1));
        assert_eq!(source.sense_rank(PartOfSpeech::Noun, "entity", 1740), Some(2));
        assert_eq!(source.sense_rank(PartOfSpeech::Verb, "entity", 1740), None);

        // unknown in index.sense, so cntlist decides; a known zero stays zero
        assert_eq!(source.tag_count("entity%1:03:00::"), Some(7));
        assert_eq!(source.tag_count("entity%1:03:01::"), Some(0));
        assert_eq!(source.tag_count("thing%1:03:00::"), None);

        let forms = source.exceptional_forms(PartOfSpeech::Noun, "Goose").unwrap();
        assert_eq!(forms.iter().collect::<Vec<_>>(), vec!["geese"]);
    }

    #[test]
    fn ili_map_aliases_satellites() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "i1\t00001740-a").unwrap();
        writeln!(file, "i2\t00002098-s").unwrap();
        writeln!(file).unwrap();
        let map = load_ili_map(file.path()).unwrap();
        assert_eq!(map.get("00001740-a").map(String::as_str), Some("i1"));
        assert_eq!(map.get("00002098-s").map(String::as_str), Some("i2"));
        assert_eq!(map.get("00002098-a").map(String::as_str), Some("i2"));

        writeln!(file, "i3 00003000-n").unwrap();
        assert!(matches!(
            load_ili_map(file.path()),
            Err(WndbError::Format { line: 4, .. })
        ));
    }
}
