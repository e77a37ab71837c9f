//! Building the lexicon graph from a loaded WNDB directory.
//!
//! Categories are processed in the order noun, verb, adjective, adverb and
//! records in file order, so ids and member lists come out the same on
//! every run. Senses of each entry are ordered by their rank in the
//! `index.*` files once their category is done; entries are ordered by id
//! at the end.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::data::{DataRecord, Word};
use crate::error::{Result, WndbError};
use crate::gloss::definition_and_examples;
use crate::ids::{entry_id, frame_id, nltk_synset_name, sense_id, synset_id};
use crate::lmf::{
    Form, Lemma, LexicalEntry, Lexicon, LexiconInfo, Relation, Sense, Synset, SyntacticBehaviour,
};
use crate::resolve::{frame_senses, route_pointer, satellite_head, RelationSet, Route};
use crate::sensekey::format_sense_key;
use crate::source::Source;
use crate::tables::{lexicographer_file, PartOfSpeech, SynsetType, VERB_FRAMES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fail on data-quality problems instead of logging them.
    pub strict: bool,
}

/// Counts of the problems that were logged and survived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub unrecognized_pointers: usize,
    pub unknown_lexicographer_files: usize,
    pub unknown_verb_frames: usize,
    pub redundant_senses: usize,
    pub redundant_relations: usize,
    /// Senses with no rank in the index files; they sort last.
    pub unranked_senses: usize,
    /// Exception list bases that match no entry.
    pub orphan_exceptions: usize,
}

impl Diagnostics {
    pub fn total(&self) -> usize {
        self.unrecognized_pointers
            + self.unknown_lexicographer_files
            + self.unknown_verb_frames
            + self.redundant_senses
            + self.redundant_relations
            + self.unranked_senses
            + self.orphan_exceptions
    }

    fn count(&mut self, err: &WndbError) {
        match err {
            WndbError::UnrecognizedPointer { .. } => self.unrecognized_pointers += 1,
            WndbError::UnknownLexicographerFile { .. } => self.unknown_lexicographer_files += 1,
            WndbError::UnknownVerbFrame { .. } => self.unknown_verb_frames += 1,
            WndbError::RedundantSense(_) => self.redundant_senses += 1,
            WndbError::RedundantRelation { .. } => self.redundant_relations += 1,
            _ => {}
        }
    }

    pub fn log_summary(&self) {
        if self.total() == 0 {
            info!("No problems found");
            return;
        }
        for (what, n) in [
            ("unrecognized pointers", self.unrecognized_pointers),
            ("unknown lexicographer files", self.unknown_lexicographer_files),
            ("unknown verb frames", self.unknown_verb_frames),
            ("redundant senses", self.redundant_senses),
            ("redundant relations", self.redundant_relations),
            ("senses without a rank", self.unranked_senses),
            ("orphan exceptional forms", self.orphan_exceptions),
        ] {
            if n > 0 {
                warn!("{} {}", n, what);
            }
        }
    }
}

/// Builds the lexicon for `source`. `ili_map` maps `offset-type` keys such
/// as `00001740-a` to ILI ids.
pub fn build_lexicon(
    source: &Source,
    info: LexiconInfo,
    ili_map: &HashMap<String, String>,
    options: BuildOptions,
) -> Result<(Lexicon, Diagnostics)> {
    let mut builder = LexiconBuilder::new(source, info, ili_map, options);
    for pos in PartOfSpeech::ALL {
        builder.add_category(pos)?;
    }
    builder.finish()
}

struct LexiconBuilder<'a> {
    source: &'a Source,
    ili_map: &'a HashMap<String, String>,
    options: BuildOptions,
    lexicon: Lexicon,
    diagnostics: Diagnostics,
    relations: RelationSet,
    /// Entry id to position in `lexicon.lexical_entries`.
    entries: HashMap<String, usize>,
    /// Exception bases that found an entry.
    used_bases: HashSet<(PartOfSpeech, String)>,
    frame_members: Vec<HashSet<String>>,
    /// Sense rank by sense id, for the category being built.
    ranks: HashMap<String, u32>,
}

impl<'a> LexiconBuilder<'a> {
    fn new(
        source: &'a Source,
        info: LexiconInfo,
        ili_map: &'a HashMap<String, String>,
        options: BuildOptions,
    ) -> LexiconBuilder<'a> {
        let mut lexicon = Lexicon::new(info);
        lexicon.syntactic_behaviours = VERB_FRAMES
            .iter()
            .enumerate()
            .map(|(idx, frame)| SyntacticBehaviour {
                id: frame_id(idx as u32 + 1),
                subcategorization_frame: *frame,
                senses: Vec::new(),
            })
            .collect();
        LexiconBuilder {
            source,
            ili_map,
            options,
            lexicon,
            diagnostics: Diagnostics::default(),
            relations: RelationSet::new(),
            entries: HashMap::new(),
            used_bases: HashSet::new(),
            frame_members: vec![HashSet::new(); VERB_FRAMES.len()],
            ranks: HashMap::new(),
        }
    }

    /// Passes recoverable errors through as `None` after logging them,
    /// unless running strict.
    fn recover<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() && !self.options.strict => {
                warn!("{}", err);
                self.diagnostics.count(&err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn add_category(&mut self, pos: PartOfSpeech) -> Result<()> {
        let source = self.source;
        let file = match source.data_file(pos) {
            Some(file) => file,
            None => return Ok(()),
        };
        info!("Building {} synsets from {}", file.len(), file.path.display());
        let first_entry = self.lexicon.lexical_entries.len();
        self.ranks.clear();
        for record in file.records() {
            self.add_record(pos, record)?;
        }

        debug!("Sorting senses");
        let ranks = &self.ranks;
        for entry in &mut self.lexicon.lexical_entries[first_entry..] {
            entry
                .senses
                .sort_by_key(|sense| ranks.get(&sense.id).copied().unwrap_or(u32::MAX));
        }
        Ok(())
    }

    fn add_record(&mut self, pos: PartOfSpeech, record: &DataRecord) -> Result<()> {
        let lex_id = self.lexicon.info.id.clone();
        let ssid = synset_id(&lex_id, record.offset, record.ss_type);
        let mut synset = self.make_synset(&ssid, pos, record)?;
        let head = satellite_head(record, self.source)?;

        // (entry, sense) position of each word's sense
        let mut word_senses: Vec<(usize, usize)> = Vec::with_capacity(record.words.len());
        let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
        for word in &record.words {
            let written_form = word.respaced();
            let id = sense_id(&lex_id, &written_form, record.offset, record.ss_type);
            if let Some(loc) = seen.get(&id).copied() {
                self.recover::<()>(Err(WndbError::RedundantSense(id)))?;
                word_senses.push(loc);
                continue;
            }

            let entry_idx = self.entry(pos, word);
            let sense_key = format_sense_key(
                &word.lemma(),
                record.ss_type.index(),
                record.lex_filenum,
                word.lex_id,
                &head.map(Word::lemma).unwrap_or_default(),
                head.map_or(0, |h| h.lex_id),
            );
            let rank = match self.source.sense_rank(pos, &word.lemma(), record.offset) {
                Some(rank) => rank,
                None => {
                    warn!("no sense number for {} in {}", word.word, ssid);
                    self.diagnostics.unranked_senses += 1;
                    u32::MAX
                }
            };
            let sense = Sense {
                id: id.clone(),
                synset: ssid.clone(),
                relations: Vec::new(),
                counts: self
                    .source
                    .tag_count(&sense_key)
                    .filter(|count| *count > 0)
                    .into_iter()
                    .collect(),
                adjposition: word.adjposition,
                lexicalized: true,
                identifier: Some(sense_key),
            };

            let senses = &mut self.lexicon.lexical_entries[entry_idx].senses;
            senses.push(sense);
            let loc = (entry_idx, senses.len() - 1);
            synset.members.push(id.clone());
            self.ranks.insert(id.clone(), rank);
            seen.insert(id, loc);
            word_senses.push(loc);
        }

        for pointer in &record.pointers {
            let route = match self.recover(route_pointer(&lex_id, record, pointer, self.source))? {
                Some(route) => route,
                None => continue,
            };
            match route {
                Route::Synset { relation, target } => {
                    if self.is_new_relation(relation, &ssid, &target)? {
                        synset.relations.push(Relation {
                            target,
                            rel_type: relation,
                        });
                    }
                }
                Route::Sense {
                    relation,
                    source_w_num,
                    target,
                } => {
                    // the resolver checked the word number
                    let (e, s) = word_senses[usize::from(source_w_num) - 1];
                    let source_id = self.lexicon.lexical_entries[e].senses[s].id.clone();
                    if self.is_new_relation(relation, &source_id, &target)? {
                        self.lexicon.lexical_entries[e].senses[s]
                            .relations
                            .push(Relation {
                                target,
                                rel_type: relation,
                            });
                    }
                }
            }
        }

        if !record.frames.is_empty() {
            let sense_ids: Vec<String> = word_senses
                .iter()
                .map(|(e, s)| self.lexicon.lexical_entries[*e].senses[*s].id.clone())
                .collect();
            for frame in &record.frames {
                let senses = match self.recover(frame_senses(record, frame, &sense_ids))? {
                    Some(senses) => senses,
                    None => continue,
                };
                let idx = frame.f_num as usize - 1;
                for id in senses {
                    if self.frame_members[idx].insert(id.to_string()) {
                        self.lexicon.syntactic_behaviours[idx]
                            .senses
                            .push(id.to_string());
                    }
                }
            }
        }

        self.lexicon.synsets.push(synset);
        Ok(())
    }

    fn is_new_relation(&mut self, relation: &'static str, source: &str, target: &str) -> Result<bool> {
        let inserted = self.relations.insert(relation, source, target);
        Ok(self.recover(inserted)?.is_some())
    }

    fn make_synset(&mut self, ssid: &str, pos: PartOfSpeech, record: &DataRecord) -> Result<Synset> {
        let lexfile = match lexicographer_file(record.lex_filenum) {
            Some(name) => Some(name),
            None => {
                self.recover::<()>(Err(WndbError::UnknownLexicographerFile {
                    lex_filenum: record.lex_filenum,
                    offset: record.offset,
                    ss_type: record.ss_type.as_char(),
                }))?;
                None
            }
        };
        let gloss = definition_and_examples(&record.gloss);
        let identifier = record.words.first().and_then(|word| {
            self.source
                .sense_rank(pos, &word.lemma(), record.offset)
                .map(|rank| nltk_synset_name(&word.word, record.ss_type, rank))
        });
        Ok(Synset {
            id: ssid.to_string(),
            ili: self.ili(record.offset, record.ss_type),
            part_of_speech: record.ss_type,
            definitions: if gloss.definition.is_empty() {
                Vec::new()
            } else {
                vec![gloss.definition]
            },
            examples: gloss.examples,
            lexicalized: true,
            members: Vec::new(),
            lexfile,
            relations: Vec::new(),
            identifier,
        })
    }

    fn ili(&self, offset: u32, ss_type: SynsetType) -> Option<String> {
        let key = format!("{:08}-{}", offset, ss_type);
        self.ili_map
            .get(&key)
            .or_else(|| {
                if ss_type == SynsetType::AdjectiveSatellite {
                    self.ili_map.get(&format!("{:08}-a", offset))
                } else {
                    None
                }
            })
            .cloned()
    }

    /// Position of the entry for `word`, created with its exceptional forms
    /// on first use.
    fn entry(&mut self, pos: PartOfSpeech, word: &Word) -> usize {
        let written_form = word.respaced();
        let id = entry_id(&self.lexicon.info.id, &written_form, pos);
        if let Some(idx) = self.entries.get(&id) {
            return *idx;
        }

        let base = word.lemma();
        let forms = self
            .source
            .exceptional_forms(pos, &base)
            .map(|forms| {
                forms
                    .iter()
                    .map(|form| Form {
                        written_form: form.replace('_', " "),
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.used_bases.insert((pos, base));

        let idx = self.lexicon.lexical_entries.len();
        self.lexicon.lexical_entries.push(LexicalEntry {
            id: id.clone(),
            lemma: Lemma {
                written_form,
                part_of_speech: pos,
            },
            forms,
            senses: Vec::new(),
        });
        self.entries.insert(id, idx);
        idx
    }

    fn finish(mut self) -> Result<(Lexicon, Diagnostics)> {
        for pos in PartOfSpeech::ALL {
            let exceptions = match self.source.exceptions(pos) {
                Some(exceptions) => exceptions,
                None => continue,
            };
            let mut orphans: Vec<&String> = exceptions
                .keys()
                .filter(|base| !self.used_bases.contains(&(pos, base.to_string())))
                .collect();
            orphans.sort();
            for base in &orphans {
                debug!("exceptional forms of {} ({}) have no entry", base, pos);
            }
            self.diagnostics.orphan_exceptions += orphans.len();
        }

        info!("Sorting {} entries", self.lexicon.lexical_entries.len());
        self.lexicon
            .lexical_entries
            .sort_by(|a, b| a.id.cmp(&b.id));
        Ok((self.lexicon, self.diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const DATA_NOUN: &str = "  1 This software and database is being provided to you
00002000 03 n 02 ability 0 power 3 01 @ 00003000 n 0000 | possession of the qualities required to do something; \"he has the ability to play\"
00003000 03 n 01 power 0 00 | possession of controlling influence
00004000 03 n 02 thing 0 thing 1 00 | a separate and self-contained entity
";
    const DATA_VERB: &str = "00002325 29 v 02 breathe 0 respire 1 01 + 00002000 n 0101 02 + 02 00 + 08 01 | draw air into, and expel out of, the lungs\n";
    const DATA_ADJ: &str = "00001740 00 a 02 comptable 0 wheelchair 0 03 @ 00002000 n 0102 @ 00002000 n 0102 & 00002098 s 0000 | able to do something; \"she was able to swim\"
00002098 00 s 01 capable(p) 1 01 & 00001740 a 0000 | having capacity
";
    const DATA_ADV: &str = "00000100 02 r 01 a.m. 0 01 ?? 00002000 n 0000 | before noon
00000200 45 r 01 early 0 00 |
";

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn wndb_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        write(path, "data.noun", DATA_NOUN);
        write(path, "data.verb", DATA_VERB);
        write(path, "data.adj", DATA_ADJ);
        write(path, "data.adv", DATA_ADV);
        write(
            path,
            "index.noun",
            "ability n 1 1 @ 1 1 00002000\npower n 2 1 @ 2 1 00003000 00002000\nthing n 1 0 1 0 00004000\n",
        );
        write(
            path,
            "index.verb",
            "breathe v 1 1 + 1 1 00002325\nrespire v 1 0 1 0 00002325\n",
        );
        write(
            path,
            "index.adj",
            "capable a 1 1 & 1 0 00002098\ncomptable a 1 1 @ 1 0 00001740\nwheelchair a 1 1 @ 1 0 00001740\n",
        );
        write(path, "index.adv", "a.m. r 1 0 1 0 00000100\n");
        write(path, "noun.exc", "abilities ability\ngeese goose\n");
        write(path, "verb.exc", "breathed breathe\n");
        write(path, "adj.exc", "");
        write(path, "adv.exc", "");
        write(
            path,
            "index.sense",
            "ability%1:03:00:: 00002000 1 5\npower%1:03:03:: 00002000 2 0\ncapable%5:00:01:comptable:00 00002098 1\n",
        );
        write(path, "cntlist", "4 capable%5:00:01:comptable:00 1\n");
        dir
    }

    fn build(dir: &Path, options: BuildOptions) -> Result<(Lexicon, Diagnostics)> {
        let source = Source::load(dir)?;
        let ili_map: HashMap<String, String> = [("00001740-a", "i1"), ("00002098-a", "i2")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        build_lexicon(&source, LexiconInfo::new("test"), &ili_map, options)
    }

    #[test]
    fn builds_lexicon() {
        let dir = wndb_dir();
        let (lexicon, diagnostics) = build(dir.path(), BuildOptions::default()).unwrap();

        assert_eq!(lexicon.synsets.len(), 8);
        assert_eq!(lexicon.syntactic_behaviours.len(), 35);
        let ids: Vec<&str> = lexicon.lexical_entries.iter().map(|e| e.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 10);

        let able = lexicon.synset("test-00001740-a").unwrap();
        assert_eq!(able.definitions, vec!["able to do something"]);
        assert_eq!(able.examples, vec!["she was able to swim"]);
        assert_eq!(able.ili.as_deref(), Some("i1"));
        assert_eq!(able.lexfile, Some("adj.all"));
        assert_eq!(
            able.members,
            vec!["test-comptable-00001740-a", "test-wheelchair-00001740-a"]
        );
        assert_eq!(
            able.relations,
            vec![Relation {
                target: "test-00002098-s".to_string(),
                rel_type: "similar",
            }]
        );

        let comptable = lexicon.sense("test-comptable-00001740-a").unwrap();
        assert_eq!(
            comptable.relations,
            vec![Relation {
                target: "test-power-00002000-n".to_string(),
                rel_type: "hypernym",
            }]
        );
        assert_eq!(diagnostics.redundant_relations, 1);

        let ability = lexicon.synset("test-00002000-n").unwrap();
        assert_eq!(ability.identifier.as_deref(), Some("ability.n.01"));
        assert_eq!(ability.examples, vec!["he has the ability to play"]);
    }

    #[test]
    fn satellites() {
        let dir = wndb_dir();
        let (lexicon, _) = build(dir.path(), BuildOptions::default()).unwrap();
        let synset = lexicon.synset("test-00002098-s").unwrap();
        assert_eq!(synset.ili.as_deref(), Some("i2"));
        assert_eq!(synset.identifier.as_deref(), Some("capable.s.01"));

        let sense = lexicon.sense("test-capable-00002098-s").unwrap();
        assert_eq!(
            sense.identifier.as_deref(),
            Some("capable%5:00:01:comptable:00")
        );
        assert_eq!(sense.adjposition, Some(crate::data::AdjPosition::Predicative));
        // no count in index.sense, so it comes from cntlist
        assert_eq!(sense.counts, vec![4]);
    }

    #[test]
    fn senses_follow_index_ranks() {
        let dir = wndb_dir();
        let (lexicon, _) = build(dir.path(), BuildOptions::default()).unwrap();
        let power = lexicon.entry("test-power-n").unwrap();
        let ids: Vec<&str> = power.senses.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["test-power-00003000-n", "test-power-00002000-n"]);
        // a zero count is not emitted
        assert!(power.senses[1].counts.is_empty());

        let ability = lexicon.sense("test-ability-00002000-n").unwrap();
        assert_eq!(ability.counts, vec![5]);
        assert_eq!(ability.identifier.as_deref(), Some("ability%1:03:00::"));
    }

    #[test]
    fn frames_and_forms() {
        let dir = wndb_dir();
        let (lexicon, diagnostics) = build(dir.path(), BuildOptions::default()).unwrap();
        assert_eq!(
            lexicon.syntactic_behaviours[1].senses,
            vec!["test-breathe-00002325-v", "test-respire-00002325-v"]
        );
        assert_eq!(lexicon.syntactic_behaviours[7].id, "frame-8");
        assert_eq!(
            lexicon.syntactic_behaviours[7].senses,
            vec!["test-breathe-00002325-v"]
        );

        let breathe = lexicon.entry("test-breathe-v").unwrap();
        assert_eq!(
            breathe.forms,
            vec![Form {
                written_form: "breathed".to_string()
            }]
        );
        assert_eq!(
            breathe.senses[0].relations,
            vec![Relation {
                target: "test-ability-00002000-n".to_string(),
                rel_type: "derivation",
            }]
        );
        assert_eq!(diagnostics.orphan_exceptions, 1);
    }

    #[test]
    fn noise_is_counted() {
        let dir = wndb_dir();
        let (lexicon, diagnostics) = build(dir.path(), BuildOptions::default()).unwrap();
        assert_eq!(
            diagnostics,
            Diagnostics {
                unrecognized_pointers: 1,
                unknown_lexicographer_files: 1,
                unknown_verb_frames: 0,
                redundant_senses: 1,
                redundant_relations: 1,
                unranked_senses: 1,
                orphan_exceptions: 1,
            }
        );
        assert_eq!(diagnostics.total(), 6);

        let thing = lexicon.synset("test-00004000-n").unwrap();
        assert_eq!(thing.members, vec!["test-thing-00004000-n"]);
        let early = lexicon.synset("test-00000200-r").unwrap();
        assert!(early.definitions.is_empty());
        assert_eq!(early.lexfile, None);
        assert!(lexicon.synset("test-00000100-r").unwrap().relations.is_empty());
    }

    #[test]
    fn strict_mode_fails_on_noise() {
        let dir = wndb_dir();
        match build(dir.path(), BuildOptions { strict: true }) {
            // the repeated word of the noun synset comes first
            Err(WndbError::RedundantSense(id)) => assert_eq!(id, "test-thing-00004000-n"),
            other => panic!("expected a redundant sense, got {:?}", other.map(|_| ())),
        }

        write(
            dir.path(),
            "data.noun",
            &DATA_NOUN.replace("thing 0 thing 1", "thing 0 object 1"),
        );
        match build(dir.path(), BuildOptions { strict: true }) {
            Err(WndbError::RedundantRelation { relation, source_id, .. }) => {
                assert_eq!(relation, "hypernym");
                assert_eq!(source_id, "test-comptable-00001740-a");
            }
            other => panic!("expected a redundant relation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn strict_mode_fails_on_unknown_symbols_and_lexfiles() {
        let dir = wndb_dir();
        write(
            dir.path(),
            "data.noun",
            &DATA_NOUN.replace("thing 0 thing 1", "thing 0 object 1"),
        );
        write(
            dir.path(),
            "data.adj",
            &DATA_ADJ.replace("03 @ 00002000 n 0102 @ 00002000 n 0102", "02 @ 00002000 n 0102"),
        );
        match build(dir.path(), BuildOptions { strict: true }) {
            Err(WndbError::UnrecognizedPointer { symbol, offset, ss_type }) => {
                assert_eq!(symbol, "??");
                assert_eq!((offset, ss_type), (100, 'r'));
            }
            other => panic!("expected an unrecognized pointer, got {:?}", other.map(|_| ())),
        }

        write(
            dir.path(),
            "data.adv",
            &DATA_ADV.replace("01 ?? 00002000 n 0000", "00"),
        );
        match build(dir.path(), BuildOptions { strict: true }) {
            Err(WndbError::UnknownLexicographerFile { lex_filenum, offset, .. }) => {
                assert_eq!((lex_filenum, offset), (45, 200));
            }
            other => panic!("expected an unknown lexfile, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unresolved_satellite_is_fatal() {
        let dir = wndb_dir();
        write(
            dir.path(),
            "data.adj",
            "00001740 00 a 01 comptable 0 00 | able\n00002098 00 s 01 capable 1 00 | having capacity\n",
        );
        match build(dir.path(), BuildOptions::default()) {
            Err(WndbError::UnresolvedSatelliteHead { offset, .. }) => assert_eq!(offset, 2098),
            other => panic!("expected an unresolved head, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn orphan_frames_are_fatal() {
        let dir = wndb_dir();
        write(
            dir.path(),
            "data.verb",
            "00002325 29 v 01 breathe 0 00 01 + 02 02 | draw air\n",
        );
        assert!(matches!(
            build(dir.path(), BuildOptions::default()),
            Err(WndbError::OrphanCrossReference { .. })
        ));
    }
}
