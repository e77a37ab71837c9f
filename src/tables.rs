//! Fixed lookup tables of the WNDB format.
//!
//! See <https://wordnet.princeton.edu/documentation/wninput5wn> and
//! <https://wordnet.princeton.edu/documentation/lexnames5wn>.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

/// The four broad categories, one per `data.*`/`index.*`/`*.exc` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    pub fn as_char(self) -> char {
        match self {
            PartOfSpeech::Noun => 'n',
            PartOfSpeech::Verb => 'v',
            PartOfSpeech::Adjective => 'a',
            PartOfSpeech::Adverb => 'r',
        }
    }

    /// Suffix of the file names, e.g. `data.noun` or `noun.exc`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
        }
    }

    pub fn from_char(c: char) -> Option<PartOfSpeech> {
        SynsetType::from_char(c).map(SynsetType::part_of_speech)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

/// The `ss_type` of a synset. Satellites live in the adjective files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SynsetType {
    Noun,
    Verb,
    Adjective,
    Adverb,
    AdjectiveSatellite,
}

impl SynsetType {
    pub fn from_char(c: char) -> Option<SynsetType> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adjective),
            'r' => Some(SynsetType::Adverb),
            's' => Some(SynsetType::AdjectiveSatellite),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            SynsetType::Noun => 'n',
            SynsetType::Verb => 'v',
            SynsetType::Adjective => 'a',
            SynsetType::Adverb => 'r',
            SynsetType::AdjectiveSatellite => 's',
        }
    }

    /// The numeric `ss_type` used in sense keys.
    pub fn index(self) -> u8 {
        match self {
            SynsetType::Noun => 1,
            SynsetType::Verb => 2,
            SynsetType::Adjective => 3,
            SynsetType::Adverb => 4,
            SynsetType::AdjectiveSatellite => 5,
        }
    }

    pub fn from_index(idx: u8) -> Option<SynsetType> {
        match idx {
            1 => Some(SynsetType::Noun),
            2 => Some(SynsetType::Verb),
            3 => Some(SynsetType::Adjective),
            4 => Some(SynsetType::Adverb),
            5 => Some(SynsetType::AdjectiveSatellite),
            _ => None,
        }
    }

    pub fn part_of_speech(self) -> PartOfSpeech {
        match self {
            SynsetType::Noun => PartOfSpeech::Noun,
            SynsetType::Verb => PartOfSpeech::Verb,
            SynsetType::Adjective | SynsetType::AdjectiveSatellite => PartOfSpeech::Adjective,
            SynsetType::Adverb => PartOfSpeech::Adverb,
        }
    }

    pub fn is_adjective(self) -> bool {
        self.part_of_speech() == PartOfSpeech::Adjective
    }
}

impl fmt::Display for SynsetType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for SynsetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

static POINTER_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("!", "antonym"),
        ("@", "hypernym"),
        ("@i", "instance_hypernym"),
        ("~", "hyponym"),
        ("~i", "instance_hyponym"),
        ("#m", "holo_member"),
        ("#s", "holo_substance"),
        ("#p", "holo_part"),
        ("%m", "mero_member"),
        ("%s", "mero_substance"),
        ("%p", "mero_part"),
        ("=", "attribute"),
        ("+", "derivation"),
        (";c", "domain_topic"),
        ("-c", "has_domain_topic"),
        (";r", "domain_region"),
        ("-r", "has_domain_region"),
        // formerly domain usage / in domain usage
        (";u", "is_exemplified_by"),
        ("-u", "exemplifies"),
        ("*", "entails"),
        (">", "causes"),
        ("^", "also"),
        // verb group
        ("$", "similar"),
        ("&", "similar"),
        ("<", "participle"),
        ("\\", "pertainym"),
    ]
    .into_iter()
    .collect()
});

pub const SIMILAR_SYMBOL: &str = "&";

pub fn relation_name(symbol: &str) -> Option<&'static str> {
    POINTER_MAP.get(symbol).copied()
}

/// Generic verb frame templates, numbered from 1.
pub const VERB_FRAMES: [&str; 35] = [
    "Something ----s",
    "Somebody ----s",
    "It is ----ing",
    "Something is ----ing PP",
    "Something ----s something Adjective/Noun",
    "Something ----s Adjective/Noun",
    "Somebody ----s Adjective",
    "Somebody ----s something",
    "Somebody ----s somebody",
    "Something ----s somebody",
    "Something ----s something",
    "Something ----s to somebody",
    "Somebody ----s on something",
    "Somebody ----s somebody something",
    "Somebody ----s something to somebody",
    "Somebody ----s something from somebody",
    "Somebody ----s somebody with something",
    "Somebody ----s somebody of something",
    "Somebody ----s something on somebody",
    "Somebody ----s somebody PP",
    "Somebody ----s something PP",
    "Somebody ----s PP",
    "Somebody's (body part) ----s",
    "Somebody ----s somebody to INFINITIVE",
    "Somebody ----s somebody INFINITIVE",
    "Somebody ----s that CLAUSE",
    "Somebody ----s to somebody",
    "Somebody ----s to INFINITIVE",
    "Somebody ----s whether INFINITIVE",
    "Somebody ----s somebody into V-ing something",
    "Somebody ----s something with something",
    "Somebody ----s INFINITIVE",
    "Somebody ----s VERB-ing",
    "It ----s that CLAUSE",
    "Something ----s INFINITIVE",
];

pub fn verb_frame(f_num: u32) -> Option<&'static str> {
    let idx = usize::try_from(f_num).ok()?.checked_sub(1)?;
    VERB_FRAMES.get(idx).copied()
}

pub const LEXICOGRAPHER_FILES: [&str; 45] = [
    "adj.all",
    "adj.pert",
    "adv.all",
    "noun.Tops",
    "noun.act",
    "noun.animal",
    "noun.artifact",
    "noun.attribute",
    "noun.body",
    "noun.cognition",
    "noun.communication",
    "noun.event",
    "noun.feeling",
    "noun.food",
    "noun.group",
    "noun.location",
    "noun.motive",
    "noun.object",
    "noun.person",
    "noun.phenomenon",
    "noun.plant",
    "noun.possession",
    "noun.process",
    "noun.quantity",
    "noun.relation",
    "noun.shape",
    "noun.state",
    "noun.substance",
    "noun.time",
    "verb.body",
    "verb.change",
    "verb.cognition",
    "verb.communication",
    "verb.competition",
    "verb.consumption",
    "verb.contact",
    "verb.creation",
    "verb.emotion",
    "verb.motion",
    "verb.perception",
    "verb.possession",
    "verb.social",
    "verb.stative",
    "verb.weather",
    "adj.ppl",
];

pub fn lexicographer_file(lex_filenum: u32) -> Option<&'static str> {
    LEXICOGRAPHER_FILES.get(lex_filenum as usize).copied()
}

pub fn is_lexicographer_file(name: &str) -> bool {
    LEXICOGRAPHER_FILES.contains(&name)
}
