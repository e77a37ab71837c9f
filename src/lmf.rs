//! The lexicon graph handed to the serializer, modelled on WN-LMF.

use serde_derive::Serialize;

use crate::data::AdjPosition;
use crate::tables::{PartOfSpeech, SynsetType};

/// Lexicon metadata supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconInfo {
    pub id: String,
    pub label: String,
    pub language: String,
    pub email: String,
    pub license: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl LexiconInfo {
    pub fn new(id: &str) -> LexiconInfo {
        LexiconInfo {
            id: id.to_string(),
            label: "Unknown wordnet".to_string(),
            language: "und".to_string(),
            email: "maintainer@example.com".to_string(),
            license: "No license".to_string(),
            version: "0".to_string(),
            url: None,
            citation: None,
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lexicon {
    #[serde(flatten)]
    pub info: LexiconInfo,
    pub lexical_entries: Vec<LexicalEntry>,
    pub synsets: Vec<Synset>,
    pub syntactic_behaviours: Vec<SyntacticBehaviour>,
}

impl Lexicon {
    pub fn new(info: LexiconInfo) -> Lexicon {
        Lexicon {
            info,
            lexical_entries: Vec::new(),
            synsets: Vec::new(),
            syntactic_behaviours: Vec::new(),
        }
    }

    pub fn entry(&self, id: &str) -> Option<&LexicalEntry> {
        self.lexical_entries.iter().find(|e| e.id == id)
    }

    pub fn synset(&self, id: &str) -> Option<&Synset> {
        self.synsets.iter().find(|s| s.id == id)
    }

    pub fn senses(&self) -> impl Iterator<Item = &Sense> {
        self.lexical_entries.iter().flat_map(|e| e.senses.iter())
    }

    pub fn sense(&self, id: &str) -> Option<&Sense> {
        self.senses().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalEntry {
    pub id: String,
    pub lemma: Lemma,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<Form>,
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lemma {
    pub written_form: String,
    pub part_of_speech: PartOfSpeech,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub written_form: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub id: String,
    pub synset: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counts: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjposition: Option<AdjPosition>,
    pub lexicalized: bool,
    /// The sense key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Synset {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ili: Option<String>,
    pub part_of_speech: SynsetType,
    pub definitions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    pub lexicalized: bool,
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexfile: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    /// NLTK-style name, e.g. `dog.n.01`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub target: String,
    pub rel_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntacticBehaviour {
    pub id: String,
    pub subcategorization_frame: &'static str,
    pub senses: Vec<String>,
}
