use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WndbError>;

/// Everything that can go wrong while reading a WNDB database and building
/// a lexicon from it.
///
/// Whether an error stops the conversion is decided by the caller, see
/// [`WndbError::is_recoverable`].
#[derive(Debug, Error)]
pub enum WndbError {
    #[error("{}:{line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("file not found or is not a regular file: {}", .0.display())]
    MissingRequiredFile(PathBuf),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("synset {offset:08}-{ss_type}: unrecognized pointer symbol {symbol:?}")]
    UnrecognizedPointer {
        symbol: String,
        offset: u32,
        ss_type: char,
    },

    #[error("synset {offset:08}-{ss_type}: unknown lexicographer file number {lex_filenum}")]
    UnknownLexicographerFile {
        lex_filenum: u32,
        offset: u32,
        ss_type: char,
    },

    #[error("synset {offset:08}-{ss_type}: unknown verb frame {f_num}")]
    UnknownVerbFrame { f_num: u32, offset: u32, ss_type: char },

    #[error("synset {offset:08}-{ss_type}: {message}")]
    OrphanCrossReference {
        offset: u32,
        ss_type: char,
        message: String,
    },

    #[error("satellite synset {offset:08}-s: {message}")]
    UnresolvedSatelliteHead { offset: u32, message: String },

    #[error("synset {offset:08}-{ss_type} is defined more than once in {}", .path.display())]
    DuplicateSynset {
        offset: u32,
        ss_type: char,
        path: PathBuf,
    },

    #[error("redundant sense {0}")]
    RedundantSense(String),

    #[error("redundant {relation} relation from {source_id} to {target_id}")]
    RedundantRelation {
        relation: &'static str,
        source_id: String,
        target_id: String,
    },

    #[error("invalid sense key {0:?}")]
    InvalidSenseKey(String),
}

impl WndbError {
    /// Data-quality noise that the conversion reports and survives, unless
    /// it runs in strict mode.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WndbError::UnrecognizedPointer { .. }
                | WndbError::UnknownLexicographerFile { .. }
                | WndbError::UnknownVerbFrame { .. }
                | WndbError::RedundantSense(_)
                | WndbError::RedundantRelation { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> WndbError {
        WndbError::Io {
            path: path.into(),
            source,
        }
    }
}
