//! Conversion of WNDB databases (the `data.*`, `index.*`, `*.exc`,
//! `index.sense` and `cntlist` files of Princeton-WordNet style resources)
//! into a lexicon graph of entries, senses, synsets and relations.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! use wndb_lmf::{build_lexicon, BuildOptions, LexiconInfo, Source};
//!
//! let source = Source::load(Path::new("WordNet-3.0/dict"))?;
//! let (lexicon, diagnostics) =
//!     build_lexicon(&source, LexiconInfo::new("pwn30"), &HashMap::new(), BuildOptions::default())?;
//! println!("{} synsets, {} problems", lexicon.synsets.len(), diagnostics.total());
//! # Ok::<(), wndb_lmf::WndbError>(())
//! ```

pub mod builder;
pub mod data;
pub mod error;
pub mod gloss;
pub mod ids;
pub mod lines;
pub mod lmf;
pub mod readers;
pub mod resolve;
pub mod senseidx;
pub mod sensekey;
pub mod source;
pub mod tables;

pub use builder::{build_lexicon, BuildOptions, Diagnostics};
pub use error::{Result, WndbError};
pub use lmf::{Lexicon, LexiconInfo};
pub use source::{load_ili_map, Source};
