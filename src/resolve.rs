//! Cross-references between decoded records: pointers, satellite heads and
//! verb frames.
//!
//! Everything here runs after all data files are decoded, as pointers may
//! target records of any part of speech.

use std::collections::HashSet;

use crate::data::{DataRecord, Frame, Pointer, Word};
use crate::error::{Result, WndbError};
use crate::ids::{sense_id, synset_id};
use crate::tables::{relation_name, verb_frame, SynsetType, SIMILAR_SYMBOL};

/// Access to decoded records by synset type and offset.
pub trait RecordLookup {
    fn record(&self, ss_type: SynsetType, offset: u32) -> Option<&DataRecord>;
}

/// Where a pointer ends up in the built lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A relation between synsets, with the target synset id.
    Synset {
        relation: &'static str,
        target: String,
    },
    /// A relation from the sense of word `source_w_num` to the target sense id.
    Sense {
        relation: &'static str,
        source_w_num: u16,
        target: String,
    },
}

impl Route {
    pub fn relation(&self) -> &'static str {
        match self {
            Route::Synset { relation, .. } | Route::Sense { relation, .. } => relation,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Route::Synset { target, .. } | Route::Sense { target, .. } => target,
        }
    }
}

/// The head word of a satellite synset: the first word of the synset its
/// single `&` pointer targets. Other synsets have no head.
pub fn satellite_head<'a, L>(record: &DataRecord, lookup: &'a L) -> Result<Option<&'a Word>>
where
    L: RecordLookup + ?Sized,
{
    if record.ss_type != SynsetType::AdjectiveSatellite {
        return Ok(None);
    }
    let unresolved = |message: String| WndbError::UnresolvedSatelliteHead {
        offset: record.offset,
        message,
    };

    let similar: Vec<&Pointer> = record
        .pointers
        .iter()
        .filter(|p| p.symbol == SIMILAR_SYMBOL && p.is_semantic())
        .collect();
    let pointer = match similar[..] {
        [pointer] => pointer,
        [] => return Err(unresolved("no similar-to pointer to a head synset".to_string())),
        _ => {
            return Err(unresolved(format!(
                "{} similar-to pointers, expected exactly one",
                similar.len()
            )))
        }
    };

    let head = lookup
        .record(pointer.ss_type, pointer.offset)
        .ok_or_else(|| {
            unresolved(format!(
                "head synset {:08}-{} does not exist",
                pointer.offset, pointer.ss_type
            ))
        })?;
    head.words
        .first()
        .map(Some)
        .ok_or_else(|| unresolved(format!("head synset {:08} has no words", head.offset)))
}

/// Maps a pointer of `record` to a synset or sense relation.
///
/// Unknown pointer symbols give [`WndbError::UnrecognizedPointer`], which
/// callers may skip. Targets that do not exist are fatal.
pub fn route_pointer<L>(
    lexicon_id: &str,
    record: &DataRecord,
    pointer: &Pointer,
    lookup: &L,
) -> Result<Route>
where
    L: RecordLookup + ?Sized,
{
    let relation =
        relation_name(&pointer.symbol).ok_or_else(|| WndbError::UnrecognizedPointer {
            symbol: pointer.symbol.clone(),
            offset: record.offset,
            ss_type: record.ss_type.as_char(),
        })?;
    let orphan = |message: String| WndbError::OrphanCrossReference {
        offset: record.offset,
        ss_type: record.ss_type.as_char(),
        message,
    };

    let target = lookup
        .record(pointer.ss_type, pointer.offset)
        .ok_or_else(|| {
            orphan(format!(
                "{} pointer to missing synset {:08}-{}",
                relation, pointer.offset, pointer.ss_type
            ))
        })?;

    if pointer.is_semantic() {
        return Ok(Route::Synset {
            relation,
            target: synset_id(lexicon_id, target.offset, target.ss_type),
        });
    }

    if record.word(pointer.source_w_num).is_none() {
        return Err(orphan(format!(
            "{} pointer from word {} but the synset has {} words",
            relation,
            pointer.source_w_num,
            record.words.len()
        )));
    }
    let target_word = target.word(pointer.target_w_num).ok_or_else(|| {
        orphan(format!(
            "{} pointer to word {} of synset {:08}-{}, which has {} words",
            relation,
            pointer.target_w_num,
            target.offset,
            target.ss_type,
            target.words.len()
        ))
    })?;
    Ok(Route::Sense {
        relation,
        source_w_num: pointer.source_w_num,
        target: sense_id(
            lexicon_id,
            &target_word.respaced(),
            target.offset,
            target.ss_type,
        ),
    })
}

/// The sense ids a verb frame applies to. `sense_ids` holds the sense of
/// each word of `record`, in word order.
pub fn frame_senses<'s>(
    record: &DataRecord,
    frame: &Frame,
    sense_ids: &'s [String],
) -> Result<Vec<&'s str>> {
    if verb_frame(frame.f_num).is_none() {
        return Err(WndbError::UnknownVerbFrame {
            f_num: frame.f_num,
            offset: record.offset,
            ss_type: record.ss_type.as_char(),
        });
    }
    if frame.w_num == 0 {
        return Ok(sense_ids.iter().map(String::as_str).collect());
    }
    usize::from(frame.w_num)
        .checked_sub(1)
        .and_then(|idx| sense_ids.get(idx))
        .map(|id| vec![id.as_str()])
        .ok_or_else(|| WndbError::OrphanCrossReference {
            offset: record.offset,
            ss_type: record.ss_type.as_char(),
            message: format!(
                "frame {} applies to word {} but the synset has {} words",
                frame.f_num,
                frame.w_num,
                sense_ids.len()
            ),
        })
}

/// Relations already emitted, keyed by relation name, source and target.
#[derive(Debug, Default)]
pub struct RelationSet(HashSet<(&'static str, String, String)>);

impl RelationSet {
    pub fn new() -> RelationSet {
        RelationSet::default()
    }

    /// Records a relation; a relation seen before is a
    /// [`WndbError::RedundantRelation`].
    pub fn insert(&mut self, relation: &'static str, source: &str, target: &str) -> Result<()> {
        if self
            .0
            .insert((relation, source.to_string(), target.to_string()))
        {
            Ok(())
        } else {
            Err(WndbError::RedundantRelation {
                relation,
                source_id: source.to_string(),
                target_id: target.to_string(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
