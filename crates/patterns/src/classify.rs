//! Detection of single-stop edits to a pattern.
//!
//! An edited stop list is accepted only when it differs from the persisted one
//! by exactly one addition, one deletion or one moved stop; anything larger
//! has to be submitted as a series of single-stop edits. The lengths alone
//! decide which kind of edit to look for.

use std::collections::HashMap;

use tracing::debug;

use crate::identifiers::StopIdentifier;
use crate::models::errors::ClassificationError;
use crate::models::types::PatternStop;
use crate::sequence;

/// How a candidate stop sequence differs from the original
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditClassification {
    NoChange,
    /// The candidate has one extra stop at `at`
    Addition { at: usize },
    /// The original stop at `at` is gone from the candidate
    Deletion { at: usize },
    /// `stop` moved from original position `from` to candidate position `to`
    Transposition {
        from: usize,
        to: usize,
        stop: StopIdentifier,
    },
}

/// Classify the edit turning `original` into `candidate`
pub fn classify(
    original: &[StopIdentifier],
    candidate: &[StopIdentifier],
) -> Result<EditClassification, ClassificationError> {
    let classification = if candidate.len() == original.len() + 1 {
        EditClassification::Addition {
            at: find_insertion(original, candidate)?,
        }
    } else if original.len() == candidate.len() + 1 {
        EditClassification::Deletion {
            at: find_insertion(candidate, original)?,
        }
    } else if original.len() == candidate.len() {
        classify_same_length(original, candidate)?
    } else {
        return Err(ClassificationError::UnsupportedEditShape {
            original_len: original.len(),
            candidate_len: candidate.len(),
        });
    };

    debug!("classified pattern stop edit: {:?}", classification);
    Ok(classification)
}

/// Order both stop lists, re-pack the candidate's sequences to 0..n-1 and
/// classify the edit.
///
/// The candidate is renumbered even when classification fails, since its
/// sequences may never have been persisted.
pub fn classify_pattern_stops(
    original: &[PatternStop],
    candidate: &mut [PatternStop],
) -> Result<EditClassification, ClassificationError> {
    let original_ids: Vec<StopIdentifier> = sequence::ordered(original.iter())
        .into_iter()
        .map(|stop| stop.stop_id.clone())
        .collect();

    sequence::sort_by_sequence(candidate);
    sequence::renumber(candidate);

    classify(&original_ids, &sequence::stop_ids(candidate))
}

/// Position at which `longer` holds the one stop that `shorter` lacks
fn find_insertion(
    shorter: &[StopIdentifier],
    longer: &[StopIdentifier],
) -> Result<usize, ClassificationError> {
    let at = shorter
        .iter()
        .zip(longer)
        .position(|(a, b)| a != b)
        .unwrap_or(shorter.len());

    // everything after the insertion point is shifted by exactly one
    match shorter[at..]
        .iter()
        .zip(&longer[at + 1..])
        .position(|(a, b)| a != b)
    {
        Some(offset) => Err(ClassificationError::MultipleDifferences { at: at + offset }),
        None => Ok(at),
    }
}

fn classify_same_length(
    original: &[StopIdentifier],
    candidate: &[StopIdentifier],
) -> Result<EditClassification, ClassificationError> {
    let Some(first) = original.iter().zip(candidate).position(|(a, b)| a != b) else {
        return Ok(EditClassification::NoChange);
    };
    let last = original
        .iter()
        .zip(candidate)
        .rposition(|(a, b)| a != b)
        .unwrap_or(first);

    let before = &original[first..=last];
    let after = &candidate[first..=last];
    let len = before.len();

    // The first divergence is either where the stop left (the rest of the
    // window slides back one place) or where it arrived (the rest slides
    // forward). When both readings fit, as for two adjacent stops swapping,
    // the stop at the first divergence is taken as the one that moved.
    if after[..len - 1] == before[1..] && after[len - 1] == before[0] {
        return Ok(EditClassification::Transposition {
            from: first,
            to: last,
            stop: original[first].clone(),
        });
    }
    if after[1..] == before[..len - 1] && after[0] == before[len - 1] {
        return Ok(EditClassification::Transposition {
            from: last,
            to: first,
            stop: original[last].clone(),
        });
    }

    if is_permutation(before, after) {
        Err(ClassificationError::AmbiguousTransposition { first, last })
    } else {
        Err(ClassificationError::MultipleDifferences { at: first })
    }
}

fn is_permutation(a: &[StopIdentifier], b: &[StopIdentifier]) -> bool {
    let mut counts: HashMap<&StopIdentifier, i64> = HashMap::new();
    for id in a {
        *counts.entry(id).or_default() += 1;
    }
    for id in b {
        *counts.entry(id).or_default() -= 1;
    }
    counts.values().all(|&count| count == 0)
}
