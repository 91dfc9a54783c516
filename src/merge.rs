//! Contextual merging: resolving cross-sentence field references.
//!
//! A record with an unresolved contextual field (say, a melting point whose
//! compound was named two sentences earlier) is completed by binding the
//! nearest compatible record in the document tree. Candidates are ranked by
//! structural distance, never token distance, and binding is a clone: the
//! source record is untouched until the output filter drops it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{DocumentTree, Range, UnitId};
use crate::model::Record;

/// How to choose between candidates at equal structural distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The candidate appearing earlier in the document wins.
    DocumentOrder,
    /// A candidate after the target wins over one before it; within each
    /// side, the structurally nearer unit wins.
    PreferFollowing,
}

/// Merging behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergePolicy {
    pub tie_break: TieBreak,
    /// Upper bound on fixed-point passes. Each pass only ever adds bindings,
    /// so the loop terminates regardless, but a bound keeps worst cases flat.
    pub max_passes: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            tie_break: TieBreak::DocumentOrder,
            max_passes: 16,
        }
    }
}

/// Resolve contextual fields across a document's records.
///
/// Takes the records in document order, each attached to its owning unit.
/// Returns the surviving records: completed targets, untouched records, and
/// still-partial records whose fields found no candidate in range. Records
/// that were merged into another record are dropped from the output.
pub fn merge(tree: &DocumentTree, mut records: Vec<Record>, policy: MergePolicy) -> Vec<Record> {
    let mut merged_away = vec![false; records.len()];
    for pass in 0..policy.max_passes.max(1) {
        let mut bound_this_pass = 0usize;
        for target_index in 0..records.len() {
            let Some(target_owner) = records[target_index].owner() else {
                continue;
            };
            let pending: Vec<(String, String, Range)> = records[target_index]
                .unresolved_contextual()
                .iter()
                .filter_map(|field| match &field.kind {
                    crate::model::FieldKind::Model(model_name) => Some((
                        field.name.clone(),
                        model_name.clone(),
                        field.max_range,
                    )),
                    _ => None,
                })
                .collect();
            for (field_name, model_name, max_range) in pending {
                let best = best_candidate(
                    tree,
                    &records,
                    target_index,
                    target_owner,
                    &model_name,
                    max_range,
                    policy.tie_break,
                );
                if let Some(candidate_index) = best {
                    debug!(
                        target = %records[target_index].model().name,
                        field = %field_name,
                        source = %records[candidate_index].model().name,
                        "bound contextual field"
                    );
                    let candidate = records[candidate_index].clone();
                    records[target_index].bind_nested(&field_name, candidate);
                    merged_away[candidate_index] = true;
                    bound_this_pass += 1;
                }
            }
        }
        if bound_this_pass == 0 {
            debug!(passes = pass + 1, "contextual merging reached fixed point");
            break;
        }
    }
    records
        .into_iter()
        .zip(merged_away)
        .filter_map(|(record, consumed)| (!consumed).then_some(record))
        .collect()
}

/// The closest complete record of the wanted model within range, or `None`.
fn best_candidate(
    tree: &DocumentTree,
    records: &[Record],
    target_index: usize,
    target_owner: UnitId,
    model_name: &str,
    max_range: Range,
    tie_break: TieBreak,
) -> Option<usize> {
    let mut best: Option<(CandidateKey, usize)> = None;
    for (index, candidate) in records.iter().enumerate() {
        if index == target_index {
            continue;
        }
        if candidate.model().name != model_name || !candidate.required_fulfilled() {
            continue;
        }
        let Some(owner) = candidate.owner() else {
            continue;
        };
        let range = tree.range(target_owner, owner);
        if range > max_range {
            continue;
        }
        let key = CandidateKey::new(range, target_owner, owner, tie_break);
        match &best {
            Some((current, _)) if *current <= key => {}
            _ => best = Some((key, index)),
        }
    }
    best.map(|(_, index)| index)
}

/// Ordering key for candidates; lower is better.
///
/// Structural distance dominates. Ties fall to the policy: document order
/// takes the earliest unit, prefer-following takes units after the target
/// first, nearest-by-position within each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CandidateKey {
    range: Range,
    side: u8,
    position: usize,
}

impl CandidateKey {
    fn new(range: Range, target: UnitId, candidate: UnitId, tie_break: TieBreak) -> Self {
        match tie_break {
            TieBreak::DocumentOrder => CandidateKey {
                range,
                side: 0,
                position: candidate,
            },
            TieBreak::PreferFollowing => {
                if candidate > target {
                    CandidateKey {
                        range,
                        side: 0,
                        position: candidate - target,
                    }
                } else {
                    CandidateKey {
                        range,
                        side: 1,
                        position: target - candidate,
                    }
                }
            }
        }
    }
}
