//! Greedy one-to-one linking of Before records to After records.
//!
//! Before records are visited in group order. Each takes the highest-scoring
//! unconsumed After record whose score clears the threshold; on equal scores
//! the earlier After record wins. The result depends on Before order: an
//! early record can claim an After record a later one would have scored
//! higher against. After records never claimed get their own identifiers
//! in a final sweep.

use crate::error::ReconError;
use crate::model::{
    candidate_name, Annotated, Group, LinkOutcome, MatchState, MatchedPair, Table, Timepoint,
};
use crate::similarity::Similarity;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkOptions {
    /// Inclusive lower bound, 0-100.
    pub threshold: f64,
    pub missing_sentinel: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            threshold: crate::config::DEFAULT_THRESHOLD,
            missing_sentinel: crate::config::DEFAULT_MISSING_SENTINEL.into(),
        }
    }
}

/// Link two groups on `key_field`, issuing identifiers from 1.
///
/// Fails before issuing anything if the threshold is off the 0-100 scale,
/// either group is empty, or a group lacks the key field.
pub fn link<S: Similarity + ?Sized>(
    before: &Group,
    after: &Group,
    key_field: &str,
    options: &LinkOptions,
    similarity: &S,
) -> Result<LinkOutcome, ReconError> {
    if !(0.0..=100.0).contains(&options.threshold) {
        return Err(ReconError::InvalidThreshold(options.threshold));
    }
    if before.is_empty() {
        return Err(ReconError::EmptyGroup {
            timepoint: Timepoint::Before,
        });
    }
    if after.is_empty() {
        return Err(ReconError::EmptyGroup {
            timepoint: Timepoint::After,
        });
    }

    let missing_key = || ReconError::MissingColumn {
        column: key_field.into(),
    };
    let before_key = before.column_index(key_field).ok_or_else(missing_key)?;
    let after_key = after.column_index(key_field).ok_or_else(missing_key)?;

    let sentinel = options.missing_sentinel.as_str();
    let after_names: Vec<Option<&str>> = after
        .records
        .iter()
        .map(|r| candidate_name(r.value(after_key), sentinel))
        .collect();

    let mut consumed = vec![false; after.len()];
    let mut state = MatchState::new(before.len(), after.len());
    let mut absent_before = Vec::new();

    for (bi, record) in before.records.iter().enumerate() {
        let Some(before_name) = candidate_name(record.value(before_key), sentinel) else {
            let id = state.issue();
            state.assign_before(bi, id);
            absent_before.push(bi);
            log::info!("No name for baseline row {} (ID: {id})", record.position + 1);
            continue;
        };

        let best = best_candidate(
            before_name,
            &after_names,
            &consumed,
            options.threshold,
            similarity,
        );

        let id = state.issue();
        state.assign_before(bi, id);

        match best {
            Some((ai, score)) => {
                consumed[ai] = true;
                state.assign_after(ai, id);
                state.record_pair(MatchedPair {
                    id,
                    before_index: bi,
                    after_index: ai,
                    before_position: record.position,
                    after_position: after.records[ai].position,
                    score,
                });
                log::info!(
                    "Match found (score: {score:.1}): '{before_name}' -> '{}' (ID: {id})",
                    after_names[ai].unwrap_or_default()
                );
            }
            None => {
                log::info!("No match for baseline: '{before_name}' (ID: {id})");
            }
        }
    }

    for (ai, record) in after.records.iter().enumerate() {
        if consumed[ai] {
            continue;
        }
        let id = state.issue();
        state.assign_after(ai, id);
        log::info!(
            "No match for endline: '{}' (ID: {id})",
            record.value(after_key).trim()
        );
    }

    let before_out = annotate(before, state.before_ids());
    let after_out = annotate(after, state.after_ids());

    Ok(LinkOutcome {
        state,
        before: before_out,
        after: after_out,
        key_field: key_field.into(),
        threshold: options.threshold,
        headers: before.headers.clone(),
        absent_before,
    })
}

/// Best unconsumed After candidate for one Before name.
///
/// A candidate replaces the current best only on a strictly higher score
/// that also clears the threshold. The running best starts at 0, so a
/// zero score never links even with a zero threshold.
fn best_candidate<S: Similarity + ?Sized>(
    before_name: &str,
    after_names: &[Option<&str>],
    consumed: &[bool],
    threshold: f64,
    similarity: &S,
) -> Option<(usize, f64)> {
    let mut best: Option<usize> = None;
    let mut best_score = 0.0;

    for (ai, candidate) in after_names.iter().enumerate() {
        if consumed[ai] {
            continue;
        }
        let Some(after_name) = candidate else {
            continue;
        };

        let score = similarity.score(before_name, after_name);
        if score >= threshold && score > best_score {
            best = Some(ai);
            best_score = score;
        }
    }

    best.map(|ai| (ai, best_score))
}

fn annotate(group: &Group, ids: &[u64]) -> Vec<Annotated> {
    group
        .records
        .iter()
        .zip(ids)
        .map(|(record, &id)| Annotated {
            record: record.clone(),
            id,
        })
        .collect()
}

impl LinkOutcome {
    /// Combined output table: every record plus an identifier column, sorted
    /// by identifier. Within one identifier the Before record comes first.
    pub fn to_table(&self, id_column: &str) -> Table {
        let mut rows: Vec<(u64, &Annotated)> = self
            .before
            .iter()
            .chain(self.after.iter())
            .map(|a| (a.id, a))
            .collect();
        rows.sort_by_key(|(id, _)| *id);

        let mut headers = self.headers.clone();
        headers.push(id_column.to_string());

        let rows = rows
            .into_iter()
            .map(|(id, a)| {
                let mut values = a.record.values.clone();
                values.resize(self.headers.len(), String::new());
                values.push(id.to_string());
                values
            })
            .collect();

        Table::new(headers, rows)
    }
}
