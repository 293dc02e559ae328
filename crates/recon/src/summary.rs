use crate::model::{LinkOutcome, LinkSummary};

/// Count pairs and leftovers from a finished link.
pub fn compute_summary(outcome: &LinkOutcome) -> LinkSummary {
    let matched_pairs = outcome.state.pairs().len();

    LinkSummary {
        key_column: outcome.key_field.clone(),
        threshold: outcome.threshold,
        total_records: outcome.before.len() + outcome.after.len(),
        ids_issued: outcome.state.ids_issued(),
        matched_pairs,
        unmatched_before: outcome.before.len() - matched_pairs,
        absent_name_before: outcome.absent_before.len(),
        unmatched_after: outcome.after.len() - matched_pairs,
    }
}
