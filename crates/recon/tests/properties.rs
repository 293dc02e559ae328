// Property-based tests for the greedy linker.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashMap;

use proptest::prelude::*;
use namelink_recon::linker::{link, LinkOptions};
use namelink_recon::model::{is_missing, Group, LinkOutcome, Record, Timepoint};
use namelink_recon::similarity::{token_sort_ratio, TokenSortRatio};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary name: mostly short words from a tiny alphabet so near-duplicates
/// are common, sometimes missing.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => r"[abc]{1,3}( [abc]{1,3}){0,2}",
        1 => Just("".to_string()),
        1 => Just("NaN".to_string()),
        1 => Just("  ".to_string()),
    ]
}

fn arb_group(timepoint: Timepoint) -> impl Strategy<Value = Group> {
    proptest::collection::vec(arb_name(), 1..12).prop_map(move |names| {
        let records = names
            .into_iter()
            .enumerate()
            .map(|(i, n)| Record::new(i, vec![n]))
            .collect();
        Group::with_records(timepoint, vec!["name".into()], records)
    })
}

fn arb_threshold() -> impl Strategy<Value = f64> {
    prop_oneof![
        2 => Just(85.0),
        1 => 0.0..=100.0f64,
    ]
}

fn run(before: &Group, after: &Group, threshold: f64) -> LinkOutcome {
    let options = LinkOptions {
        threshold,
        ..LinkOptions::default()
    };
    link(before, after, "name", &options, &TokenSortRatio).unwrap()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Every record gets a non-zero id; each id covers one record, or one
    /// Before plus one After.
    #[test]
    fn ids_unique_and_total(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
        threshold in arb_threshold(),
    ) {
        let out = run(&before, &after, threshold);

        let mut members: HashMap<u64, (usize, usize)> = HashMap::new();
        for a in &out.before {
            prop_assert!(a.id > 0);
            members.entry(a.id).or_default().0 += 1;
        }
        for a in &out.after {
            prop_assert!(a.id > 0);
            members.entry(a.id).or_default().1 += 1;
        }

        for (id, (b, a)) in &members {
            prop_assert!(
                (*b, *a) == (1, 0) || (*b, *a) == (0, 1) || (*b, *a) == (1, 1),
                "id {} shared by {} before and {} after records", id, b, a
            );
        }

        let pairs = out.state.pairs().len() as u64;
        let total = (before.len() + after.len()) as u64;
        prop_assert_eq!(out.state.ids_issued(), total - pairs);
        prop_assert_eq!(members.len() as u64, out.state.ids_issued());
    }

    /// Ids run 1..=n with no gaps.
    #[test]
    fn ids_dense_from_one(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
    ) {
        let out = run(&before, &after, 85.0);
        let mut seen: Vec<u64> = out.before.iter().chain(&out.after).map(|a| a.id).collect();
        seen.sort_unstable();
        seen.dedup();
        let expected: Vec<u64> = (1..=out.state.ids_issued()).collect();
        prop_assert_eq!(seen, expected);
    }

    /// Before ids increase with group order.
    #[test]
    fn before_ids_increase(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
    ) {
        let out = run(&before, &after, 85.0);
        for w in out.before.windows(2) {
            prop_assert!(w[0].id < w[1].id);
        }
    }

    /// Linked pairs clear the threshold and never involve a missing name.
    #[test]
    fn pairs_clear_threshold(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
        threshold in arb_threshold(),
    ) {
        let out = run(&before, &after, threshold);
        for p in out.state.pairs() {
            let b = before.records[p.before_index].value(0);
            let a = after.records[p.after_index].value(0);
            prop_assert!(!is_missing(b, "nan"));
            prop_assert!(!is_missing(a, "nan"));
            let score = token_sort_ratio(b.trim(), a.trim());
            prop_assert!(score >= threshold);
            prop_assert_eq!(score, p.score);
        }
    }

    /// Same input, same output.
    #[test]
    fn deterministic(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
        threshold in arb_threshold(),
    ) {
        let first = run(&before, &after, threshold);
        let second = run(&before, &after, threshold);
        prop_assert_eq!(first.state, second.state);
        prop_assert_eq!(first.before, second.before);
        prop_assert_eq!(first.after, second.after);
    }

    /// The output table holds every record once, sorted by id.
    #[test]
    fn output_table_sorted(
        before in arb_group(Timepoint::Before),
        after in arb_group(Timepoint::After),
    ) {
        let out = run(&before, &after, 85.0);
        let table = out.to_table("auto number");
        prop_assert_eq!(table.len(), before.len() + after.len());
        let ids: Vec<u64> = table
            .records
            .iter()
            .map(|r| r.value(1).parse().unwrap())
            .collect();
        for w in ids.windows(2) {
            prop_assert!(w[0] <= w[1]);
        }
    }
}
