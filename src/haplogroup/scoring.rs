use std::collections::HashSet;

use crate::haplogroup::types::{DetailTable, MarkerCall, Sample, State};

/// Minimum derived-state purity for a candidate haplogroup.
pub const PURITY_THRESHOLD: f64 = 0.70;

/// Minimum composite QC score for a confident call.
pub const CONFIDENCE_THRESHOLD: f64 = 0.70;

/// Scores are reported at three decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round3(numerator as f64 / denominator as f64)
    }
}

/// QC1: agreement between the sample and the root's intermediate detail
/// table. Rows whose expected field holds slash-separated alternatives count
/// every matching call as correct. Detail rows with no matching call in the
/// sample contribute nothing. Runs over the full sample, intermediate rows
/// included.
pub fn qc1(detail: &DetailTable, sample: &Sample) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;
    for row in &detail.rows {
        let matches: Vec<&MarkerCall> = sample
            .calls
            .iter()
            .filter(|call| call.haplogroup == row.haplogroup)
            .collect();
        if matches.is_empty() {
            continue;
        }
        total += matches.len();
        correct += matches
            .iter()
            .filter(|call| row.expected.accepts(call.state))
            .count();
    }
    ratio(correct, total)
}

/// QC2: derived-state purity of one haplogroup name within the given calls,
/// `(total - ancestral) / total`.
pub fn purity(calls: &[&MarkerCall], name: &str) -> f64 {
    let total = calls.iter().filter(|call| call.haplogroup == name).count();
    let ancestral = calls
        .iter()
        .filter(|call| call.haplogroup == name && call.state == State::Ancestral)
        .count();
    ratio(total - ancestral, total)
}

/// QC3: ancestral contamination along the lineage leading to the putative
/// haplogroup. Calls whose name starts with the root code form the lineage
/// pool; of those, calls whose name is contained in the putative name are
/// lineage matches. Containment is a substring check, deliberately matching
/// the candidate-pruning semantics.
pub fn qc3(calls: &[&MarkerCall], root: &str, putative: &str) -> f64 {
    let names: HashSet<&str> = calls
        .iter()
        .map(|call| call.haplogroup.as_str())
        .filter(|name| name.starts_with(root))
        .collect();

    let mut lineage: Vec<&MarkerCall> = calls
        .iter()
        .copied()
        .filter(|call| names.contains(call.haplogroup.as_str()))
        .collect();
    lineage.sort_by(|a, b| b.haplogroup.cmp(&a.haplogroup));

    let mut matches = 0usize;
    let mut ancestral = 0usize;
    for call in lineage {
        if putative.contains(&call.haplogroup) {
            matches += 1;
            if call.state == State::Ancestral {
                ancestral += 1;
            }
        }
    }
    ratio(matches - ancestral, matches)
}
