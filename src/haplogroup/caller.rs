use std::collections::{HashMap, HashSet};

use crate::haplogroup::report::NO_CALL;
use crate::haplogroup::scoring::{purity, PURITY_THRESHOLD};
use crate::haplogroup::types::{MarkerCall, State};

/// Sentinel root when no derived call survives the intermediate filter.
pub const NOT_AVAILABLE: &str = "Not-available";

/// Majority vote over derived-call haplogroup names; the first character of
/// the winning name is the top-level clade code. Counting full names rather
/// than first letters biases the vote toward better-supported deep calls.
/// Ties resolve to the name seen first in input order.
pub fn estimate_root(names: &[&str]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut best: Option<(&str, usize)> = None;
    for &name in names {
        if !seen.insert(name) {
            continue;
        }
        let count = counts[name];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((name, count));
        }
    }

    best.and_then(|(name, _)| name.chars().next())
        .map(|c| c.to_string())
}

/// Distinct candidate names in ascending order, each paired with its
/// derived-state purity, keeping only those at or above the threshold.
pub fn candidate_haplogroups(
    derived_with_root: &[&str],
    calls: &[&MarkerCall],
) -> Vec<(String, f64)> {
    let mut names: Vec<&str> = derived_with_root.to_vec();
    names.sort_unstable();
    names.dedup();

    let mut candidates = Vec::new();
    for name in names {
        let qc2 = purity(calls, name);
        if qc2 >= PURITY_THRESHOLD {
            candidates.push((name.to_string(), qc2));
        }
    }
    candidates
}

/// Resolves the candidate set to a single putative haplogroup.
///
/// Names are walked in descending order; a name is dropped when its successor
/// is not contained in it, so the surviving names form a chain back toward
/// the root. Containment is a substring check, not a strict prefix check.
/// The longest survivor wins; equal lengths resolve to the candidate seen
/// first in ascending insertion order.
pub fn select_putative(mut candidates: Vec<(String, f64)>) -> (String, f64) {
    if candidates.is_empty() {
        return (NO_CALL.to_string(), 0.0);
    }

    let mut ordered: Vec<String> = candidates.iter().map(|(name, _)| name.clone()).collect();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    for pair in ordered.windows(2) {
        if !pair[0].contains(&pair[1]) {
            candidates.retain(|(name, _)| name != &pair[0]);
        }
    }

    let mut best: Option<&(String, f64)> = None;
    for candidate in &candidates {
        if best.map_or(true, |b| candidate.0.len() > b.0.len()) {
            best = Some(candidate);
        }
    }
    match best {
        Some((name, qc2)) => (name.clone(), *qc2),
        None => (NO_CALL.to_string(), 0.0),
    }
}

/// Higher-resolution ancestral calls under the putative haplogroup. These
/// suggest the sample belongs to the putative branch excluding the listed
/// markers. Walked in table order; a call is kept only if its marker name is
/// not already a substring of the previously kept marker name.
pub fn ancestral_exceptions<'a>(
    calls: &[&'a MarkerCall],
    putative: &str,
) -> Vec<&'a MarkerCall> {
    let mut kept: Vec<&MarkerCall> = Vec::new();
    for &call in calls {
        if call.state != State::Ancestral || !call.haplogroup.starts_with(putative) {
            continue;
        }
        match kept.last() {
            Some(prev) if prev.marker_name.contains(&call.marker_name) => {}
            _ => kept.push(call),
        }
    }
    kept
}

/// Annotated label for a confident call, e.g. `J2a1-L26/etc*(xM67,M92)`.
pub fn format_label(putative: &str, markers: &[&str], exceptions: &[&MarkerCall]) -> String {
    let mut label = match markers.first() {
        Some(first) => format!("{}-{}", putative, first),
        None => putative.to_string(),
    };
    if markers.len() > 1 {
        label.push_str("/etc");
    }
    if !exceptions.is_empty() {
        let names: Vec<&str> = exceptions
            .iter()
            .map(|call| call.marker_name.as_str())
            .collect();
        label.push_str(&format!("*(x{})", names.join(",")));
    }
    label
}
