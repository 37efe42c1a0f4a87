use serde::Deserialize;
use std::collections::HashSet;

/// Observed allele state for a haplogroup-defining marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum State {
    #[serde(rename = "A")]
    Ancestral,
    #[serde(rename = "D")]
    Derived,
}

impl State {
    pub fn code(&self) -> &'static str {
        match self {
            State::Ancestral => "A",
            State::Derived => "D",
        }
    }
}

/// One row of a per-sample marker-call table. Haplogroup names are
/// prefix-hierarchical: "J2a" descends from "J2" descends from "J".
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerCall {
    pub haplogroup: String,
    pub state: State,
    pub marker_name: String,
}

/// All marker calls observed for one sample.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub calls: Vec<MarkerCall>,
}

impl Sample {
    /// Normalizes raw calls: the provisional-call flag `~` is stripped from
    /// haplogroup names and rows are sorted ascending by name.
    pub fn new(name: impl Into<String>, mut calls: Vec<MarkerCall>) -> Self {
        for call in &mut calls {
            if call.haplogroup.contains('~') {
                call.haplogroup = call.haplogroup.replace('~', "");
            }
        }
        calls.sort_by(|a, b| a.haplogroup.cmp(&b.haplogroup));
        Self {
            name: name.into(),
            calls,
        }
    }

    /// Calls left after dropping intermediate tree branches.
    pub fn without_branches<'a>(&'a self, branches: &IntermediateBranches) -> Vec<&'a MarkerCall> {
        self.calls
            .iter()
            .filter(|call| !branches.contains(&call.haplogroup))
            .collect()
    }
}

/// Haplogroup names considered internal tree nodes, excluded from terminal
/// calling. Loaded once per run and shared read-only across samples.
#[derive(Debug, Default)]
pub struct IntermediateBranches(HashSet<String>);

impl IntermediateBranches {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self(names.into_iter().collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// Expected state in a per-root intermediate detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// Slash-separated alternatives, e.g. "A/D"; any observed state passes.
    Any,
    /// Compared literally against the state code.
    Literal(String),
}

impl Expected {
    pub fn parse(raw: &str) -> Self {
        if raw.contains('/') {
            Expected::Any
        } else {
            Expected::Literal(raw.to_string())
        }
    }

    pub fn accepts(&self, state: State) -> bool {
        match self {
            Expected::Any => true,
            Expected::Literal(code) => code == state.code(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailRow {
    pub haplogroup: String,
    pub expected: Expected,
}

/// Per-root intermediate consistency table. Empty when the root has no table
/// on disk, which is a valid (if QC1-degrading) situation.
#[derive(Debug, Clone, Default)]
pub struct DetailTable {
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(haplogroup: &str, state: State, marker: &str) -> MarkerCall {
        MarkerCall {
            haplogroup: haplogroup.to_string(),
            state,
            marker_name: marker.to_string(),
        }
    }

    #[test]
    fn sample_strips_provisional_flag_and_sorts() {
        let sample = Sample::new(
            "s",
            vec![
                call("J2a~", State::Derived, "M410"),
                call("J", State::Derived, "M304"),
            ],
        );
        let names: Vec<&str> = sample.calls.iter().map(|c| c.haplogroup.as_str()).collect();
        assert_eq!(names, vec!["J", "J2a"]);
    }

    #[test]
    fn branch_filter_uses_exact_names() {
        let sample = Sample::new(
            "s",
            vec![
                call("F", State::Derived, "M89"),
                call("F1", State::Derived, "P91"),
            ],
        );
        let branches = IntermediateBranches::new(vec!["F".to_string()]);
        let kept = sample.without_branches(&branches);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].haplogroup, "F1");
    }

    #[test]
    fn slash_expected_accepts_both_states() {
        let expected = Expected::parse("A/D");
        assert!(expected.accepts(State::Ancestral));
        assert!(expected.accepts(State::Derived));

        let literal = Expected::parse("D");
        assert!(literal.accepts(State::Derived));
        assert!(!literal.accepts(State::Ancestral));
    }
}
