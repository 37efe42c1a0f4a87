pub mod caller;
pub mod loader;
pub mod report;
pub mod scoring;
pub mod types;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::PredictError;
use crate::haplogroup::caller::{
    ancestral_exceptions, candidate_haplogroups, estimate_root, format_label, select_putative,
    NOT_AVAILABLE,
};
use crate::haplogroup::loader::{
    collect_sample_tables, read_intermediates, read_sample_table, DetailTables,
};
use crate::haplogroup::report::{SampleReport, HEADER, NO_CALL};
use crate::haplogroup::scoring::{qc1, qc3, round3, CONFIDENCE_THRESHOLD};
use crate::haplogroup::types::{DetailTable, IntermediateBranches, Sample, State};

/// Runs haplogroup prediction for every sample table under `input` and writes
/// one report row per sample to `output`. Reference tables are loaded once
/// and shared read-only across samples; a malformed sample table is logged
/// and skipped without aborting the batch.
pub fn predict_haplogroups(input: &Path, tables: &Path, output: &Path) -> anyhow::Result<()> {
    let sample_files = collect_sample_tables(input)?;
    let branches = read_intermediates(tables)?;
    let mut details = DetailTables::new(tables);

    let progress = ProgressBar::new(sample_files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40}] {pos}/{len} {msg}")?,
    );
    progress.set_message("Predicting haplogroups...");

    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    writeln!(writer, "{}", HEADER)?;

    let mut review = Vec::new();
    for path in &sample_files {
        let sample = match read_sample_table(path) {
            Ok(sample) => sample,
            Err(e @ PredictError::MalformedTable { .. }) => {
                progress.suspend(|| eprintln!("Warning: skipping sample: {}", e));
                progress.inc(1);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let report = evaluate_sample(&sample, &branches, &mut details);
        if report.needs_review() {
            review.push(report.sample.clone());
        }
        writeln!(writer, "{}", report.to_tsv())?;
        progress.inc(1);
    }
    writer.flush()?;
    progress.finish_with_message("Haplogroup prediction complete");

    if !review.is_empty() {
        eprintln!("Warning: following sample(s) showed discrepancies, please check output(s) manually:");
        for name in &review {
            eprintln!("\t{}", name);
        }
    }
    Ok(())
}

/// Scores one sample: root vote, detail-table lookup, then the pure scoring
/// path.
pub fn evaluate_sample(
    sample: &Sample,
    branches: &IntermediateBranches,
    details: &mut DetailTables,
) -> SampleReport {
    let vote_names: Vec<&str> = sample
        .calls
        .iter()
        .filter(|call| call.state == State::Derived && !branches.contains(&call.haplogroup))
        .map(|call| call.haplogroup.as_str())
        .collect();
    let root = estimate_root(&vote_names).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let detail = details.for_root(&root);
    call_with_detail(sample, branches, &root, detail)
}

/// The full per-sample decision path given already-resolved reference tables.
///
/// QC1 runs over the full sample; candidate names come from derived calls
/// under the root before intermediate removal, while their purity ratios,
/// QC3 and the exception annotation use the intermediate-filtered calls.
pub fn call_with_detail(
    sample: &Sample,
    branches: &IntermediateBranches,
    root: &str,
    detail: &DetailTable,
) -> SampleReport {
    let qc_one = qc1(detail, sample);

    let filtered = sample.without_branches(branches);

    let derived_with_root: Vec<&str> = sample
        .calls
        .iter()
        .filter(|call| call.state == State::Derived && call.haplogroup.starts_with(root))
        .map(|call| call.haplogroup.as_str())
        .collect();

    let candidates = candidate_haplogroups(&derived_with_root, &filtered);
    let (putative, qc_two) = select_putative(candidates);
    if putative == NO_CALL {
        return SampleReport::no_call(&sample.name);
    }

    let qc_three = qc3(&filtered, root, &putative);
    let qc_score = round3(qc_one * qc_two * qc_three);

    if qc_score < CONFIDENCE_THRESHOLD {
        return SampleReport {
            sample: sample.name.clone(),
            haplogroup: NO_CALL.to_string(),
            label: NO_CALL.to_string(),
            qc_score,
            qc1: qc_one,
            qc2: qc_two,
            qc3: qc_three,
        };
    }

    let markers: Vec<&str> = filtered
        .iter()
        .filter(|call| call.haplogroup == putative)
        .map(|call| call.marker_name.as_str())
        .collect();
    let exceptions = ancestral_exceptions(&filtered, &putative);
    let label = format_label(&putative, &markers, &exceptions);

    SampleReport {
        sample: sample.name.clone(),
        haplogroup: putative,
        label,
        qc_score,
        qc1: qc_one,
        qc2: qc_two,
        qc3: qc_three,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::types::{DetailRow, Expected, MarkerCall};

    fn call(haplogroup: &str, state: State, marker: &str) -> MarkerCall {
        MarkerCall {
            haplogroup: haplogroup.to_string(),
            state,
            marker_name: marker.to_string(),
        }
    }

    fn detail(rows: &[(&str, &str)]) -> DetailTable {
        DetailTable {
            rows: rows
                .iter()
                .map(|(haplogroup, expected)| DetailRow {
                    haplogroup: haplogroup.to_string(),
                    expected: Expected::parse(expected),
                })
                .collect(),
        }
    }

    #[test]
    fn composite_at_the_gate_is_accepted() {
        // Seven derived J2 calls and three ancestral J calls: QC1 = 1.0,
        // QC2 = 1.0 and QC3 = 7/10 = 0.7, landing exactly on the gate.
        let mut calls: Vec<MarkerCall> = (1..=7)
            .map(|i| call("J2", State::Derived, &format!("M{}", i)))
            .collect();
        for i in 1..=3 {
            calls.push(call("J", State::Ancestral, &format!("P{}", i)));
        }
        let sample = Sample::new("s", calls);
        let branches = IntermediateBranches::default();

        let report = call_with_detail(&sample, &branches, "J", &detail(&[("J2", "D")]));
        assert_eq!(report.haplogroup, "J2");
        assert_eq!(report.label, "J2-M1/etc");
        assert_eq!(report.qc_score, 0.7);
        assert_eq!((report.qc1, report.qc2, report.qc3), (1.0, 1.0, 0.7));
        assert!(!report.needs_review());
    }

    #[test]
    fn composite_below_the_gate_reports_na_with_scores() {
        // Empty detail table forces QC1 = 0, so the composite is 0 even
        // though the candidate itself is clean.
        let sample = Sample::new(
            "s",
            vec![
                call("J", State::Derived, "M1"),
                call("J2", State::Derived, "M2"),
                call("J2a", State::Derived, "M3"),
                call("J2a", State::Ancestral, "M4"),
            ],
        );
        let branches = IntermediateBranches::default();

        let report = call_with_detail(&sample, &branches, "J", &DetailTable::default());
        assert_eq!(report.haplogroup, NO_CALL);
        assert_eq!(report.label, NO_CALL);
        assert_eq!(report.qc_score, 0.0);
        assert_eq!(report.qc1, 0.0);
        assert!(report.qc2 > 0.0);
        assert!(report.needs_review());
    }

    #[test]
    fn no_derived_calls_yields_no_call() {
        let sample = Sample::new("s", vec![call("R1b", State::Ancestral, "M343")]);
        let branches = IntermediateBranches::default();
        let mut details = DetailTables::new(std::env::temp_dir().join("yhg-missing-tables"));

        let report = evaluate_sample(&sample, &branches, &mut details);
        assert_eq!(report, SampleReport::no_call("s"));
    }

    #[test]
    fn intermediate_only_derived_calls_leave_root_unavailable() {
        let sample = Sample::new("s", vec![call("F", State::Derived, "M89")]);
        let branches = IntermediateBranches::new(vec!["F".to_string()]);
        let mut details = DetailTables::new(std::env::temp_dir().join("yhg-missing-tables"));

        let report = evaluate_sample(&sample, &branches, &mut details);
        assert_eq!(report, SampleReport::no_call("s"));
    }

    #[test]
    fn exclusions_are_annotated_on_confident_calls() {
        let mut calls: Vec<MarkerCall> = (1..=4)
            .map(|i| call("J2a", State::Derived, &format!("L{}", i)))
            .collect();
        calls.push(call("J2a1", State::Ancestral, "M67"));
        let sample = Sample::new("s", calls);
        let branches = IntermediateBranches::default();

        let report = call_with_detail(&sample, &branches, "J", &detail(&[("J2a", "D")]));
        assert_eq!(report.haplogroup, "J2a");
        assert_eq!(report.label, "J2a-L1/etc*(xM67)");
    }
}
