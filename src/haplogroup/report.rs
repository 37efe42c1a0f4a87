/// Column header for the prediction report, written exactly once per run.
pub const HEADER: &str = "Sample_name\tHg\tHg_marker\tQC-score\tQC-1\tQC-2\tQC-3";

/// Sentinel emitted for the haplogroup and label fields of inconclusive
/// samples.
pub const NO_CALL: &str = "NA";

/// One output record, one per processed sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub sample: String,
    pub haplogroup: String,
    pub label: String,
    pub qc_score: f64,
    pub qc1: f64,
    pub qc2: f64,
    pub qc3: f64,
}

impl SampleReport {
    /// Record for a sample where no candidate haplogroup existed at all.
    pub fn no_call(sample: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            haplogroup: NO_CALL.to_string(),
            label: NO_CALL.to_string(),
            qc_score: 0.0,
            qc1: 0.0,
            qc2: 0.0,
            qc3: 0.0,
        }
    }

    /// Inconclusive samples are collected for the end-of-run review summary.
    pub fn needs_review(&self) -> bool {
        self.haplogroup == NO_CALL
    }

    pub fn to_tsv(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.sample,
            self.haplogroup,
            self.label,
            format_score(self.qc_score),
            format_score(self.qc1),
            format_score(self.qc2),
            format_score(self.qc3)
        )
    }
}

/// Renders a score with up to three decimals, trailing zeros trimmed, so
/// reruns on unchanged input are byte-identical.
pub fn format_score(value: f64) -> String {
    let text = format!("{:.3}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
