//! Reconciliation report types: findings, severity levels, and per-dataset aggregation.

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational count or summary.
    Info,
    /// Something worth a look that did not abort the dataset.
    Warning,
}

/// A single observation made while reconciling a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Component that produced the finding (e.g. `raw`, `split/train`).
    pub component: String,
    /// Human-readable message.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// Optional additional detail lines.
    pub details: Vec<String>,
}

impl Finding {
    /// Creates an informational finding.
    pub fn info(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
            severity: Severity::Info,
            details: Vec::new(),
        }
    }

    /// Creates a warning with additional detail lines.
    pub fn warn_with_details(
        component: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
            severity: Severity::Warning,
            details,
        }
    }

    /// Returns true if this finding is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// All findings for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    /// Dataset name.
    pub dataset: String,
    /// Findings in the order they were made.
    pub findings: Vec<Finding>,
}

impl DatasetReport {
    /// Creates an empty report for `dataset`.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            findings: Vec::new(),
        }
    }

    /// Appends a finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_warning()).count()
    }

    /// Returns true if nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}

/// Caps a detail list so one noisy dataset does not flood the output.
pub(crate) fn capped_details<I>(items: I, limit: usize) -> Vec<String>
where
    I: ExactSizeIterator<Item = String>,
{
    let total = items.len();
    let mut details: Vec<String> = items.take(limit).collect();
    if total > limit {
        details.push(format!("... and {} more", total - limit));
    }
    details
}
