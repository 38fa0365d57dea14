//! Parallel batch analysis.
//!
//! Each input is loaded and analysed independently on the rayon pool. The
//! output keeps input order, and a failing input yields a failed report in
//! its slot without affecting any other input.

use std::path::PathBuf;

use chaseprofit_core::{
    analyze, analyze_raw, AnalysisConfig, AnalysisReport, AnalysisRequest, ErrorPayload,
};
use chaseprofit_core::domain::Series;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::data_loader::{load_csv, LoadError};

/// One CSV file to analyse under a given request.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub request: AnalysisRequest,
    pub path: PathBuf,
}

impl BatchInput {
    pub fn new(request: AnalysisRequest, path: impl Into<PathBuf>) -> Self {
        Self {
            request,
            path: path.into(),
        }
    }
}

/// Load and analyse every input in parallel.
pub fn analyze_files(inputs: &[BatchInput], config: &AnalysisConfig) -> Vec<AnalysisReport> {
    let reports: Vec<AnalysisReport> = inputs
        .par_iter()
        .map(|input| match load_csv(&input.path) {
            Ok(raw) => analyze_raw(&input.request, &raw, config),
            Err(err) => {
                warn!(path = %input.path.display(), error = %err, "load failed");
                AnalysisReport::failed(&input.request, config, 0, load_error_payload(&err))
            }
        })
        .collect();
    log_summary(&reports);
    reports
}

/// Analyse already-validated series in parallel.
pub fn analyze_many(
    jobs: &[(AnalysisRequest, Series)],
    config: &AnalysisConfig,
) -> Vec<AnalysisReport> {
    let reports: Vec<AnalysisReport> = jobs
        .par_iter()
        .map(|(request, series)| analyze(request, series, config))
        .collect();
    log_summary(&reports);
    reports
}

/// Error payload for a loader failure.
pub fn load_error_payload(err: &LoadError) -> ErrorPayload {
    match err {
        LoadError::Analysis(inner) => ErrorPayload::from(inner),
        other => ErrorPayload::new(other.reason(), other.to_string()),
    }
}

fn log_summary(reports: &[AnalysisReport]) {
    let succeeded = reports.iter().filter(|r| r.success).count();
    info!(
        total = reports.len(),
        succeeded,
        failed = reports.len() - succeeded,
        "batch complete"
    );
}
