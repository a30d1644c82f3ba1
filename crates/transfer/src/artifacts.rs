//! Per-leg tables and the run summary written to an output directory.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use mga_ephemeris::format_epoch;
use mga_export::{summary, table};
use serde::Serialize;

use crate::legs::LegType;
use crate::patched_conic::{LegStateHistory, Maneuver};
use crate::pipeline::TransferReport;
use crate::reconcile::ReconciledLeg;

/// Outcome of writing one artifact file.
#[derive(Debug)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub result: io::Result<()>,
}

impl ArtifactReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Serialize)]
struct LegStatus {
    index: usize,
    departure_body: String,
    arrival_body: String,
    leg_type: LegType,
    start_epoch_s: f64,
    end_epoch_s: f64,
    start_tdb: Option<String>,
    end_tdb: Option<String>,
    analytic_samples: usize,
    numerical_samples: Option<usize>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    sequence: &'a [String],
    total_delta_v_km_s: f64,
    capture_delta_v_km_s: Option<f64>,
    departure_delta_v_km_s: Option<f64>,
    numerical_seconds: f64,
    maneuvers: &'a [Maneuver],
    legs: Vec<LegStatus>,
}

/// Write every artifact of `report` under `dir`; failures are reported per file.
pub fn write_artifacts(report: &TransferReport, dir: &Path) -> Vec<ArtifactReport> {
    let mut reports = Vec::new();
    let mut record = |path: PathBuf, result: io::Result<()>| {
        if let Err(err) = &result {
            warn!("failed to write {}: {err}", path.display());
        }
        reports.push(ArtifactReport { path, result });
    };

    for (i, analytic) in report.solution.histories.iter().enumerate() {
        let path = dir.join(format!("leg{i}_analytic.csv"));
        let result = write_history(&path, analytic);
        record(path, result);

        let Some(Ok(leg)) = report.reconciled.get(i) else {
            continue;
        };
        for (kind, history) in [
            ("forward", &leg.forward),
            ("backward", &leg.backward),
            ("numerical", &leg.merged),
        ] {
            let path = dir.join(format!("leg{i}_{kind}.csv"));
            let result = write_history(&path, history);
            record(path, result);
        }
        let path = dir.join(format!("leg{i}_dependent.csv"));
        let result = write_dependent(&path, leg);
        record(path, result);
    }

    let path = dir.join("summary.json");
    let result = summary::write_json(&path, &build_summary(report));
    record(path, result);

    let written = reports.iter().filter(|r| r.is_ok()).count();
    info!("wrote {written} of {} artifacts to {}", reports.len(), dir.display());
    reports
}

fn write_history(path: &Path, history: &LegStateHistory) -> io::Result<()> {
    let rows = history.samples.iter().map(|s| {
        let mut row = Vec::with_capacity(7);
        row.push(s.epoch_s);
        row.extend_from_slice(&s.state);
        row
    });
    table::write_rows(path, &table::state_header(), rows).map(|_| ())
}

fn write_dependent(path: &Path, leg: &ReconciledLeg) -> io::Result<()> {
    let mut header = vec!["epoch_s".to_string()];
    header.extend(
        leg.monitored_bodies
            .iter()
            .map(|b| format!("distance_{}_km", b.to_ascii_lowercase())),
    );
    let rows = leg.dependent_variables.iter().map(|sample| {
        let mut row = vec![sample.epoch_s];
        row.extend(
            leg.monitored_bodies
                .iter()
                .map(|b| sample.distances_km.get(b).copied().unwrap_or(f64::NAN)),
        );
        row
    });
    table::write_rows(path, &header, rows).map(|_| ())
}

fn build_summary(report: &TransferReport) -> RunSummary<'_> {
    let result = report.result();
    let legs = report
        .definition
        .legs
        .iter()
        .map(|leg| {
            let reconciled = report.reconciled.get(leg.index);
            LegStatus {
                index: leg.index,
                departure_body: leg.departure_body.clone(),
                arrival_body: leg.arrival_body.clone(),
                leg_type: leg.leg_type,
                start_epoch_s: leg.start_epoch_s,
                end_epoch_s: leg.end_epoch_s,
                start_tdb: format_epoch(leg.start_epoch_s).ok(),
                end_tdb: format_epoch(leg.end_epoch_s).ok(),
                analytic_samples: report
                    .solution
                    .histories
                    .get(leg.index)
                    .map_or(0, |h| h.len()),
                numerical_samples: reconciled
                    .and_then(|r| r.as_ref().ok())
                    .map(|r| r.merged.len()),
                error: reconciled
                    .and_then(|r| r.as_ref().err())
                    .map(|e| e.to_string()),
            }
        })
        .collect();
    RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        sequence: report.definition.sequence.bodies(),
        total_delta_v_km_s: result.total_delta_v_km_s,
        capture_delta_v_km_s: result.capture_delta_v(),
        departure_delta_v_km_s: result.departure_delta_v(),
        numerical_seconds: report.numerical_duration.as_secs_f64(),
        maneuvers: &result.maneuvers,
        legs,
    }
}
