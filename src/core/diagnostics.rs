//! Structured diagnostics collected across pipeline stages.
//!
//! Every anomaly the pipeline recovers from (unparseable cell, out-of-envelope
//! corner, degenerate area) is pushed here with its stage and row identifier,
//! so callers can count and assert on them instead of scraping log output.

use serde::Serialize;

/// How serious a diagnostic is. `Error` entries mark data the caller should
/// not trust; `Warning` entries mark recovered anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Parse,
    Correct,
    Validate,
    Geometry,
    Area,
    Filter,
    Export,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    /// Respondent id (`id_phone`) when the anomaly is row-scoped.
    pub row_id: Option<String>,
    pub message: String,
}

/// Accumulates diagnostics and mirrors each one to the `log` facade.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, stage: Stage, row_id: Option<&str>, message: String) {
        match severity {
            Severity::Info => log::info!("[{:?}] {}", stage, message),
            Severity::Warning => log::warn!("[{:?}] {}", stage, message),
            Severity::Error => log::error!("[{:?}] {}", stage, message),
        }
        self.entries.push(Diagnostic {
            severity,
            stage,
            row_id: row_id.map(|s| s.to_string()),
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count_for_stage(&self, stage: Stage) -> usize {
        self.entries.iter().filter(|d| d.stage == stage).count()
    }

    pub fn count_for_severity(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
