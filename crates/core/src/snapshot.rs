//! The Oricon weekly book chart captured on 2026-02-14.
//!
//! The published file was cut off inside the sixth "Light Literature" row. The
//! embedded copy ends that genre after its last complete row (rank 5); the
//! audit reports the shortfall as a short chart.

use crate::audit::audit_snapshot;
use crate::codec;
use crate::config::ChartOptions;
use crate::domain::chart::ChartSnapshot;
use anyhow::Context;
use std::sync::OnceLock;

pub const ORICON_BINDING: &str = "oricon_data";

const ORICON_LITERAL: &str = include_str!("../data/oricon_data.js");

static EMBEDDED: OnceLock<ChartSnapshot> = OnceLock::new();

/// The embedded chart in its published text form.
pub fn embedded_literal() -> &'static str {
    ORICON_LITERAL
}

/// Decodes and validates the embedded chart. Every call decodes afresh.
pub fn load_embedded() -> anyhow::Result<ChartSnapshot> {
    let decoded =
        codec::parse_js_assignment(ORICON_LITERAL).context("embedded chart failed to decode")?;
    anyhow::ensure!(
        decoded.binding.as_deref() == Some(ORICON_BINDING),
        "embedded chart is bound to {:?}, expected {ORICON_BINDING:?}",
        decoded.binding
    );
    decoded
        .raw
        .validate_and_into_snapshot()
        .context("embedded chart failed validation")
}

/// The embedded chart, decoded once and shared for the life of the process.
pub fn embedded() -> anyhow::Result<&'static ChartSnapshot> {
    if let Some(snapshot) = EMBEDDED.get() {
        return Ok(snapshot);
    }

    let snapshot = load_embedded()?;
    let options = ChartOptions::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid chart options; using defaults");
        ChartOptions::default()
    });

    tracing::info!(
        source = %snapshot.source,
        updated = %snapshot.updated,
        genres = snapshot.genres.len(),
        entries = snapshot.entry_count(),
        "loaded embedded chart"
    );
    for issue in audit_snapshot(&snapshot, &options) {
        tracing::warn!(genre = issue.genre(), %issue, "chart audit finding");
    }

    Ok(EMBEDDED.get_or_init(|| snapshot))
}
