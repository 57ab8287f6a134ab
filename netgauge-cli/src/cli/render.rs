//! Human and JSON renderings of an analysis summary.

use std::io::{self, Write};

use netgauge_core::{BarSeries, ComparisonCell, ComparisonTable, GraphReport, MetricKind, MetricRow};
use serde_json::{Value, json};

use super::commands::{AnalysisSummary, ArtifactKind, OutputFormat};

const BAR_WIDTH: usize = 40;

/// Renders `summary` to `writer` in the format it requests.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &AnalysisSummary, writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Human => render_human(summary, writer),
        OutputFormat::Json => render_json(summary, writer),
    }
}

/// Formats a metric value: counts as integers, everything else to four
/// decimal places.
#[must_use]
pub fn format_metric(kind: MetricKind, row: &MetricRow) -> String {
    match kind {
        MetricKind::Nodes => row.nodes.to_string(),
        MetricKind::Edges => row.edges.to_string(),
        MetricKind::MaxDegree => row.max_degree.to_string(),
        MetricKind::Diameter => row.diameter.to_string(),
        MetricKind::KCoreNodes => row.k_core_nodes.to_string(),
        other => format!("{:.4}", row.get(other)),
    }
}

fn render_human(summary: &AnalysisSummary, mut writer: impl Write) -> io::Result<()> {
    let label_width = MetricKind::ALL
        .iter()
        .map(|kind| kind.label().len())
        .max()
        .unwrap_or(0);

    for outcome in &summary.outcomes {
        writeln!(writer, "== {} ==", outcome.name)?;
        match &outcome.result {
            Ok(report) => render_report(&mut writer, report, label_width)?,
            Err(err) => writeln!(writer, "error [{}]: {err}", err.code())?,
        }
        writeln!(writer)?;
    }

    for artifact in &summary.artifacts {
        writeln!(
            writer,
            "wrote {} for {}: {}",
            artifact_label(artifact.kind),
            artifact.source,
            artifact.path.display()
        )?;
    }

    if let Some(table) = &summary.comparison {
        if !summary.artifacts.is_empty() {
            writeln!(writer)?;
        }
        render_comparison(&mut writer, table)?;
        writeln!(writer)?;
        render_bars(&mut writer, &table.select(&summary.compare))?;
    }
    Ok(())
}

fn render_report(writer: &mut impl Write, report: &GraphReport, width: usize) -> io::Result<()> {
    let reduction = &report.reduction;
    if reduction.component_count > 1 {
        writeln!(
            writer,
            "kept largest of {} components: {} of {} nodes, {} of {} edges",
            reduction.component_count,
            report.row.nodes,
            reduction.original_nodes,
            report.row.edges,
            reduction.original_edges,
        )?;
    }
    let load = &report.load;
    if load.self_loops_dropped > 0 || load.duplicate_edges > 0 {
        writeln!(
            writer,
            "dropped {} self-loop(s) and {} duplicate edge(s)",
            load.self_loops_dropped, load.duplicate_edges,
        )?;
    }
    writeln!(writer, "{:<width$}  Value", "Metric")?;
    for kind in MetricKind::ALL {
        writeln!(writer, "{:<width$}  {}", kind.label(), format_metric(kind, &report.row))?;
    }
    if report.row.eigenvector_fallback {
        writeln!(
            writer,
            "note: eigenvector centrality did not converge; zeros were substituted"
        )?;
    }
    Ok(())
}

fn render_comparison(writer: &mut impl Write, table: &ComparisonTable) -> io::Result<()> {
    let name_width = table
        .rows()
        .iter()
        .map(|row| row.name.len())
        .chain(["File".len()])
        .max()
        .unwrap_or(0);

    write!(writer, "{:<name_width$}", "File")?;
    for kind in table.columns() {
        write!(writer, "  {}", kind.label())?;
    }
    writeln!(writer)?;

    for row in table.rows() {
        write!(writer, "{:<name_width$}", row.name)?;
        match &row.cell {
            ComparisonCell::Metrics(metrics) => {
                for &kind in table.columns() {
                    let cell_width = kind.label().len();
                    write!(writer, "  {:>cell_width$}", format_metric(kind, metrics))?;
                }
            }
            ComparisonCell::Failed(message) => write!(writer, "  failed: {message}")?,
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn render_bars(writer: &mut impl Write, series: &BarSeries) -> io::Result<()> {
    let scale = series.max_value().filter(|max| *max > 0.0);
    let label_width = series
        .metrics
        .iter()
        .map(|kind| kind.label().len())
        .max()
        .unwrap_or(0);
    let labels: Vec<&str> = series.metrics.iter().map(|kind| kind.label()).collect();
    writeln!(writer, "Comparison: {}", labels.join(", "))?;

    for group in &series.groups {
        writeln!(writer, "{}", group.name)?;
        for (kind, value) in series.metrics.iter().zip(&group.values) {
            let bar = "#".repeat(bar_length(*value, scale));
            writeln!(writer, "  {:<label_width$}  {bar} {value:.4}", kind.label())?;
        }
    }
    Ok(())
}

fn bar_length(value: f64, scale: Option<f64>) -> usize {
    match scale {
        Some(max) if value.is_finite() && value > 0.0 => {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        }
        _ => 0,
    }
}

const fn artifact_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Gml => "gml",
        ArtifactKind::SampleDot => "sample",
    }
}

fn render_json(summary: &AnalysisSummary, mut writer: impl Write) -> io::Result<()> {
    let files: Vec<Value> = summary
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(report) => json!({
                "name": outcome.name,
                "status": "ok",
                "metrics": report.row,
                "load": report.load,
                "reduction": report.reduction,
                "gml_file": report.gml_file_name(),
            }),
            Err(err) => json!({
                "name": outcome.name,
                "status": "failed",
                "code": err.code().as_str(),
                "error": err.to_string(),
            }),
        })
        .collect();

    let artifacts: Vec<Value> = summary
        .artifacts
        .iter()
        .map(|artifact| {
            json!({
                "source": artifact.source,
                "kind": artifact_label(artifact.kind),
                "path": artifact.path.display().to_string(),
            })
        })
        .collect();

    let comparison = summary.comparison.as_ref().map(|table| {
        json!({
            "table": table,
            "bars": table.select(&summary.compare),
        })
    });

    let document = json!({
        "files": files,
        "artifacts": artifacts,
        "comparison": comparison,
    });
    serde_json::to_writer_pretty(&mut writer, &document).map_err(io::Error::other)?;
    writeln!(writer)
}
