//! Side-by-side comparison of metric rows across a batch.

use serde::Serialize;

use crate::{
    analyzer::FileOutcome,
    metrics::{MetricKind, MetricRow},
};

/// Metrics plotted when the caller selects none.
pub const DEFAULT_COMPARISON: [MetricKind; 2] = [MetricKind::AvgDegree, MetricKind::ClusteringCoef];

/// Contents of one file's slot in a [`ComparisonTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonCell {
    /// The file was processed and produced this row.
    Metrics(MetricRow),
    /// Processing failed; carries the rendered error.
    Failed(String),
}

/// One file's row in a [`ComparisonTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// File name the row is keyed by.
    pub name: String,
    /// Metrics, or the failure that replaced them.
    pub cell: ComparisonCell,
}

impl ComparisonRow {
    /// The metric row, when the file succeeded.
    #[must_use]
    pub fn metrics(&self) -> Option<&MetricRow> {
        match &self.cell {
            ComparisonCell::Metrics(row) => Some(row),
            ComparisonCell::Failed(_) => None,
        }
    }
}

/// Metric rows for every file of a batch, in input order.
///
/// A table only exists when at least two files produced metrics; failed
/// files keep their slot so the row order always matches the input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Builds a table from rows, returning `None` unless two or more of them
    /// hold metrics.
    ///
    /// # Examples
    /// ```
    /// use netgauge_core::{ComparisonCell, ComparisonRow, ComparisonTable};
    ///
    /// let rows = vec![ComparisonRow {
    ///     name: "broken.txt".into(),
    ///     cell: ComparisonCell::Failed("bad line".into()),
    /// }];
    /// assert!(ComparisonTable::new(rows).is_none());
    /// ```
    #[must_use]
    pub fn new(rows: Vec<ComparisonRow>) -> Option<Self> {
        let succeeded = rows.iter().filter(|row| row.metrics().is_some()).count();
        (succeeded >= 2).then_some(Self { rows })
    }

    /// Builds a table from batch outcomes; see [`ComparisonTable::new`].
    #[must_use]
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Option<Self> {
        let rows = outcomes
            .iter()
            .map(|outcome| ComparisonRow {
                name: outcome.name.clone(),
                cell: match &outcome.result {
                    Ok(report) => ComparisonCell::Metrics(report.row.clone()),
                    Err(err) => ComparisonCell::Failed(err.to_string()),
                },
            })
            .collect();
        Self::new(rows)
    }

    /// Metric columns, identical for every row.
    #[must_use]
    pub fn columns(&self) -> &'static [MetricKind] {
        &MetricKind::ALL
    }

    /// Rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// Extracts the chosen metric columns for a grouped bar comparison.
    ///
    /// An empty selection uses [`DEFAULT_COMPARISON`]. Failed files are left
    /// out of the series.
    #[must_use]
    pub fn select(&self, metrics: &[MetricKind]) -> BarSeries {
        let metrics = if metrics.is_empty() {
            DEFAULT_COMPARISON.to_vec()
        } else {
            metrics.to_vec()
        };
        let groups = self
            .rows
            .iter()
            .filter_map(|row| {
                row.metrics().map(|values| BarGroup {
                    name: row.name.clone(),
                    values: metrics.iter().map(|&kind| values.get(kind)).collect(),
                })
            })
            .collect();
        BarSeries { metrics, groups }
    }
}

/// Selected metric columns across the successful files of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    /// Selected metrics, one bar per metric within each group.
    pub metrics: Vec<MetricKind>,
    /// One group per successful file, in input order.
    pub groups: Vec<BarGroup>,
}

/// One file's bars in a [`BarSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    /// File name.
    pub name: String,
    /// Values aligned with [`BarSeries::metrics`].
    pub values: Vec<f64>,
}

impl BarSeries {
    /// Largest finite value in the series, used to scale bars.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.groups
            .iter()
            .flat_map(|group| group.values.iter().copied())
            .filter(|value| value.is_finite())
            .reduce(f64::max)
    }
}
