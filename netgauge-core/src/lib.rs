//! Netgauge core library.
//!
//! Loads undirected edge lists, reduces them to their largest connected
//! component, and computes a fixed battery of network metrics per graph.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analyzer;
mod builder;
mod comparison;
mod components;
mod error;
mod gml;
mod loader;
mod metrics;
mod network;
mod sample;

pub use crate::{
    analyzer::{
        Analyzer, BatchProgress, FileOutcome, GraphReport, LoadSummary, ReductionSummary,
    },
    builder::AnalyzerBuilder,
    comparison::{
        BarGroup, BarSeries, ComparisonCell, ComparisonRow, ComparisonTable, DEFAULT_COMPARISON,
    },
    components::{Reduction, connected_components, reduce_to_largest_component},
    error::{
        CentralityError, CentralityErrorCode, GmlError, GmlErrorCode, LoadError, LoadErrorCode,
        NetgaugeError, NetgaugeErrorCode, Result,
    },
    gml::{from_gml_bytes, gml_file_name, read_gml, to_gml_bytes, write_gml},
    loader::{LoadedEdgeList, load_edge_list},
    metrics::{
        DEFAULT_BETWEENNESS_SAMPLES, DEFAULT_EIGENVECTOR_MAX_ITER, DEFAULT_EIGENVECTOR_TOLERANCE,
        MetricConfig, MetricKind, MetricRow, UnknownMetric, compute_metrics,
    },
    network::{EdgeInsert, Network, NodeId},
    sample::{DEFAULT_SAMPLE_SIZE, render_sample_dot, sample},
};
