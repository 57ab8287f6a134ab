//! Builder utilities for configuring the analysis pipeline.
//!
//! Collects metric approximation parameters and the sample size, and
//! validates them before an [`Analyzer`] is constructed.

use std::num::NonZeroUsize;

use crate::{
    Result,
    analyzer::Analyzer,
    error::NetgaugeError,
    metrics::MetricConfig,
    sample::DEFAULT_SAMPLE_SIZE,
};

/// Configures and constructs [`Analyzer`] instances.
///
/// # Examples
/// ```
/// use netgauge_core::AnalyzerBuilder;
///
/// let analyzer = AnalyzerBuilder::new()
///     .with_betweenness_samples(64)
///     .with_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(analyzer.metric_config().betweenness_samples, 64);
/// assert_eq!(analyzer.sample_size().get(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    metrics: MetricConfig,
    sample_size: usize,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self {
            metrics: MetricConfig::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl AnalyzerBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every metric parameter at once.
    #[must_use]
    pub fn with_metric_config(mut self, config: MetricConfig) -> Self {
        self.metrics = config;
        self
    }

    /// Overrides the number of sampled betweenness sources.
    #[must_use]
    pub fn with_betweenness_samples(mut self, samples: usize) -> Self {
        self.metrics.betweenness_samples = samples;
        self
    }

    /// Overrides the eigenvector power-iteration cap.
    #[must_use]
    pub fn with_eigenvector_max_iter(mut self, max_iter: usize) -> Self {
        self.metrics.eigenvector_max_iter = max_iter;
        self
    }

    /// Overrides the eigenvector convergence tolerance.
    #[must_use]
    pub fn with_eigenvector_tolerance(mut self, tolerance: f64) -> Self {
        self.metrics.eigenvector_tolerance = tolerance;
        self
    }

    /// Seeds the betweenness sampler so repeated runs agree.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.metrics.seed = Some(seed);
        self
    }

    /// Overrides how many nodes the visual sample keeps.
    ///
    /// # Examples
    /// ```
    /// use netgauge_core::AnalyzerBuilder;
    ///
    /// let builder = AnalyzerBuilder::new().with_sample_size(10);
    /// assert_eq!(builder.sample_size(), 10);
    /// ```
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Returns the configured metric parameters.
    #[must_use]
    pub fn metric_config(&self) -> &MetricConfig {
        &self.metrics
    }

    /// Returns the configured sample size.
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Validates the configuration and constructs an [`Analyzer`].
    ///
    /// # Errors
    /// Returns [`NetgaugeError::InvalidSampleSize`] for a zero sample size and
    /// the errors of [`MetricConfig::validate`] for bad metric parameters.
    ///
    /// # Examples
    /// ```
    /// use netgauge_core::{AnalyzerBuilder, NetgaugeErrorCode};
    ///
    /// let err = AnalyzerBuilder::new().with_sample_size(0).build().unwrap_err();
    /// assert_eq!(err.code(), NetgaugeErrorCode::InvalidSampleSize);
    /// ```
    pub fn build(self) -> Result<Analyzer> {
        self.metrics.validate()?;
        let sample_size = NonZeroUsize::new(self.sample_size).ok_or(
            NetgaugeError::InvalidSampleSize {
                got: self.sample_size,
            },
        )?;
        Ok(Analyzer::new(self.metrics, sample_size))
    }
}
