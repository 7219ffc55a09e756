//! Metric declarations for the hilltop route planner.
//!
//! The library crates record through the [`metrics`] facade using the
//! constants in [`metric_defs`]. Nothing is exported unless the host installs
//! a recorder, so the calls are free in tests and in embedded use.
//!
//! ```rust
//! use hilltop_metrics::{metric_defs, Metric, MetricKind};
//!
//! assert_eq!(metric_defs::GRAPH_LINKS_SKIPPED.kind, MetricKind::Counter);
//! metrics::counter!(metric_defs::GRAPH_LINKS_SKIPPED.name).increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A value that can go up and down.
    Gauge,
    /// A distribution of observations.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// Declared as consts so that every call site shares the same name.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "hilltop.graph.links_built").
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// The unit of measurement, if any.
    pub unit: Option<Unit>,
}

impl Metric {
    /// Declares a counter.
    pub const fn counter(name: &'static str) -> Self {
        Self::new(name, MetricKind::Counter)
    }

    /// Declares a gauge.
    pub const fn gauge(name: &'static str) -> Self {
        Self::new(name, MetricKind::Gauge)
    }

    /// Declares a histogram.
    pub const fn histogram(name: &'static str) -> Self {
        Self::new(name, MetricKind::Histogram)
    }

    const fn new(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
        }
    }

    /// Sets the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => describe_counter!(self.name, unit, self.description),
            (MetricKind::Counter, None) => describe_counter!(self.name, self.description),
            (MetricKind::Gauge, Some(unit)) => describe_gauge!(self.name, unit, self.description),
            (MetricKind::Gauge, None) => describe_gauge!(self.name, self.description),
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description)
            }
            (MetricKind::Histogram, None) => describe_histogram!(self.name, self.description),
        }
    }
}

/// All metric definitions used by the planner.
pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Route Graph
    // ========================================================================

    /// Road links that produced a pair of directed edges.
    pub const GRAPH_LINKS_BUILT: Metric = Metric::counter("hilltop.graph.links_built")
        .with_description("Road links elaborated into directed edges")
        .with_unit(Unit::Count);

    /// Road links excluded because their elevation could not be sampled.
    pub const GRAPH_LINKS_SKIPPED: Metric = Metric::counter("hilltop.graph.links_skipped")
        .with_description("Road links excluded for missing elevation")
        .with_unit(Unit::Count);

    /// Wall-clock time spent building a route graph.
    pub const GRAPH_BUILD_TIME: Metric = Metric::histogram("hilltop.graph.build_time_ms")
        .with_description("Route graph build time")
        .with_unit(Unit::Milliseconds);

    // ========================================================================
    // Search
    // ========================================================================

    /// Vertices settled by a single shortest path search.
    pub const SEARCH_SETTLED: Metric = Metric::histogram("hilltop.search.settled")
        .with_description("Vertices settled per shortest path search")
        .with_unit(Unit::Count);

    /// Searches that ended without reaching the target.
    pub const SEARCH_NO_PATH: Metric = Metric::counter("hilltop.search.no_path")
        .with_description("Shortest path searches with an unreachable target")
        .with_unit(Unit::Count);

    // ========================================================================
    // Terrain
    // ========================================================================

    /// Cells inspected by the peak finder.
    pub const PEAK_CELLS_SCANNED: Metric = Metric::histogram("hilltop.peak.cells_scanned")
        .with_description("Valid cells scanned per peak query")
        .with_unit(Unit::Count);

    /// Every metric above, for [`describe_metrics`](super::describe_metrics).
    pub const ALL: &[&Metric] = &[
        &GRAPH_LINKS_BUILT,
        &GRAPH_LINKS_SKIPPED,
        &GRAPH_BUILD_TIME,
        &SEARCH_SETTLED,
        &SEARCH_NO_PATH,
        &PEAK_CELLS_SCANNED,
    ];
}

/// Describes all planner metrics. Call once after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
