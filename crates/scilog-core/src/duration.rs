//! Cycle duration derivation.
//!
//! The device never reports a duration field directly. The best source
//! is the parsed cycle log's CYCLE COMPLETE mark; failing that, the
//! sample count of the temperature series gives an estimate (samples
//! arrive on a roughly 5-second cadence); failing both, a conservative
//! 30-minute placeholder is used. The provenance travels with the value
//! so callers never present an estimate as a measurement.

use scilog_types::{CycleTelemetry, ParsedCycleLog};

/// Fallback duration when neither the log nor the series is usable.
pub const DEFAULT_CYCLE_MINUTES: u32 = 30;

/// Approximate sampling interval of the telemetry series.
const SECONDS_PER_SAMPLE: u32 = 5;

/// Where a duration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    /// The CYCLE COMPLETE mark of a successfully parsed cycle log.
    CycleLog,
    /// Estimated from temperature-series sample density.
    SampleDensity,
    /// The fixed placeholder; no usable data was present.
    Default,
}

/// A cycle duration with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimate {
    /// Duration in minutes.
    pub minutes: u32,
    /// How the value was derived.
    pub source: DurationSource,
}

impl DurationEstimate {
    /// Whether the value was read from the device's own log rather than
    /// estimated.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        matches!(self.source, DurationSource::CycleLog)
    }
}

/// Derive a cycle's duration from its telemetry.
#[must_use]
pub fn cycle_duration(telemetry: &CycleTelemetry) -> DurationEstimate {
    if let Some(log) = ParsedCycleLog::parse(&telemetry.raw_log) {
        if let Some(minutes) = log.cycle_complete {
            return DurationEstimate {
                minutes,
                source: DurationSource::CycleLog,
            };
        }
    }

    let samples = sample_count(&telemetry.temperature_series);
    if samples > 0 {
        return DurationEstimate {
            minutes: density_minutes(samples),
            source: DurationSource::SampleDensity,
        };
    }

    DurationEstimate {
        minutes: DEFAULT_CYCLE_MINUTES,
        source: DurationSource::Default,
    }
}

/// Minutes implied by a sample count at the fixed cadence, saturating
/// rather than wrapping on absurd counts.
fn density_minutes(samples: usize) -> u32 {
    u32::try_from(samples)
        .unwrap_or(u32::MAX)
        .saturating_mul(SECONDS_PER_SAMPLE)
        .div_ceil(60)
}

/// Count samples in a series delimited by comma or whitespace, whichever
/// the payload uses.
fn sample_count(series: &str) -> usize {
    let series = series.trim();
    if series.is_empty() {
        return 0;
    }
    if series.contains(',') {
        series.split(',').filter(|s| !s.trim().is_empty()).count()
    } else {
        series.split_whitespace().count()
    }
}
