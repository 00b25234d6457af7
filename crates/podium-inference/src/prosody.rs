//! Vocal stability measurement (jitter and shimmer).
//!
//! Measures period-to-period instability of the voice over one segment's
//! slice of the decoded track: jitter is the mean absolute difference of
//! consecutive pitch periods relative to the mean period, shimmer the same
//! ratio over per-period peak amplitudes. Both are returned as fractional
//! ratios; callers multiply by 100 for percentage display.
//!
//! A slice that is silent, unvoiced, or too short to hold three pitch
//! periods yields NaN — consumers are required to substitute 0.

use podium_models::speech::Prosody;

/// Lowest fundamental considered voiced.
const MIN_PITCH_HZ: f64 = 60.0;
/// Highest fundamental considered voiced.
const MAX_PITCH_HZ: f64 = 400.0;
/// Normalized autocorrelation below this counts as unvoiced.
const VOICING_THRESHOLD: f64 = 0.3;
/// Mean-square energy below this counts as silence.
const ENERGY_FLOOR: f64 = 1e-7;
/// Period estimation looks at no more than this many seconds of the slice.
const ESTIMATION_WINDOW_SEC: f64 = 2.0;

/// One segment's stability measurement, as fractional ratios.
///
/// NaN fields mean the slice could not be measured.
#[derive(Debug, Clone, Copy)]
pub struct ProsodyMeasure {
    pub jitter: f64,
    pub shimmer: f64,
}

impl ProsodyMeasure {
    /// Marker for slices that cannot be measured.
    pub fn unusable() -> Self {
        Self {
            jitter: f64::NAN,
            shimmer: f64::NAN,
        }
    }

    /// Convert to display percentages, substituting 0 for NaN.
    pub fn to_percent(self) -> Prosody {
        let clean = |v: f64| if v.is_finite() { v * 100.0 } else { 0.0 };
        Prosody {
            jitter: clean(self.jitter),
            shimmer: clean(self.shimmer),
        }
    }
}

/// Jitter/shimmer extractor over a fixed-rate PCM track.
pub struct ProsodyExtractor {
    sample_rate: u32,
}

impl ProsodyExtractor {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Measure one segment's time range of the track.
    pub fn measure(&self, samples: &[f32], start: f64, end: f64) -> ProsodyMeasure {
        let sr = self.sample_rate as f64;
        let i0 = ((start * sr).max(0.0) as usize).min(samples.len());
        let i1 = ((end * sr).max(0.0) as usize).min(samples.len());
        if i1 <= i0 {
            return ProsodyMeasure::unusable();
        }
        let slice = &samples[i0..i1];

        let min_lag = (sr / MAX_PITCH_HZ).floor() as usize;
        let max_lag = (sr / MIN_PITCH_HZ).ceil() as usize;
        if slice.len() < 3 * max_lag {
            return ProsodyMeasure::unusable();
        }

        let period = match dominant_period(slice, min_lag, max_lag, sr) {
            Some(p) => p,
            None => return ProsodyMeasure::unusable(),
        };

        let marks = mark_periods(slice, period);
        if marks.len() < 3 {
            return ProsodyMeasure::unusable();
        }

        let periods: Vec<f64> = marks.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
        let amplitudes: Vec<f64> = marks.iter().map(|&i| slice[i].abs() as f64).collect();

        ProsodyMeasure {
            jitter: relative_instability(&periods),
            shimmer: relative_instability(&amplitudes),
        }
    }
}

/// Estimate the dominant pitch period via normalized autocorrelation.
///
/// Returns None for silent or unvoiced slices.
fn dominant_period(slice: &[f32], min_lag: usize, max_lag: usize, sr: f64) -> Option<usize> {
    let window = slice.len().min((ESTIMATION_WINDOW_SEC * sr) as usize);
    let slice = &slice[..window];

    let energy: f64 = slice.iter().map(|&s| (s as f64) * (s as f64)).sum();
    if energy / slice.len() as f64 <= ENERGY_FLOOR {
        return None;
    }

    let mut best_lag = 0;
    let mut best_corr = 0.0f64;
    for lag in min_lag..=max_lag.min(slice.len() / 2) {
        let mut corr = 0.0f64;
        for i in 0..(slice.len() - lag) {
            corr += (slice[i] as f64) * (slice[i + lag] as f64);
        }
        let corr = corr / energy;
        if corr > best_corr {
            best_corr = corr;
            best_lag = lag;
        }
    }

    if best_corr >= VOICING_THRESHOLD && best_lag > 0 {
        Some(best_lag)
    } else {
        None
    }
}

/// Place one mark per pitch period at the local absolute peak.
///
/// Walks from the first peak in steps of the nominal period, snapping each
/// mark to the strongest sample within a quarter-period window so period
/// drift accumulates into the measurement instead of the walk.
fn mark_periods(slice: &[f32], period: usize) -> Vec<usize> {
    let search = (period / 4).max(1);

    let first_end = (2 * period).min(slice.len());
    let first = match peak_index(slice, 0, first_end) {
        Some(i) => i,
        None => return Vec::new(),
    };

    let mut marks = vec![first];
    loop {
        let expected = marks.last().unwrap() + period;
        let lo = expected.saturating_sub(search);
        let hi = expected + search;
        if hi >= slice.len() {
            break;
        }
        match peak_index(slice, lo, hi) {
            Some(i) => marks.push(i),
            None => break,
        }
    }
    marks
}

/// Index of the maximum absolute sample in `[lo, hi)`.
fn peak_index(slice: &[f32], lo: usize, hi: usize) -> Option<usize> {
    let hi = hi.min(slice.len());
    if lo >= hi {
        return None;
    }
    (lo..hi).max_by(|&a, &b| {
        slice[a]
            .abs()
            .partial_cmp(&slice[b].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Mean absolute consecutive difference over the mean value.
fn relative_instability(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
    if mean <= f64::EPSILON {
        return f64::NAN;
    }
    let mean_diff: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>()
        / (values.len() - 1) as f64;
    mean_diff / mean
}
