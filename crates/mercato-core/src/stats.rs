//! # Statistics Module
//!
//! The small set of descriptive statistics the forecasting code needs:
//! arithmetic mean, sample standard deviation and the coefficient of
//! variation used as an (inverse) confidence proxy.
//!
//! ## Confidence From Variability
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  daily revenues: [100, 100, 100]  →  stdev 0   →  CV 0%   →  conf 100   │
//! │  daily revenues: [10, 200, 40]    →  stdev big →  CV huge →  conf 0     │
//! │                                                                         │
//! │  confidence = clamp(100 - CV, 0, 100)                                   │
//! │                                                                         │
//! │  Steady sales make extrapolation trustworthy; erratic sales do not.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// Undefined for fewer than two points; returns 0 in that case so the
/// coefficient of variation degrades to 0 rather than NaN.
pub fn sample_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Coefficient of variation in percent: `stdev / mean * 100`.
///
/// Returns 100 when the mean is non-positive — a degenerate series gets the
/// worst possible score instead of a division by zero.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m <= 0.0 {
        return 100.0;
    }
    sample_stdev(values) * 100.0 / m
}

/// Forecast confidence: `100 - CV`, clamped to `[0, 100]`.
pub fn confidence_from_cv(cv: f64) -> f64 {
    (100.0 - cv).clamp(0.0, 100.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
