//! Per-residue noise estimate from the plateau regions of a CEST profile.

/// Points in each baseline window.
pub const WINDOW: usize = 9;

/// Profiles shorter than this fall back to the whole-series deviation.
pub const MIN_WINDOWED_LEN: usize = WINDOW + 1;

/// Sample standard deviation (divisor `n - 1`).  `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Noise floor of one intensity series.
///
/// With at least [`MIN_WINDOWED_LEN`] points this is the smaller sample
/// deviation of the first nine points and of the nine points ending one
/// before the last; shorter series use the deviation of every point.
/// Returns `None` when fewer than two intensities are available.
pub fn noise_estimate(intensities: &[f64]) -> Option<f64> {
    let n = intensities.len();
    if n >= MIN_WINDOWED_LEN {
        let head = sample_std(&intensities[..WINDOW])?;
        let tail = sample_std(&intensities[n - WINDOW - 1..n - 1])?;
        Some(head.min(tail))
    } else {
        sample_std(intensities)
    }
}
