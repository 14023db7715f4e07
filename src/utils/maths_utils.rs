use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// Index of the smallest value. Non-finite values never win unless every value is non-finite.
pub fn get_min_index(vec: &[f64]) -> Option<usize> {
    if vec.is_empty() {
        return None;
    }
    let sanitized: Vec<f64> = vec
        .iter()
        .map(|&x| if x.is_finite() { x } else { f64::MAX })
        .collect();
    Some(sanitized.argmin())
}

/// Mean of the present, finite values. `None` when there are none.
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|x| x.is_finite())
        .collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().mean())
}

/// Mean of a plain slice. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Evenly spaced points from `lo` to `hi` inclusive.
/// Built from an integer counter and snapped to 9 decimals, so 0.05 * 6 is exactly 0.3.
pub fn linear_grid(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || hi < lo {
        return vec![lo];
    }
    let n_steps = ((hi - lo) / step + 1e-9).floor() as usize;
    (0..=n_steps)
        .map(|k| round_to(lo + k as f64 * step, GRID_SCALE))
        .collect()
}

const GRID_SCALE: f64 = 1e9;

// Divide by the scale: multiplying by its inverse (1e-9) reintroduces the error
fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
