//! Shared rolling-window primitives for indicator calculations.
//!
//! Every helper works on `Option<f64>` columns: a window that is incomplete
//! or contains an undefined value produces `None`.

/// Lift a plain column into the `Option` domain.
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Apply `f` to each trailing window of `period` values.
pub fn rolling<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    (0..values.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window: Option<Vec<f64>> = values[i + 1 - period..=i].iter().copied().collect();
            window.and_then(|w| f(&w))
        })
        .collect()
}

pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn population_stddev(window: &[f64]) -> Option<f64> {
    let m = mean(window)?;
    let variance = window.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / window.len() as f64;
    Some(variance.sqrt())
}

pub fn mean_abs_deviation(window: &[f64]) -> Option<f64> {
    let m = mean(window)?;
    Some(window.iter().map(|v| (v - m).abs()).sum::<f64>() / window.len() as f64)
}

pub fn max(window: &[f64]) -> Option<f64> {
    window.iter().copied().reduce(f64::max)
}

pub fn min(window: &[f64]) -> Option<f64> {
    window.iter().copied().reduce(f64::min)
}

/// Least-squares slope of `window` against x = 0..n-1. Fewer than two points
/// have no slope and yield 0.
pub fn slope(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = window.iter().sum::<f64>() / n as f64;
    let (num, den) = window
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (x, y)| {
            let dx = x as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });
    num / den
}

pub fn sma_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, mean)
}

/// Exponential smoothing seeded with the first value, α = 2/(period+1).
///
/// Written as `prev + α·(x − prev)` so a constant input stays exactly constant.
pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period as f64 + 1.0);
    values
        .iter()
        .scan(None, |prev: &mut Option<f64>, &x| {
            let next = match *prev {
                None => x,
                Some(p) => p + alpha * (x - p),
            };
            *prev = Some(next);
            Some(next)
        })
        .collect()
}

/// Element-wise combination of two aligned columns.
pub fn zip_with<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(f64, f64) -> Option<f64>,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => f(*x, *y),
            _ => None,
        })
        .collect()
}

/// `num / den`, undefined when the denominator is zero or the result is not finite.
pub fn checked_div(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        return None;
    }
    let q = num / den;
    q.is_finite().then_some(q)
}
