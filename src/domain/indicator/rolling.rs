//! Trailing-window helpers shared by the indicators.
//!
//! Every helper uses the same window: the `period` values ending at (and
//! including) the current index. The result is `None` until the window is
//! full, and `None` whenever any value inside the window is `None`.
//!
//! Means and variances are accumulated as deviations from the window's first
//! value, so a constant window yields exactly that value and a zero spread.

pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, window_mean)
}

pub fn rolling_sum(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().sum())
}

pub fn rolling_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MIN, f64::max))
}

pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MAX, f64::min))
}

/// Population standard deviation (divides by N).
pub fn rolling_stddev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| {
        let n = w.len() as f64;
        let x0 = w[0];
        let offset = w.iter().map(|x| x - x0).sum::<f64>() / n;
        let variance = w
            .iter()
            .map(|x| {
                let d = (x - x0) - offset;
                d * d
            })
            .sum::<f64>()
            / n;
        variance.sqrt()
    })
}

/// Mean of a non-empty window, shifted by its first value.
pub fn window_mean(window: &[f64]) -> f64 {
    let x0 = window[0];
    x0 + window.iter().map(|x| x - x0).sum::<f64>() / window.len() as f64
}

/// Wrap plain values so they can feed the rolling helpers.
pub fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

fn rolling<F>(values: &[Option<f64>], period: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = Vec::with_capacity(values.len());
    let mut window: Vec<f64> = Vec::with_capacity(period);

    for i in 0..values.len() {
        if period == 0 || i + 1 < period {
            out.push(None);
            continue;
        }

        window.clear();
        let complete = values[i + 1 - period..=i].iter().all(|v| match v {
            Some(x) => {
                window.push(*x);
                true
            }
            None => false,
        });

        out.push(if complete { Some(reduce(&window)) } else { None });
    }

    out
}
