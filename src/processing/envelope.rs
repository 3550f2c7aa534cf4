// src/processing/envelope.rs
//! Envelope extraction: rectification followed by moving-average smoothing.

/// Sample-wise absolute value.
pub fn rectify(signal: &[f64]) -> Vec<f64> {
    signal.iter().map(|x| x.abs()).collect()
}

/// Centred moving average with a "same-length" edge convention.
///
/// Output sample `i` averages the window `[i - w/2, i + (w - 1 - w/2)]`,
/// clipped at the buffer edges but always divided by `w`. Samples with
/// fewer than `w` in-range neighbours therefore taper toward zero instead
/// of being averaged over a shrunken window; this is the
/// `numpy.convolve(x, ones(w)/w, mode="same")` convention and it affects
/// event timing near the start and end of a run, so it is pinned by tests.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || window <= 1 {
        return signal.to_vec();
    }

    // Prefix sums make each output sample O(1)
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for &x in signal {
        prefix.push(prefix.last().unwrap() + x);
    }

    let left = window / 2;
    let right = window - 1 - left;
    let scale = 1.0 / window as f64;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right + 1).min(n);
            (prefix[hi] - prefix[lo]) * scale
        })
        .collect()
}

/// Rectify `filtered` and smooth it into a detection envelope.
pub fn extract_envelope(filtered: &[f64], smoothing_window: usize) -> Vec<f64> {
    moving_average(&rectify(filtered), smoothing_window)
}
