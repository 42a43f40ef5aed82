/// Normalized Shannon entropy of the first differences of `values`.
///
/// Differences are binned into `bins` equal-width bins over their observed
/// range (right edge inclusive; a degenerate range puts everything in one
/// bin). Entropy over the nonzero bins is divided by `ln(nonzero bins)`, or
/// by 1.0 when only one bin is occupied. Returns `None` for fewer than two
/// values.
pub fn entropy_ratio(values: &[f64], bins: usize) -> Option<f64> {
    if values.len() < 2 || bins == 0 {
        return None;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let min = diffs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = diffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for diff in &diffs {
        let idx = if width > 0.0 {
            (((diff - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    let total = diffs.len() as f64;
    let occupied: Vec<f64> = counts
        .iter()
        .filter(|c| **c > 0)
        .map(|c| *c as f64 / total)
        .collect();
    let entropy: f64 = -occupied.iter().map(|p| p * p.ln()).sum::<f64>();
    let max_entropy = if occupied.len() > 1 {
        (occupied.len() as f64).ln()
    } else {
        1.0
    };
    Some(entropy / max_entropy)
}
