use crate::config::MadZeroPolicy;

/// Consistency constant relating MAD to the standard deviation.
const MAD_SCALE: f64 = 0.6745;
/// Consistency constant relating mean absolute deviation to the standard deviation.
const MEAN_AD_SCALE: f64 = 1.253314;

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Median absolute deviation around the median.
pub fn median_absolute_deviation(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Robust z-score per value, in input order.
///
/// `0.6745 |x − median| / MAD`. With MAD = 0 the policy decides: score
/// against the mean absolute deviation, or score everything 0.
pub fn modified_z_scores(values: &[f64], policy: MadZeroPolicy) -> Vec<f64> {
    let (Some(center), Some(mad)) = (median(values), median_absolute_deviation(values)) else {
        return Vec::new();
    };
    if mad > 0.0 {
        return values
            .iter()
            .map(|v| MAD_SCALE * (v - center).abs() / mad)
            .collect();
    }

    let mean_ad = values.iter().map(|v| (v - center).abs()).sum::<f64>() / values.len() as f64;
    match policy {
        MadZeroPolicy::MeanAbsoluteDeviation if mean_ad > 0.0 => values
            .iter()
            .map(|v| (v - center).abs() / (MEAN_AD_SCALE * mean_ad))
            .collect(),
        _ => vec![0.0; values.len()],
    }
}

/// Indices whose modified z-score exceeds `threshold`.
pub fn outlier_indices(values: &[f64], threshold: f64, policy: MadZeroPolicy) -> Vec<usize> {
    modified_z_scores(values, policy)
        .iter()
        .enumerate()
        .filter(|(_, z)| **z > threshold)
        .map(|(i, _)| i)
        .collect()
}
