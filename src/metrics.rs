//! Cluster quality metrics: inertia (WCSS) and the silhouette coefficient.

use crate::distance::pairwise_euclidean;
use crate::error::KSelectError;
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};

/// Within-cluster sum of squared distances from each point to its assigned centroid.
pub fn inertia(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
    centroids: &ArrayView2<f64>,
) -> Result<f64, KSelectError> {
    if labels.len() != data.nrows() {
        return Err(KSelectError::InvalidLabels(format!(
            "{} labels for {} samples",
            labels.len(),
            data.nrows()
        )));
    }
    if centroids.ncols() != data.ncols() {
        return Err(KSelectError::InvalidDimensions(format!(
            "Expected {} features, got {}",
            centroids.ncols(),
            data.ncols()
        )));
    }
    if let Some(&label) = labels.iter().find(|&&l| l >= centroids.nrows()) {
        return Err(KSelectError::InvalidLabels(format!(
            "label {} out of range for {} centroids",
            label,
            centroids.nrows()
        )));
    }

    let total = data
        .rows()
        .into_iter()
        .zip(labels.iter())
        .map(|(row, &label)| {
            row.iter()
                .zip(centroids.row(label).iter())
                .map(|(&x, &c)| (x - c) * (x - c))
                .sum::<f64>()
        })
        .sum();

    Ok(total)
}

/// Silhouette coefficient of every sample, using Euclidean distance.
///
/// For a sample `i` with mean intra-cluster distance `a` and smallest mean
/// distance to another cluster `b`, the coefficient is `(b - a) / max(a, b)`.
/// Samples alone in their cluster score 0.
///
/// Labels need not be contiguous, but at least 2 and at most `n_samples - 1`
/// distinct labels must be present.
pub fn silhouette_samples(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
) -> Result<Array1<f64>, KSelectError> {
    let n_samples = data.nrows();
    if labels.len() != n_samples {
        return Err(KSelectError::InvalidLabels(format!(
            "{} labels for {} samples",
            labels.len(),
            n_samples
        )));
    }

    let mut distinct: Vec<usize> = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let n_labels = distinct.len();
    if n_labels < 2 || n_labels > n_samples.saturating_sub(1) {
        return Err(KSelectError::InvalidLabels(format!(
            "Number of labels is {}. Valid values are 2 to n_samples - 1 (inclusive)",
            n_labels
        )));
    }

    // Dense cluster index per sample, in 0..n_labels
    let dense = labels.mapv(|label| distinct.binary_search(&label).unwrap_or_else(|slot| slot));
    let mut cluster_sizes = vec![0usize; n_labels];
    for &c in dense.iter() {
        cluster_sizes[c] += 1;
    }

    let distances = pairwise_euclidean(data);
    let mut scores = Array1::<f64>::zeros(n_samples);

    Zip::from(&mut scores)
        .and(distances.rows())
        .and(&dense)
        .par_for_each(|score, row, &own| {
            if cluster_sizes[own] <= 1 {
                *score = 0.0;
                return;
            }

            // Own distance is zero, so including it in the sums is harmless
            let mut sums = vec![0.0f64; n_labels];
            for (&d, &c) in row.iter().zip(dense.iter()) {
                sums[c] += d;
            }

            let a = sums[own] / (cluster_sizes[own] - 1) as f64;
            let b = cluster_sizes
                .iter()
                .enumerate()
                .filter(|&(c, _)| c != own)
                .map(|(c, &size)| sums[c] / size as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            *score = if denom > 0.0 { (b - a) / denom } else { 0.0 };
        });

    Ok(scores)
}

/// Mean silhouette coefficient over all samples, in [-1, 1].
pub fn silhouette_score(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
) -> Result<f64, KSelectError> {
    let scores = silhouette_samples(data, labels)?;
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}
