use ndarray::parallel::prelude::*;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

/// Compute squared L2 norms for each row of a 2D array
/// Returns a 1D array where each element is the squared norm of the corresponding row
#[inline]
pub fn compute_squared_norms(data: &ArrayView2<f64>) -> Array1<f64> {
    let mut norms = Array1::<f64>::zeros(data.nrows());

    Zip::from(&mut norms)
        .and(data.rows())
        .par_for_each(|norm, row| *norm = row.dot(&row));

    norms
}

/// Find the nearest centroid for each data point in a chunk using double-chunking
///
/// Uses the identity: ||x - c||^2 = ||x||^2 + ||c||^2 - 2*x.c
///
/// # Arguments
/// * `data_chunk` - Chunk of data points (n_data, n_features)
/// * `data_norms` - Squared norms of data points (n_data,)
/// * `centroids` - All centroids (k, n_features)
/// * `centroid_norms` - Squared norms of centroids (k,)
/// * `chunk_size_centroids` - Size of centroid chunks, must be > 0
///
/// # Returns
/// * `labels` - Cluster assignments for each data point (n_data,)
/// * `distances` - Squared distance to the assigned centroid (n_data,)
///
/// Ties go to the lowest centroid index.
pub fn find_nearest_centroids_chunked(
    data_chunk: &ArrayView2<f64>,
    data_norms: &ArrayView1<f64>,
    centroids: &ArrayView2<f64>,
    centroid_norms: &ArrayView1<f64>,
    chunk_size_centroids: usize,
) -> (Array1<usize>, Array1<f64>) {
    let n_data = data_chunk.nrows();
    let k = centroids.nrows();

    let mut best_labels = Array1::<usize>::zeros(n_data);
    let mut best_dists = Array1::from_elem(n_data, f64::INFINITY);

    // Process centroids in chunks
    let mut c_start = 0;
    while c_start < k {
        let c_end = (c_start + chunk_size_centroids).min(k);
        let centroid_chunk = centroids.slice(s![c_start..c_end, ..]);
        let centroid_chunk_norms = centroid_norms.slice(s![c_start..c_end]);

        // (n_data, n_features) x (n_features, n_centroids_chunk)
        let dot_products = data_chunk.dot(&centroid_chunk.t());

        Zip::from(&mut best_labels)
            .and(&mut best_dists)
            .and(data_norms)
            .and(dot_products.rows())
            .par_for_each(|label, best_dist, &x_norm, dots| {
                for (j, (&c_norm, &dot)) in centroid_chunk_norms.iter().zip(dots.iter()).enumerate()
                {
                    // Cancellation can push this slightly below zero
                    let dist = (x_norm + c_norm - 2.0 * dot).max(0.0);

                    if dist < *best_dist {
                        *best_dist = dist;
                        *label = c_start + j;
                    }
                }
            });

        c_start = c_end;
    }

    (best_labels, best_dists)
}

/// Compute the total squared centroid shift (sum over centroids of ||new - old||^2)
///
/// Per-centroid shifts are computed in parallel but summed in index order,
/// so the result does not depend on thread scheduling.
pub fn compute_centroid_shift(
    old_centroids: &ArrayView2<f64>,
    new_centroids: &ArrayView2<f64>,
) -> f64 {
    let shifts: Vec<f64> = (0..old_centroids.nrows())
        .into_par_iter()
        .map(|i| {
            let old_c = old_centroids.row(i);
            let new_c = new_centroids.row(i);

            old_c
                .iter()
                .zip(new_c.iter())
                .map(|(&o, &n)| (n - o) * (n - o))
                .sum::<f64>()
        })
        .collect();

    shifts.iter().sum()
}

/// Compute the full matrix of Euclidean distances between the rows of `data`
///
/// The diagonal is exactly zero and the matrix is symmetric.
pub fn pairwise_euclidean(data: &ArrayView2<f64>) -> Array2<f64> {
    let n = data.nrows();
    let norms = compute_squared_norms(data);
    let gram = data.dot(&data.t());

    let mut distances = Array2::<f64>::zeros((n, n));
    distances
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            for j in 0..n {
                row[j] = if i == j {
                    0.0
                } else if j < i {
                    // Mirror the lower triangle from the same formula evaluated for (j, i)
                    (norms[j] + norms[i] - 2.0 * gram[[j, i]]).max(0.0).sqrt()
                } else {
                    (norms[i] + norms[j] - 2.0 * gram[[i, j]]).max(0.0).sqrt()
                };
            }
        });

    distances
}
