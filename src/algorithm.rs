use crate::config::{InitMethod, KMeansConfig};
use crate::distance::{
    compute_centroid_shift, compute_squared_norms, find_nearest_centroids_chunked,
};
use crate::error::KSelectError;
use crate::metrics::inertia;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    pub centroids: Array2<f64>,
    pub labels: Array1<usize>,
    pub inertia: f64,
    pub n_iterations: usize,
}

/// Run k-means `config.n_init` times and keep the run with the lowest inertia.
///
/// Every run gets its own seed, drawn in order from a ChaCha8 stream seeded
/// with `config.seed`, so a model with fewer restarts replays a prefix of the
/// runs of a model with more. On ties the earlier run wins.
pub fn kmeans_with_restarts(
    data: &ArrayView2<f64>,
    config: &KMeansConfig,
) -> Result<KMeansResult, KSelectError> {
    validate(data, config)?;

    let span = tracing::debug_span!("kmeans", k = config.k, n_init = config.n_init);
    let _enter = span.enter();

    let tol = scaled_tolerance(data, config.tol);
    let data_norms = compute_squared_norms(data);

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let run_seeds: Vec<u64> = (0..config.n_init).map(|_| rng.gen()).collect();

    let mut best: Option<KMeansResult> = None;
    for (run, &seed) in run_seeds.iter().enumerate() {
        let result = kmeans_single_run(data, &data_norms.view(), config, tol, seed)?;

        tracing::debug!(
            run,
            inertia = result.inertia,
            n_iterations = result.n_iterations,
            "finished k-means run"
        );

        if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    best.ok_or_else(|| KSelectError::InvalidConfig("n_init must be greater than 0".to_string()))
}

fn validate(data: &ArrayView2<f64>, config: &KMeansConfig) -> Result<(), KSelectError> {
    let n_samples = data.nrows();
    let k = config.k;

    if k == 0 {
        return Err(KSelectError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if config.n_init == 0 {
        return Err(KSelectError::InvalidConfig(
            "n_init must be greater than 0".to_string(),
        ));
    }

    if config.chunk_size_data == 0 || config.chunk_size_centroids == 0 {
        return Err(KSelectError::InvalidConfig(
            "chunk sizes must be greater than 0".to_string(),
        ));
    }

    if data.ncols() == 0 {
        return Err(KSelectError::InvalidDimensions(
            "data must have at least one feature".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KSelectError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    Ok(())
}

/// Scale a tolerance by the mean per-feature variance of the data.
/// Negative tolerances (shift check disabled) pass through unchanged.
fn scaled_tolerance(data: &ArrayView2<f64>, tol: f64) -> f64 {
    if tol < 0.0 {
        return tol;
    }
    let mean_variance = data.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0);
    tol * mean_variance
}

/// One Lloyd run from a single initialization
fn kmeans_single_run(
    data: &ArrayView2<f64>,
    data_norms: &ArrayView1<f64>,
    config: &KMeansConfig,
    tol: f64,
    seed: u64,
) -> Result<KMeansResult, KSelectError> {
    let n_samples = data.nrows();
    let n_features = data.ncols();
    let k = config.k;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut centroids = match config.init {
        InitMethod::KMeansPlusPlus => initialize_centroids_plusplus(data, data_norms, k, &mut rng),
        InitMethod::Random => initialize_centroids_random(data, k, &mut rng),
    };

    let mut labels: Option<Array1<usize>> = None;
    let mut n_iterations = 0;

    for iteration in 0..config.max_iters {
        n_iterations = iteration + 1;

        let centroid_norms = compute_squared_norms(&centroids.view());
        let new_labels = assign_labels(
            data,
            data_norms,
            &centroids.view(),
            &centroid_norms.view(),
            config.chunk_size_data,
            config.chunk_size_centroids,
        );

        // Accumulators for new centroids
        let mut cluster_sums: Array2<f64> = Array2::zeros((k, n_features));
        let mut cluster_counts = vec![0usize; k];

        for (i, &label) in new_labels.iter().enumerate() {
            cluster_counts[label] += 1;
            for j in 0..n_features {
                cluster_sums[[label, j]] += data[[i, j]];
            }
        }

        // Compute new centroids
        let prev_centroids = centroids.clone();
        let mut empty_clusters = Vec::new();

        for (cluster_idx, &count) in cluster_counts.iter().enumerate() {
            if count > 0 {
                for j in 0..n_features {
                    centroids[[cluster_idx, j]] = cluster_sums[[cluster_idx, j]] / count as f64;
                }
            } else {
                empty_clusters.push(cluster_idx);
            }
        }

        // Reinitialize empty clusters
        if !empty_clusters.is_empty() {
            let indices: Vec<usize> = (0..n_samples).collect();
            let random_indices: Vec<usize> = indices
                .choose_multiple(&mut rng, empty_clusters.len())
                .cloned()
                .collect();

            for (&cluster_idx, &data_idx) in empty_clusters.iter().zip(random_indices.iter()) {
                centroids.row_mut(cluster_idx).assign(&data.row(data_idx));
            }

            tracing::trace!(count = empty_clusters.len(), "reinitialized empty clusters");
        }

        let labels_stable = labels.as_ref() == Some(&new_labels);
        labels = Some(new_labels);

        if labels_stable && empty_clusters.is_empty() {
            tracing::trace!(iteration, "converged: assignments unchanged");
            break;
        }

        let shift = compute_centroid_shift(&prev_centroids.view(), &centroids.view());
        tracing::trace!(iteration, shift, "lloyd iteration");

        if tol >= 0.0 && shift <= tol {
            tracing::trace!(iteration, shift, tol, "converged: centroid shift below tolerance");
            break;
        }
    }

    // Labels must describe the centroids that are returned
    let centroid_norms = compute_squared_norms(&centroids.view());
    let labels = assign_labels(
        data,
        data_norms,
        &centroids.view(),
        &centroid_norms.view(),
        config.chunk_size_data,
        config.chunk_size_centroids,
    );
    let inertia = inertia(data, &labels.view(), &centroids.view())?;

    Ok(KMeansResult {
        centroids,
        labels,
        inertia,
        n_iterations,
    })
}

/// Assign every row of `data` to its nearest centroid, processing data in chunks
fn assign_labels(
    data: &ArrayView2<f64>,
    data_norms: &ArrayView1<f64>,
    centroids: &ArrayView2<f64>,
    centroid_norms: &ArrayView1<f64>,
    chunk_size_data: usize,
    chunk_size_centroids: usize,
) -> Array1<usize> {
    let n_samples = data.nrows();
    let mut labels = Array1::<usize>::zeros(n_samples);

    let mut start_idx = 0;
    while start_idx < n_samples {
        let end_idx = (start_idx + chunk_size_data).min(n_samples);
        let data_chunk = data.slice(s![start_idx..end_idx, ..]);
        let data_chunk_norms = data_norms.slice(s![start_idx..end_idx]);

        let (chunk_labels, _) = find_nearest_centroids_chunked(
            &data_chunk,
            &data_chunk_norms,
            centroids,
            centroid_norms,
            chunk_size_centroids,
        );

        labels.slice_mut(s![start_idx..end_idx]).assign(&chunk_labels);

        start_idx = end_idx;
    }

    labels
}

/// Squared distance from every row of `data` to `point`
fn squared_distances_to(
    data: &ArrayView2<f64>,
    data_norms: &ArrayView1<f64>,
    point: &ArrayView1<f64>,
) -> Vec<f64> {
    let point_norm = point.dot(point);
    let dots = data.dot(point);

    data_norms
        .iter()
        .zip(dots.iter())
        .map(|(&x_norm, &dot)| (x_norm + point_norm - 2.0 * dot).max(0.0))
        .collect()
}

/// Initialize centroids with greedy k-means++
///
/// The first centroid is a uniformly random data point. Every following
/// centroid is the best of `2 + ln(k)` candidates sampled with probability
/// proportional to their squared distance to the closest chosen centroid,
/// where "best" means the lowest resulting potential (sum of squared
/// distances to the closest centroid).
fn initialize_centroids_plusplus(
    data: &ArrayView2<f64>,
    data_norms: &ArrayView1<f64>,
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Array2<f64> {
    let n_samples = data.nrows();
    let n_local_trials = 2 + (k as f64).ln() as usize;

    let mut centroids = Array2::<f64>::zeros((k, data.ncols()));

    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&data.row(first));

    let mut closest = squared_distances_to(data, data_norms, &data.row(first));
    let mut potential: f64 = closest.iter().sum();

    for centroid_idx in 1..k {
        let cumulative: Vec<f64> = closest
            .iter()
            .scan(0.0, |acc, &d| {
                *acc += d;
                Some(*acc)
            })
            .collect();

        let candidates: Vec<usize> = (0..n_local_trials)
            .map(|_| {
                let target = rng.gen::<f64>() * potential;
                cumulative
                    .partition_point(|&c| c < target)
                    .min(n_samples - 1)
            })
            .collect();

        let mut best: Option<(usize, f64, Vec<f64>)> = None;
        for candidate in candidates {
            let distances = squared_distances_to(data, data_norms, &data.row(candidate));
            let candidate_closest: Vec<f64> = closest
                .iter()
                .zip(distances.iter())
                .map(|(&current, &d)| current.min(d))
                .collect();
            let candidate_potential: f64 = candidate_closest.iter().sum();

            if best
                .as_ref()
                .map_or(true, |(_, best_potential, _)| candidate_potential < *best_potential)
            {
                best = Some((candidate, candidate_potential, candidate_closest));
            }
        }

        if let Some((data_idx, best_potential, best_closest)) = best {
            centroids.row_mut(centroid_idx).assign(&data.row(data_idx));
            potential = best_potential;
            closest = best_closest;
        }
    }

    centroids
}

/// Initialize centroids by randomly selecting k data points
fn initialize_centroids_random(
    data: &ArrayView2<f64>,
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Array2<f64> {
    let indices: Vec<usize> = (0..data.nrows()).collect();
    let selected: Vec<usize> = indices.choose_multiple(rng, k).cloned().collect();

    data.select(Axis(0), &selected)
}

/// Predict cluster assignments for new data using trained centroids
pub fn predict_labels(
    data: &ArrayView2<f64>,
    centroids: &ArrayView2<f64>,
    chunk_size_data: usize,
    chunk_size_centroids: usize,
) -> Array1<usize> {
    let data_norms = compute_squared_norms(data);
    let centroid_norms = compute_squared_norms(centroids);

    assign_labels(
        data,
        &data_norms.view(),
        centroids,
        &centroid_norms.view(),
        chunk_size_data,
        chunk_size_centroids,
    )
}
