//! Synthetic datasets with a known cluster structure.

use crate::error::KSelectError;
use ndarray::{s, Array1, Array2, Axis};
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Where the blob centers come from
#[derive(Debug, Clone)]
pub enum Centers {
    /// This many centers, drawn uniformly inside the center box
    Random(usize),

    /// Explicit centers of shape (n_centers, n_features)
    Fixed(Array2<f64>),
}

/// Parameters for [`make_blobs`]
#[derive(Debug, Clone)]
pub struct BlobsConfig {
    /// Total number of points, split evenly over the centers
    pub n_samples: usize,

    /// Number of features. Ignored when the centers are given explicitly.
    pub n_features: usize,

    /// Random or explicit blob centers
    pub centers: Centers,

    /// Standard deviation of every blob, along every feature
    pub cluster_std: f64,

    /// Bounds (min, max) for randomly drawn centers
    pub center_box: (f64, f64),

    /// Shuffle the rows after generation
    pub shuffle: bool,

    /// Seed for the ChaCha8 stream behind centers, noise and shuffling
    pub seed: u64,
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self {
            n_samples: 300,
            n_features: 2,
            centers: Centers::Random(4),
            cluster_std: 1.0,
            center_box: (-10.0, 10.0),
            shuffle: true,
            seed: 42,
        }
    }
}

impl BlobsConfig {
    /// Set the total number of points
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Set the number of features for random centers
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    /// Set how the blob centers are chosen
    pub fn with_centers(mut self, centers: Centers) -> Self {
        self.centers = centers;
        self
    }

    /// Set the per-feature standard deviation of every blob
    pub fn with_cluster_std(mut self, cluster_std: f64) -> Self {
        self.cluster_std = cluster_std;
        self
    }

    /// Set the bounds for random centers
    pub fn with_center_box(mut self, min: f64, max: f64) -> Self {
        self.center_box = (min, max);
        self
    }

    /// Enable or disable row shuffling
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Generated blob data
#[derive(Debug, Clone, PartialEq)]
pub struct Blobs {
    /// Points of shape (n_samples, n_features)
    pub points: Array2<f64>,

    /// Index of the blob each point was drawn from
    pub labels: Array1<usize>,

    /// Blob centers of shape (n_centers, n_features)
    pub centers: Array2<f64>,
}

/// Generate isotropic Gaussian blobs.
///
/// Each point is `center + cluster_std * z` with `z` standard normal. The
/// first `n_samples % n_centers` centers receive one extra point. All
/// randomness comes from a single ChaCha8 stream seeded with `config.seed`,
/// so equal configs produce equal datasets.
pub fn make_blobs(config: &BlobsConfig) -> Result<Blobs, KSelectError> {
    if config.n_samples == 0 {
        return Err(KSelectError::InvalidDataset(
            "n_samples must be greater than 0".to_string(),
        ));
    }
    if !config.cluster_std.is_finite() || config.cluster_std <= 0.0 {
        return Err(KSelectError::InvalidDataset(format!(
            "cluster_std must be positive and finite, got {}",
            config.cluster_std
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let centers = match &config.centers {
        Centers::Random(n_centers) => {
            let (min, max) = config.center_box;
            if *n_centers == 0 || config.n_features == 0 {
                return Err(KSelectError::InvalidDataset(
                    "need at least one center and one feature".to_string(),
                ));
            }
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(KSelectError::InvalidDataset(format!(
                    "center_box ({}, {}) is empty",
                    min, max
                )));
            }
            Array2::random_using(
                (*n_centers, config.n_features),
                Uniform::new(min, max),
                &mut rng,
            )
        }
        Centers::Fixed(centers) => {
            if centers.nrows() == 0 || centers.ncols() == 0 {
                return Err(KSelectError::InvalidDataset(format!(
                    "explicit centers must be non-empty, got shape {:?}",
                    centers.shape()
                )));
            }
            if centers.iter().any(|c| !c.is_finite()) {
                return Err(KSelectError::InvalidDataset(
                    "explicit centers must be finite".to_string(),
                ));
            }
            centers.clone()
        }
    };

    let (n_centers, n_features) = centers.dim();
    let base = config.n_samples / n_centers;
    let extra = config.n_samples % n_centers;

    let mut points = Array2::<f64>::zeros((config.n_samples, n_features));
    let mut labels = Array1::<usize>::zeros(config.n_samples);

    let mut start = 0;
    for (blob_index, center) in centers.rows().into_iter().enumerate() {
        let size = base + usize::from(blob_index < extra);
        let noise: Array2<f64> = Array2::random_using((size, n_features), StandardNormal, &mut rng);
        let blob = noise * config.cluster_std + &center;

        points.slice_mut(s![start..start + size, ..]).assign(&blob);
        labels.slice_mut(s![start..start + size]).fill(blob_index);
        start += size;
    }

    if config.shuffle {
        let mut order: Vec<usize> = (0..config.n_samples).collect();
        order.shuffle(&mut rng);
        points = points.select(Axis(0), &order);
        labels = labels.select(Axis(0), &order);
    }

    tracing::debug!(
        n_samples = config.n_samples,
        n_centers,
        n_features,
        seed = config.seed,
        "generated blobs"
    );

    Ok(Blobs {
        points,
        labels,
        centers,
    })
}
