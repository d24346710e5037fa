/// Centroid initialization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMethod {
    /// Greedy k-means++ seeding: spreads the initial centroids apart
    #[default]
    KMeansPlusPlus,

    /// k distinct data points chosen uniformly at random
    Random,
}

/// Configuration for the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Centroid initialization strategy
    pub init: InitMethod,

    /// Number of independent runs. The run with the lowest inertia is kept.
    pub n_init: usize,

    /// Maximum number of Lloyd iterations per run
    pub max_iters: usize,

    /// Convergence tolerance, relative to the mean per-feature variance of the data.
    /// When the total squared centroid shift is below the scaled threshold,
    /// the run stops early. Set to a negative value to disable this check; a run
    /// still stops as soon as the assignments no longer change.
    pub tol: f64,

    /// Random seed for centroid initialization and restarts
    pub seed: u64,

    /// Chunk size for data processing. Larger values use more memory but may be faster.
    pub chunk_size_data: usize,

    /// Chunk size for centroid processing. Larger values use more memory but may be faster.
    pub chunk_size_centroids: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            init: InitMethod::KMeansPlusPlus,
            n_init: 10,
            max_iters: 300,
            tol: 1e-4,
            seed: 0,
            chunk_size_data: 51_200,
            chunk_size_centroids: 10_240,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the number of clusters
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the initialization strategy
    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = init;
        self
    }

    /// Set the number of restarts
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the data chunk size
    pub fn with_chunk_size_data(mut self, chunk_size: usize) -> Self {
        self.chunk_size_data = chunk_size;
        self
    }

    /// Set the centroid chunk size
    pub fn with_chunk_size_centroids(mut self, chunk_size: usize) -> Self {
        self.chunk_size_centroids = chunk_size;
        self
    }
}
