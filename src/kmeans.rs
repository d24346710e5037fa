use crate::algorithm::{kmeans_with_restarts, predict_labels};
use crate::config::KMeansConfig;
use crate::error::KSelectError;
use ndarray::{Array1, Array2, ArrayView2};

/// k-means clustering model compatible with ndarray.
///
/// Each fit runs `n_init` seeded restarts (k-means++ seeding by default) and
/// keeps the one with the lowest inertia. The API follows scikit-learn:
/// `fit()`, `predict()`, `fit_predict()`, plus the FAISS-style `train()`.
///
/// # Example
///
/// ```
/// use kselect_rs::{KMeans, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0, 0.0], [0.5, 0.2], [10.0, 10.0], [10.2, 9.7]];
///
/// let mut kmeans = KMeans::with_config(KMeansConfig::new(2).with_seed(0));
/// kmeans.fit(&data.view()).unwrap();
///
/// let labels = kmeans.predict(&data.view()).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// assert!(kmeans.inertia().unwrap() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features (dimensions)
    d: usize,

    /// Trained centroids (None if not yet fitted)
    centroids: Option<Array2<f64>>,

    /// Assignments of the training data
    labels: Option<Array1<usize>>,

    /// Within-cluster sum of squares of the training data
    inertia: Option<f64>,

    /// Lloyd iterations of the winning run
    n_iter: usize,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    ///
    /// # Arguments
    ///
    /// * `d` - Number of features (dimensions) in the data
    /// * `k` - Number of clusters. A `k` of 0 is reported by `train()`.
    pub fn new(d: usize, k: usize) -> Self {
        Self {
            config: KMeansConfig::new(k),
            d,
            centroids: None,
            labels: None,
            inertia: None,
            n_iter: 0,
        }
    }

    /// Create a new KMeans instance with custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            d: 0, // Will be set on first train call
            config,
            centroids: None,
            labels: None,
            inertia: None,
            n_iter: 0,
        }
    }

    /// Train the k-means model on the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - k is 0
    /// - Number of samples is less than k
    /// - Data dimensions don't match (for subsequent calls)
    /// - The configuration is unusable (zero restarts or chunk sizes)
    pub fn train(&mut self, data: &ArrayView2<f64>) -> Result<(), KSelectError> {
        let n_features = data.ncols();

        // Set dimensions on first call, validate on subsequent calls
        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(KSelectError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let result = kmeans_with_restarts(data, &self.config)?;

        self.centroids = Some(result.centroids);
        self.labels = Some(result.labels);
        self.inertia = Some(result.inertia);
        self.n_iter = result.n_iterations;
        Ok(())
    }

    /// Fit the model to the data. Equivalent to `train()`.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self, KSelectError> {
        self.train(data)?;
        Ok(self)
    }

    /// Predict cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - Data dimensions don't match the training data
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KSelectError> {
        let centroids = self.centroids.as_ref().ok_or(KSelectError::NotFitted)?;

        let n_features = data.ncols();
        if n_features != self.d {
            return Err(KSelectError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let labels = predict_labels(
            data,
            &centroids.view(),
            self.config.chunk_size_data,
            self.config.chunk_size_centroids,
        );

        Ok(labels)
    }

    /// Fit the model and return the cluster assignments of the training data.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KSelectError> {
        self.train(data)?;
        self.labels.clone().ok_or(KSelectError::NotFitted)
    }

    /// Get the centroids of the fitted model.
    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.centroids.as_ref()
    }

    /// Get the cluster assignments of the training data.
    pub fn labels(&self) -> Option<&Array1<usize>> {
        self.labels.as_ref()
    }

    /// Get the within-cluster sum of squared distances of the training data.
    pub fn inertia(&self) -> Option<f64> {
        self.inertia
    }

    /// Get the number of Lloyd iterations run by the kept restart.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
