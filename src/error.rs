use thiserror::Error;

/// Error types for the kselect-rs library
#[derive(Error, Debug)]
pub enum KSelectError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// A k-means configuration value other than k is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,

    /// Dimension mismatch between data and model
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// Blob generation parameters are unusable
    #[error("Invalid dataset parameters: {0}")]
    InvalidDataset(String),

    /// Cluster labels cannot be scored
    #[error("Invalid labels: {0}")]
    InvalidLabels(String),

    /// A range of candidate cluster counts is unusable for the metric
    #[error("Invalid k range: {0}")]
    InvalidRange(String),

    /// A chart has nothing drawable
    #[error("Invalid chart: {0}")]
    InvalidChart(String),

    /// Writing a chart or reading the dismissal failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
