//! # kselect-rs
//!
//! Choosing the number of clusters for k-means, compatible with ndarray.
//!
//! ## Features
//!
//! - **Blob generator**: seeded isotropic Gaussian blobs with known structure
//! - **k-means**: k-means++ seeding, seeded restarts, chunked assignment
//!   parallelized with rayon, bit-reproducible for a given seed
//! - **Elbow method**: inertia (WCSS) for a range of cluster counts
//! - **Silhouette analysis**: mean silhouette coefficient for a range of
//!   cluster counts (k >= 2)
//! - **Terminal charts**: line charts drawn on a character grid
//!
//! Nothing here picks a "best" k. The charts are meant to be read by a human.
//!
//! ## Example
//!
//! ```rust
//! use kselect_rs::{elbow_curve, make_blobs, silhouette_curve, BlobsConfig, KMeansConfig};
//!
//! let blobs = make_blobs(&BlobsConfig::default().with_n_samples(80)).unwrap();
//! let config = KMeansConfig::default().with_n_init(2);
//!
//! let elbow = elbow_curve(&blobs.points.view(), 1..=5, &config).unwrap();
//! assert_eq!(elbow.ks(), vec![1, 2, 3, 4, 5]);
//!
//! let silhouette = silhouette_curve(&blobs.points.view(), 2..=5, &config).unwrap();
//! assert!(silhouette.values().iter().all(|s| (-1.0..=1.0).contains(s)));
//! ```
//!
//! ## Showing the charts
//!
//! ```rust,no_run
//! use kselect_rs::{Experiment, TerminalViewer};
//!
//! let report = Experiment::default().run(&mut TerminalViewer::stdio()).unwrap();
//! println!("{:?}", report.silhouette.points());
//! ```

mod algorithm;
mod config;
mod datasets;
mod distance;
mod error;
mod kmeans;
pub mod metrics;
mod pipeline;
mod plot;
mod selection;

pub use config::{InitMethod, KMeansConfig};
pub use datasets::{make_blobs, Blobs, BlobsConfig, Centers};
pub use error::KSelectError;
pub use kmeans::KMeans;
pub use pipeline::{Experiment, Report};
pub use plot::{ChartViewer, LineChart, TerminalViewer};
pub use selection::{elbow_curve, silhouette_curve, Metric, MetricSeries};
