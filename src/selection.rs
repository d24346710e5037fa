//! Evaluators for choosing k: the elbow method and silhouette analysis.
//!
//! Both sweep an inclusive range of cluster counts in increasing order, fit a
//! fresh [`KMeans`] per count from the same configuration template, and record
//! one scalar per count. Neither picks a "best" k.

use crate::config::KMeansConfig;
use crate::error::KSelectError;
use crate::kmeans::KMeans;
use crate::metrics::silhouette_score;
use ndarray::ArrayView2;
use std::ops::RangeInclusive;

/// The quantity recorded per cluster count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Within-cluster sum of squares (inertia)
    Wcss,

    /// Mean silhouette coefficient
    Silhouette,
}

impl Metric {
    /// Chart title for a series of this metric
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Wcss => "Elbow Method",
            Metric::Silhouette => "Silhouette Analysis",
        }
    }

    /// Axis label for values of this metric
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Wcss => "WCSS",
            Metric::Silhouette => "Silhouette Score",
        }
    }
}

/// An ordered sequence of (k, value) pairs for one metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    metric: Metric,
    points: Vec<(usize, f64)>,
}

impl MetricSeries {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The (k, value) pairs, by increasing k
    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    pub fn ks(&self) -> Vec<usize> {
        self.points.iter().map(|&(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn check_range(ks: &RangeInclusive<usize>, min_k: usize, metric: Metric) -> Result<(), KSelectError> {
    if ks.is_empty() {
        return Err(KSelectError::InvalidRange(format!(
            "{}..={} contains no cluster counts",
            ks.start(),
            ks.end()
        )));
    }
    if *ks.start() < min_k {
        return Err(KSelectError::InvalidRange(format!(
            "{} is undefined for k < {}, range starts at {}",
            metric.label(),
            min_k,
            ks.start()
        )));
    }
    Ok(())
}

fn fit(data: &ArrayView2<f64>, k: usize, template: &KMeansConfig) -> Result<KMeans, KSelectError> {
    let mut kmeans = KMeans::with_config(template.clone().with_k(k));
    kmeans.fit(data)?;
    Ok(kmeans)
}

/// Record the inertia of a k-means fit for every k in `ks`.
///
/// `ks` must start at 1 or above. The values are non-increasing in k for
/// any reasonable number of restarts.
pub fn elbow_curve(
    data: &ArrayView2<f64>,
    ks: RangeInclusive<usize>,
    template: &KMeansConfig,
) -> Result<MetricSeries, KSelectError> {
    check_range(&ks, 1, Metric::Wcss)?;

    let mut points = Vec::with_capacity(ks.clone().count());
    for k in ks {
        let kmeans = fit(data, k, template)?;
        let inertia = kmeans.inertia().ok_or(KSelectError::NotFitted)?;

        tracing::info!(k, inertia, n_iter = kmeans.n_iter(), "elbow");
        points.push((k, inertia));
    }

    Ok(MetricSeries {
        metric: Metric::Wcss,
        points,
    })
}

/// Record the mean silhouette coefficient of a k-means fit for every k in `ks`.
///
/// The silhouette is undefined for a single cluster, so `ks` must start at 2
/// or above.
pub fn silhouette_curve(
    data: &ArrayView2<f64>,
    ks: RangeInclusive<usize>,
    template: &KMeansConfig,
) -> Result<MetricSeries, KSelectError> {
    check_range(&ks, 2, Metric::Silhouette)?;

    let mut points = Vec::with_capacity(ks.clone().count());
    for k in ks {
        let kmeans = fit(data, k, template)?;
        let labels = kmeans.labels().ok_or(KSelectError::NotFitted)?;
        let score = silhouette_score(data, &labels.view())?;

        tracing::info!(k, score, n_iter = kmeans.n_iter(), "silhouette");
        points.push((k, score));
    }

    Ok(MetricSeries {
        metric: Metric::Silhouette,
        points,
    })
}
