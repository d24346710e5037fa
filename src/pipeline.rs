use crate::config::KMeansConfig;
use crate::datasets::{make_blobs, BlobsConfig};
use crate::error::KSelectError;
use crate::plot::{ChartViewer, LineChart};
use crate::selection::{elbow_curve, silhouette_curve, MetricSeries};
use std::ops::RangeInclusive;

/// The fixed k-selection demonstration: blobs, elbow chart, silhouette chart.
#[derive(Debug, Clone)]
pub struct Experiment {
    /// Dataset to cluster
    pub blobs: BlobsConfig,

    /// k-means settings shared by every fit; `k` is overwritten per fit
    pub kmeans: KMeansConfig,

    /// Cluster counts for the elbow method
    pub elbow_ks: RangeInclusive<usize>,

    /// Cluster counts for silhouette analysis
    pub silhouette_ks: RangeInclusive<usize>,
}

impl Default for Experiment {
    /// 300 points over 4 blobs (seed 42), k-means++ with 300 iterations and
    /// 10 restarts (seed 0), elbow over k = 1..=10, silhouette over k = 2..=10.
    fn default() -> Self {
        Self {
            blobs: BlobsConfig::default(),
            kmeans: KMeansConfig::default(),
            elbow_ks: 1..=10,
            silhouette_ks: 2..=10,
        }
    }
}

/// Metric series produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub elbow: MetricSeries,
    pub silhouette: MetricSeries,
}

impl Experiment {
    /// Run every stage in order, showing each chart before the next stage starts.
    pub fn run<V>(&self, viewer: &mut V) -> Result<Report, KSelectError>
    where
        V: ChartViewer + ?Sized,
    {
        let blobs = make_blobs(&self.blobs)?;
        let data = blobs.points.view();

        let elbow = {
            let span = tracing::info_span!("elbow method");
            let _enter = span.enter();
            elbow_curve(&data, self.elbow_ks.clone(), &self.kmeans)?
        };
        viewer.show(&LineChart::from(&elbow))?;

        let silhouette = {
            let span = tracing::info_span!("silhouette analysis");
            let _enter = span.enter();
            silhouette_curve(&data, self.silhouette_ks.clone(), &self.kmeans)?
        };
        viewer.show(&LineChart::from(&silhouette))?;

        Ok(Report { elbow, silhouette })
    }
}
