use kselect_rs::metrics::{inertia, silhouette_score};
use kselect_rs::{
    elbow_curve, make_blobs, silhouette_curve, BlobsConfig, Centers, ChartViewer, Experiment,
    InitMethod, KMeans, KMeansConfig, KSelectError, LineChart, Metric, TerminalViewer,
};
use ndarray::{array, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Records chart titles and points instead of displaying them
#[derive(Default)]
struct Recorder {
    charts: Vec<LineChart>,
}

impl ChartViewer for Recorder {
    fn show(&mut self, chart: &LineChart) -> Result<(), KSelectError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

/// Four blobs far enough apart that every k-means run separates them
fn separated_blobs() -> Array2<f64> {
    let centers = array![[-8.0, -8.0], [-8.0, 8.0], [8.0, -8.0], [8.0, 8.0]];
    let config = BlobsConfig::default()
        .with_centers(Centers::Fixed(centers))
        .with_cluster_std(0.8);
    make_blobs(&config).unwrap().points
}

fn uniform_data(n: usize, d: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::random_using((n, d), Uniform::new(-1.0, 1.0), &mut rng)
}

// ============================================================================
// Data Generator
// ============================================================================

#[test]
fn test_blobs_reproducible() {
    let first = make_blobs(&BlobsConfig::default()).unwrap();
    let second = make_blobs(&BlobsConfig::default()).unwrap();

    assert_eq!(first.points.dim(), (300, 2));
    assert_eq!(first.points, second.points);
    assert_eq!(first.labels, second.labels);
}

// ============================================================================
// Elbow Evaluator
// ============================================================================

#[test]
fn test_elbow_series_length_and_order() {
    let blobs = make_blobs(&BlobsConfig::default()).unwrap();
    let series = elbow_curve(&blobs.points.view(), 1..=10, &KMeansConfig::default()).unwrap();

    assert_eq!(series.metric(), Metric::Wcss);
    assert_eq!(series.len(), 10);
    assert_eq!(series.ks(), (1..=10).collect::<Vec<_>>());

    let values = series.values();
    for (k, pair) in values.windows(2).enumerate() {
        assert!(
            pair[1] <= pair[0],
            "WCSS increased from k={} ({}) to k={} ({})",
            k + 1,
            pair[0],
            k + 2,
            pair[1]
        );
    }
}

#[test]
fn test_elbow_at_true_cluster_count() {
    let data = separated_blobs();
    let values = elbow_curve(&data.view(), 1..=6, &KMeansConfig::default())
        .unwrap()
        .values();

    // Large drops up to k=4, small ones after
    let drop_into_4 = values[2] - values[3];
    let drop_after_4 = values[3] - values[4];
    assert!(drop_into_4 > 10.0 * drop_after_4);
}

// ============================================================================
// Silhouette Evaluator
// ============================================================================

#[test]
fn test_silhouette_series_length_and_bounds() {
    let blobs = make_blobs(&BlobsConfig::default()).unwrap();
    let series =
        silhouette_curve(&blobs.points.view(), 2..=10, &KMeansConfig::default()).unwrap();

    assert_eq!(series.metric(), Metric::Silhouette);
    assert_eq!(series.len(), 9);
    assert_eq!(series.ks(), (2..=10).collect::<Vec<_>>());
    for &(k, score) in series.points() {
        assert!((-1.0..=1.0).contains(&score), "k={} score={}", k, score);
    }
}

#[test]
fn test_silhouette_peaks_near_true_k() {
    let blobs = make_blobs(&BlobsConfig::default()).unwrap();
    let series =
        silhouette_curve(&blobs.points.view(), 2..=10, &KMeansConfig::default()).unwrap();

    // Two of the four seed-42 blobs overlap, so k=3 scores about as well as k=4
    let &(best_k, _) = series
        .points()
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    assert!((3..=5).contains(&best_k), "silhouette peaked at k={}", best_k);
}

#[test]
fn test_silhouette_peaks_at_four_for_separated_blobs() {
    let data = separated_blobs();
    let series = silhouette_curve(&data.view(), 2..=10, &KMeansConfig::default()).unwrap();

    let &(best_k, best) = series
        .points()
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    assert_eq!(best_k, 4);
    assert!(best > 0.7);
}

#[test]
fn test_silhouette_excludes_k_one() {
    let blobs = make_blobs(&BlobsConfig::default()).unwrap();
    let result = silhouette_curve(&blobs.points.view(), 1..=10, &KMeansConfig::default());

    assert!(matches!(result, Err(KSelectError::InvalidRange(_))));
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[test]
fn test_pipeline_is_bit_reproducible() {
    let experiment = Experiment::default();

    let mut first_viewer = Recorder::default();
    let mut second_viewer = Recorder::default();
    let first = experiment.run(&mut first_viewer).unwrap();
    let second = experiment.run(&mut second_viewer).unwrap();

    let bits = |values: Vec<f64>| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(first.elbow.values()), bits(second.elbow.values()));
    assert_eq!(
        bits(first.silhouette.values()),
        bits(second.silhouette.values())
    );
    assert_eq!(first_viewer.charts, second_viewer.charts);
}

#[test]
fn test_pipeline_charts() {
    let mut recorder = Recorder::default();
    let report = Experiment::default().run(&mut recorder).unwrap();

    assert_eq!(recorder.charts.len(), 2);

    let elbow = &recorder.charts[0];
    assert_eq!(elbow.title, "Elbow Method");
    assert_eq!(elbow.x_label, "Number of clusters");
    assert_eq!(elbow.y_label, "WCSS");
    assert_eq!(elbow.points.len(), 10);
    assert_eq!(elbow.points[0].0, 1.0);

    let silhouette = &recorder.charts[1];
    assert_eq!(silhouette.title, "Silhouette Analysis");
    assert_eq!(silhouette.y_label, "Silhouette Score");
    assert_eq!(silhouette.points.len(), 9);
    assert_eq!(silhouette.points[0].0, 2.0);

    assert_eq!(report.elbow.len(), 10);
    assert_eq!(report.silhouette.len(), 9);
}

#[test]
fn test_pipeline_on_terminal_viewer() {
    let experiment = Experiment {
        blobs: BlobsConfig::default().with_n_samples(80),
        kmeans: KMeansConfig::default().with_n_init(2),
        elbow_ks: 1..=4,
        silhouette_ks: 2..=4,
    };
    let input: &[u8] = b"\n\n";
    let mut viewer = TerminalViewer::new(input, Vec::<u8>::new());

    experiment.run(&mut viewer).unwrap();

    let (_, output) = viewer.into_inner();
    let text = String::from_utf8(output).unwrap();
    let elbow_at = text.find("Elbow Method").unwrap();
    let silhouette_at = text.find("Silhouette Analysis").unwrap();
    assert!(elbow_at < silhouette_at);
    assert_eq!(text.matches("Press Enter to continue...").count(), 2);
}

// ============================================================================
// k-means
// ============================================================================

#[test]
fn test_kmeans_reproducibility_with_seed() {
    let data = uniform_data(500, 8, 3);
    let config = KMeansConfig::new(5).with_seed(12345);

    let mut kmeans1 = KMeans::with_config(config.clone());
    let mut kmeans2 = KMeans::with_config(config);

    kmeans1.train(&data.view()).unwrap();
    kmeans2.train(&data.view()).unwrap();

    assert_eq!(kmeans1.centroids(), kmeans2.centroids());
    assert_eq!(kmeans1.labels(), kmeans2.labels());
    assert_eq!(
        kmeans1.inertia().map(f64::to_bits),
        kmeans2.inertia().map(f64::to_bits)
    );
}

#[test]
fn test_k_equals_one() {
    let data = uniform_data(100, 3, 5);
    let mut kmeans = KMeans::with_config(KMeansConfig::new(1));
    kmeans.train(&data.view()).unwrap();

    // The single centroid is the mean of the data
    let mean = data.mean_axis(ndarray::Axis(0)).unwrap();
    let centroid = kmeans.centroids().unwrap().row(0).to_owned();
    for (c, m) in centroid.iter().zip(mean.iter()) {
        assert!((c - m).abs() < 1e-9);
    }
}

#[test]
fn test_k_equals_n_samples() {
    let data = uniform_data(12, 2, 8);
    let mut kmeans = KMeans::with_config(KMeansConfig::new(12));
    kmeans.train(&data.view()).unwrap();

    assert!(kmeans.inertia().unwrap() < 1e-9);
}

#[test]
fn test_insufficient_data_for_k() {
    let data = uniform_data(5, 2, 0);
    let mut kmeans = KMeans::with_config(KMeansConfig::new(10));

    let result = kmeans.train(&data.view());
    assert!(matches!(result, Err(KSelectError::InsufficientData(_))));
}

#[test]
fn test_small_chunk_sizes_match_large() {
    let data = uniform_data(300, 4, 21);
    let base = KMeansConfig::new(6).with_seed(2);

    let mut large = KMeans::with_config(base.clone());
    let mut small = KMeans::with_config(base.with_chunk_size_data(7).with_chunk_size_centroids(2));
    large.train(&data.view()).unwrap();
    small.train(&data.view()).unwrap();

    assert_eq!(large.labels(), small.labels());
    assert!((large.inertia().unwrap() - small.inertia().unwrap()).abs() < 1e-9);
}

#[test]
fn test_random_init_recovers_separated_blobs() {
    let data = separated_blobs();
    let config = KMeansConfig::new(4).with_init(InitMethod::Random);

    let mut kmeans = KMeans::with_config(config);
    let labels = kmeans.fit_predict(&data.view()).unwrap();

    let score = silhouette_score(&data.view(), &labels.view()).unwrap();
    assert!(score > 0.7);
}

#[test]
fn test_negative_tolerance_runs() {
    let data = uniform_data(100, 8, 4);
    let config = KMeansConfig::new(3).with_max_iters(5).with_tol(-1.0);

    let mut kmeans = KMeans::with_config(config);
    kmeans.train(&data.view()).unwrap();
    assert!(kmeans.n_iter() <= 5);
}

#[test]
fn test_high_tolerance_stops_after_first_iteration() {
    let data = uniform_data(100, 8, 4);
    let config = KMeansConfig::new(3).with_tol(1e10);

    let mut kmeans = KMeans::with_config(config);
    kmeans.train(&data.view()).unwrap();
    assert_eq!(kmeans.n_iter(), 1);
}

// ============================================================================
// Metric Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_silhouette_in_bounds(seed in any::<u64>(), k in 2usize..6) {
        let data = uniform_data(40, 2, seed);
        let config = KMeansConfig::new(k).with_seed(seed).with_n_init(2);

        let mut kmeans = KMeans::with_config(config);
        let labels = kmeans.fit_predict(&data.view()).unwrap();
        let score = silhouette_score(&data.view(), &labels.view()).unwrap();

        prop_assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_inertia_matches_recomputation(seed in any::<u64>(), k in 1usize..6) {
        let data = uniform_data(50, 3, seed);
        let mut kmeans = KMeans::with_config(KMeansConfig::new(k).with_seed(seed).with_n_init(1));
        kmeans.train(&data.view()).unwrap();

        let recomputed = inertia(
            &data.view(),
            &kmeans.labels().unwrap().view(),
            &kmeans.centroids().unwrap().view(),
        ).unwrap();
        prop_assert!((recomputed - kmeans.inertia().unwrap()).abs() <= 1e-9 * recomputed.max(1.0));
    }
}
