use brandlens_lib::commands::analyze::{
    analyze_site, analyze_snapshot, recent_history, run_benchmark, run_benchmark_async, run_site_analysis,
};
use brandlens_lib::commands::provider::{DirectoryProvider, MemoryProvider, SnapshotProvider};
use brandlens_lib::commands::settings::{load_effective_settings, save_settings_to_disk, AnalysisSettings};
use brandlens_lib::error::{AnalysisError, RetrievalError};
use brandlens_lib::models::benchmark::RecommendationCategory;
use brandlens_lib::models::snapshot::SiteSnapshot;
use brandlens_lib::models::visual::BrandFlags;
use image::{DynamicImage, Rgb, RgbImage};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const PRIMARY: &str = "https://primary.example";
const RIVAL_A: &str = "https://rival-a.example";
const RIVAL_B: &str = "https://rival-b.example";

fn page_image(accent: [u8; 3], boxes: u32) -> DynamicImage {
    let img = RgbImage::from_fn(240, 160, |x, y| {
        let column = x / 40;
        let in_box = column < boxes && x % 40 >= 8 && x % 40 < 32 && (40..100).contains(&y);
        if in_box {
            Rgb(accent)
        } else if y < 20 {
            Rgb([30, 30, 30])
        } else {
            Rgb([255, 255, 255])
        }
    });
    DynamicImage::ImageRgb8(img)
}

fn simple_markup() -> String {
    r#"<html><head><title>Simple</title><script>track()</script></head><body>
        <nav>Home Pricing Blog</nav>
        <h1 style="font-family: Inter">Fast help for busy teams</h1>
        <p style="font-family: Georgia">We fix it fast. You get back to work.</p>
        <h2>Plans</h2>
        <p>Pick a plan. Start today.</p>
        <footer>Copyright</footer>
    </body></html>"#
        .to_string()
}

fn dense_markup() -> String {
    let long = "Comprehensive organisational transformation methodologies necessitate \
        considerable interdisciplinary collaboration. "
        .repeat(12);
    format!("<html><body><p>{long}</p><p>{long}</p></body></html>")
}

fn provider() -> MemoryProvider {
    MemoryProvider::new()
        .with(SiteSnapshot::new(PRIMARY, page_image([200, 20, 60], 4), simple_markup()))
        .with(SiteSnapshot::new(RIVAL_A, page_image([20, 90, 200], 2), dense_markup()))
        .with(SiteSnapshot::new(RIVAL_B, page_image([200, 20, 60], 5), simple_markup()))
}

fn workspace() -> (TempDir, String) {
    brandlens_lib::init_logging();
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace_path = temp_dir.path().to_string_lossy().to_string();
    (temp_dir, workspace_path)
}

fn competitors() -> Vec<String> {
    vec![RIVAL_A.to_string(), RIVAL_B.to_string()]
}

#[test]
fn single_site_analysis_is_bounded_and_recorded() {
    let (_tmp, workspace_path) = workspace();
    let provider = provider();

    let analysis = run_site_analysis(&workspace_path, &provider, PRIMARY, BrandFlags::default())
        .expect("analyse primary");

    assert!((0.0..=10.0).contains(&analysis.visual.score));
    assert!((0.0..=10.0).contains(&analysis.cognitive.score));
    assert!(!analysis.visual.summary.is_empty());
    assert_eq!(analysis.visual.breakdown.typography_count, 2);
    assert_eq!(analysis.cognitive.signals.heading_count, 2);
    assert_eq!(analysis.cognitive.signals.paragraph_count, 2);

    let palette = &analysis.visual.breakdown.palette;
    assert_eq!(analysis.visual.breakdown.colour_diversity, palette.len());
    let total: f64 = palette.iter().map(|s| s.proportion).sum();
    assert!((total - 1.0).abs() < 0.01, "palette proportions sum to {total}");
    assert!(palette.windows(2).all(|w| w[0].proportion >= w[1].proportion));

    let history = recent_history(&workspace_path).expect("load history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, PRIMARY);
    assert_eq!(history[0].visual_score, analysis.visual.score);
    assert_eq!(history[0].summary, analysis.visual.summary);
    assert_eq!(history[0].cognitive_score, analysis.cognitive.score);
}

#[test]
fn bare_host_is_normalised_before_capture() {
    let provider = provider();
    let analysis = analyze_site(
        &provider,
        "primary.example",
        &AnalysisSettings::default(),
        BrandFlags::default(),
        None,
    )
    .expect("analyse bare host");
    assert_eq!(analysis.url, PRIMARY);
}

#[test]
fn brand_flags_lower_the_visual_score() {
    let provider = provider();
    let settings = AnalysisSettings::default();
    let snapshot = provider.capture(PRIMARY).expect("capture");

    let assumed = analyze_snapshot(&snapshot, &settings, BrandFlags::default());
    let failed = analyze_snapshot(&snapshot, &settings, BrandFlags::all(false));
    let expected = ((assumed.visual.score - 3.0) * 10.0).round() / 10.0;
    assert!(failed.visual.score <= assumed.visual.score);
    assert!(failed.visual.score >= expected - 1e-9);
}

#[test]
fn seeded_clustering_is_reproducible() {
    let provider = provider();
    let settings = AnalysisSettings::default();
    let snapshot = provider.capture(RIVAL_A).expect("capture");

    let first = analyze_snapshot(&snapshot, &settings, BrandFlags::default());
    let second = analyze_snapshot(&snapshot, &settings, BrandFlags::default());
    assert_eq!(first.visual.breakdown.palette, second.visual.breakdown.palette);
    assert_eq!(first.visual.score, second.visual.score);
}

#[test]
fn benchmark_keeps_input_order_and_bounds() {
    let provider = provider();
    let mut progress = Vec::new();

    let result = run_benchmark(
        &provider,
        PRIMARY,
        &competitors(),
        &AnalysisSettings::default(),
        BrandFlags::default(),
        |p| progress.push((p.current, p.total, p.current_url)),
    )
    .expect("benchmark");

    assert_eq!(result.primary_url, PRIMARY);
    assert_eq!(result.competitor_urls, competitors());
    assert_eq!(result.visual_scores.len(), 3);
    assert_eq!(result.sites[1].url, RIVAL_A);
    assert_eq!(result.palette_overlaps.len(), 2);
    assert_eq!(result.palette_overlaps[0].competitor, RIVAL_A);
    assert!(result
        .palette_overlaps
        .iter()
        .all(|o| (0.0..=100.0).contains(&o.overlap_pct)));
    assert!(result.recommendations.len() <= 5);
    assert_eq!(result.recommendations[2].category, RecommendationCategory::PaletteOverlap);
    assert!(result.insights[0].starts_with("Your visual distinctiveness:"));

    let expected_avg = ((result.visual_scores[1] + result.visual_scores[2]) / 2.0 * 10.0).round() / 10.0;
    assert_eq!(result.avg_visual, expected_avg);

    assert_eq!(
        progress,
        vec![
            (1, 3, PRIMARY.to_string()),
            (2, 3, RIVAL_A.to_string()),
            (3, 3, RIVAL_B.to_string()),
        ]
    );
}

#[test]
fn dense_copy_scores_worse_on_complexity() {
    let provider = provider();
    let result = run_benchmark(
        &provider,
        RIVAL_A,
        &[PRIMARY.to_string()],
        &AnalysisSettings::default(),
        BrandFlags::default(),
        |_| {},
    )
    .expect("benchmark");

    let dense = &result.sites[0].cognitive;
    let simple = &result.sites[1].cognitive;
    assert!(dense.breakdown.complexity < simple.breakdown.complexity);
    assert!(result.complexity_delta < 0.0);
    assert!(dense.feedback.iter().any(|f| f == "High jargon usage detected."));
}

#[test]
fn zero_competitors_fall_back_to_zero_averages() {
    let provider = provider();
    let result = run_benchmark(
        &provider,
        PRIMARY,
        &[],
        &AnalysisSettings::default(),
        BrandFlags::default(),
        |_| {},
    )
    .expect("benchmark");

    assert_eq!(result.avg_visual, 0.0);
    assert_eq!(result.avg_cognitive, 0.0);
    assert!(result.palette_overlaps.is_empty());
    assert_eq!(
        result.complexity_delta,
        result.sites[0].cognitive.breakdown.complexity
    );
}

#[test]
fn one_missing_competitor_aborts_the_benchmark() {
    let provider = provider();
    let err = run_benchmark(
        &provider,
        PRIMARY,
        &[RIVAL_A.to_string(), "https://gone.example".to_string()],
        &AnalysisSettings::default(),
        BrandFlags::default(),
        |_| {},
    )
    .expect_err("missing snapshot should fail");

    assert!(matches!(
        err,
        AnalysisError::Retrieval(RetrievalError::NotFound(ref url)) if url == "https://gone.example"
    ));
}

#[tokio::test]
async fn parallel_benchmark_matches_sequential_order() {
    let provider = provider();
    let sequential = run_benchmark(
        &provider,
        PRIMARY,
        &competitors(),
        &AnalysisSettings::default(),
        BrandFlags::default(),
        |_| {},
    )
    .expect("sequential benchmark");

    let settings = AnalysisSettings {
        parallel_competitors: true,
        ..AnalysisSettings::default()
    };
    let shared: Arc<dyn SnapshotProvider> = Arc::new(provider);
    let parallel = run_benchmark_async(shared, PRIMARY.to_string(), competitors(), settings, BrandFlags::default())
        .await
        .expect("parallel benchmark");

    assert_eq!(parallel.competitor_urls, sequential.competitor_urls);
    assert_eq!(parallel.visual_scores, sequential.visual_scores);
    assert_eq!(parallel.cognitive_scores, sequential.cognitive_scores);
    assert_eq!(parallel.palette_overlaps, sequential.palette_overlaps);
    assert_eq!(parallel.insights, sequential.insights);
    assert_eq!(parallel.recommendations, sequential.recommendations);
}

#[tokio::test]
async fn async_benchmark_surfaces_retrieval_errors() {
    let shared: Arc<dyn SnapshotProvider> = Arc::new(provider());
    let settings = AnalysisSettings {
        parallel_competitors: true,
        ..AnalysisSettings::default()
    };
    let result = run_benchmark_async(
        shared,
        PRIMARY.to_string(),
        vec!["https://gone.example".to_string()],
        settings,
        BrandFlags::default(),
    )
    .await;
    assert!(matches!(result, Err(AnalysisError::Retrieval(_))));
}

#[test]
fn directory_provider_reads_offline_captures() {
    let (tmp, _workspace_path) = workspace();
    page_image([10, 120, 40], 3)
        .save(tmp.path().join("offline_example_landing.png"))
        .expect("write screenshot");
    std::fs::write(tmp.path().join("offline_example_landing.html"), simple_markup()).expect("write markup");

    let provider = DirectoryProvider::new(tmp.path());
    let analysis = analyze_site(
        &provider,
        "https://offline.example/landing",
        &AnalysisSettings::default(),
        BrandFlags::default(),
        None,
    )
    .expect("analyse offline capture");
    assert_eq!(analysis.visual.breakdown.typography_count, 2);

    let missing = provider.capture("https://offline.example/other");
    assert!(matches!(missing, Err(RetrievalError::NotFound(_))));
}

#[test]
fn corrupt_screenshot_is_a_decode_error() {
    let (tmp, _workspace_path) = workspace();
    std::fs::write(tmp.path().join("broken_example.png"), b"not a png").expect("write junk");
    std::fs::write(tmp.path().join("broken_example.html"), "<p>hi</p>").expect("write markup");

    let provider = DirectoryProvider::new(tmp.path());
    let result = provider.capture("https://broken.example");
    assert!(matches!(result, Err(RetrievalError::Decode { .. })));
}

#[test]
fn workspace_settings_drive_the_pipeline() {
    let (_tmp, workspace_path) = workspace();
    let saved = save_settings_to_disk(
        &workspace_path,
        json!({ "paletteClusters": 3, "historyLimit": 1, "clusterSeed": 9 }),
    )
    .expect("save settings");
    assert_eq!(saved["paletteClusters"], json!(3));
    assert_eq!(saved["canonicalSize"], json!(300));

    let settings = load_effective_settings(&workspace_path).expect("load settings");
    assert_eq!(settings.palette_clusters, 3);
    assert_eq!(settings.cluster_seed, 9);

    let provider = provider();
    let analysis = run_site_analysis(&workspace_path, &provider, RIVAL_A, BrandFlags::default())
        .expect("analyse rival");
    assert!(analysis.visual.breakdown.palette.len() <= 3);

    run_site_analysis(&workspace_path, &provider, PRIMARY, BrandFlags::default()).expect("analyse primary");
    let history = recent_history(&workspace_path).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, PRIMARY);
}
