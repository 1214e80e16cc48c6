use crate::analysis::benchmark::compose_benchmark;
use crate::analysis::cognitive_score::score_cognitive;
use crate::analysis::edges::{count_visual_elements, EdgeThresholds};
use crate::analysis::palette::{canonicalize, extract_palette, PaletteOptions};
use crate::analysis::text::extract_text_signals;
use crate::analysis::typography::count_font_declarations;
use crate::analysis::visual_score::{build_breakdown, build_report};
use crate::analysis::whitespace::whitespace_ratio;
use crate::commands::db;
use crate::commands::provider::{capture_with_retry, normalize_url, SnapshotProvider};
use crate::commands::settings::{load_effective_settings, AnalysisSettings};
use crate::error::{AnalysisError, Result};
use crate::models::benchmark::{AnalysisProgress, BenchmarkResult, SiteAnalysis};
use crate::models::history::AnalysisRecord;
use crate::models::snapshot::SiteSnapshot;
use crate::models::visual::BrandFlags;
use image::imageops::FilterType;
use log::{debug, info};
use rusqlite::Connection;
use std::borrow::Cow;
use std::sync::Arc;

/// Run every extractor and combiner over one snapshot. Pure and infallible.
pub fn analyze_snapshot(snapshot: &SiteSnapshot, settings: &AnalysisSettings, flags: BrandFlags) -> SiteAnalysis {
    let start = std::time::Instant::now();

    let render = bounded_render(&snapshot.image, settings.max_render_width);
    let gray = render.to_luma8();
    let whitespace = whitespace_ratio(&gray, settings.whitespace_threshold);
    let elements = count_visual_elements(
        &gray,
        EdgeThresholds {
            low: settings.edge_low_threshold,
            high: settings.edge_high_threshold,
        },
    );

    let canonical = canonicalize(&snapshot.image, settings.canonical_size);
    let palette = extract_palette(
        &canonical,
        &PaletteOptions {
            clusters: settings.palette_clusters,
            restarts: settings.cluster_restarts,
            seed: settings.cluster_seed,
            ..PaletteOptions::default()
        },
    );
    let typography = count_font_declarations(&snapshot.markup);

    let visual = build_report(build_breakdown(whitespace, elements, typography, palette, flags));
    let cognitive = score_cognitive(&extract_text_signals(&snapshot.markup));

    debug!(
        "analysed {} in {}ms: visual={} cognitive={}",
        snapshot.url,
        start.elapsed().as_millis(),
        visual.score,
        cognitive.score
    );

    SiteAnalysis {
        url: snapshot.url.clone(),
        visual,
        cognitive,
    }
}

/// Single-site pipeline. When a history store is supplied, the result is
/// recorded there once both scores exist.
pub fn analyze_site(
    provider: &dyn SnapshotProvider,
    url: &str,
    settings: &AnalysisSettings,
    flags: BrandFlags,
    store: Option<&Connection>,
) -> Result<SiteAnalysis> {
    let url = normalize_url(url)?;
    info!("analysing {url}");
    let snapshot = capture_with_retry(provider, &url, settings.retrieval_attempts)?;
    let analysis = analyze_snapshot(&snapshot, settings, flags);

    if let Some(conn) = store {
        db::save_result(
            conn,
            &analysis.url,
            analysis.visual.score,
            &analysis.visual.summary,
            analysis.cognitive.score,
        )?;
    }

    Ok(analysis)
}

/// Workspace entry point: settings and history come from `<workspace>/.brandlens`.
pub fn run_site_analysis(
    workspace_path: &str,
    provider: &dyn SnapshotProvider,
    url: &str,
    flags: BrandFlags,
) -> Result<SiteAnalysis> {
    let settings = load_effective_settings(workspace_path)?;
    let conn = db::get_db_connection(workspace_path)?;
    analyze_site(provider, url, &settings, flags, Some(&conn))
}

pub fn recent_history(workspace_path: &str) -> Result<Vec<AnalysisRecord>> {
    let settings = load_effective_settings(workspace_path)?;
    let conn = db::get_db_connection(workspace_path)?;
    Ok(db::get_recent_results(&conn, settings.history_limit)?)
}

/// Sequential benchmark: primary first, then competitors in input order.
/// Brand flags apply to the primary only. Any failing URL aborts the run.
pub fn run_benchmark<F>(
    provider: &dyn SnapshotProvider,
    primary_url: &str,
    competitor_urls: &[String],
    settings: &AnalysisSettings,
    flags: BrandFlags,
    mut emit_progress: F,
) -> Result<BenchmarkResult>
where
    F: FnMut(AnalysisProgress),
{
    let start = std::time::Instant::now();
    let total = competitor_urls.len() + 1;

    emit_progress(AnalysisProgress {
        current: 1,
        total,
        current_url: primary_url.to_string(),
    });
    let primary = analyze_site(provider, primary_url, settings, flags, None)?;

    let mut competitors = Vec::with_capacity(competitor_urls.len());
    for (index, url) in competitor_urls.iter().enumerate() {
        emit_progress(AnalysisProgress {
            current: index + 2,
            total,
            current_url: url.clone(),
        });
        competitors.push(analyze_site(provider, url, settings, BrandFlags::default(), None)?);
    }

    let result = compose_benchmark(primary, competitors);
    info!(
        "benchmarked {} against {} competitor(s) in {}ms",
        result.primary_url,
        result.competitor_urls.len(),
        start.elapsed().as_millis()
    );
    Ok(result)
}

/// Runs the benchmark off the async executor. With `parallel_competitors`
/// set, competitor sites are analysed on separate blocking workers; results
/// are still collected in input order.
pub async fn run_benchmark_async(
    provider: Arc<dyn SnapshotProvider>,
    primary_url: String,
    competitor_urls: Vec<String>,
    settings: AnalysisSettings,
    flags: BrandFlags,
) -> Result<BenchmarkResult> {
    if !settings.parallel_competitors {
        return tokio::task::spawn_blocking(move || {
            run_benchmark(provider.as_ref(), &primary_url, &competitor_urls, &settings, flags, |_| {})
        })
        .await
        .map_err(|e| AnalysisError::Worker(e.to_string()))?;
    }

    let settings = Arc::new(settings);
    let primary = spawn_site(Arc::clone(&provider), primary_url, Arc::clone(&settings), flags);
    let handles: Vec<_> = competitor_urls
        .into_iter()
        .map(|url| spawn_site(Arc::clone(&provider), url, Arc::clone(&settings), BrandFlags::default()))
        .collect();

    let primary = join_site(primary).await?;
    let mut competitors = Vec::with_capacity(handles.len());
    for handle in handles {
        competitors.push(join_site(handle).await?);
    }

    Ok(compose_benchmark(primary, competitors))
}

fn spawn_site(
    provider: Arc<dyn SnapshotProvider>,
    url: String,
    settings: Arc<AnalysisSettings>,
    flags: BrandFlags,
) -> tokio::task::JoinHandle<Result<SiteAnalysis>> {
    tokio::task::spawn_blocking(move || analyze_site(provider.as_ref(), &url, &settings, flags, None))
}

async fn join_site(handle: tokio::task::JoinHandle<Result<SiteAnalysis>>) -> Result<SiteAnalysis> {
    handle
        .await
        .map_err(|e| AnalysisError::Worker(e.to_string()))?
}

/// Downscale wide captures so edge and whitespace passes stay bounded.
fn bounded_render(image: &image::DynamicImage, max_width: u32) -> Cow<'_, image::DynamicImage> {
    if max_width == 0 || image.width() <= max_width {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(image.resize(max_width, image.height(), FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn empty_capture_yields_empty_palette() {
        let snapshot = SiteSnapshot::new(
            "https://blank.example",
            DynamicImage::ImageRgb8(RgbImage::new(0, 0)),
            "<p>Nothing to see.</p>",
        );
        let analysis = analyze_snapshot(&snapshot, &AnalysisSettings::default(), BrandFlags::default());

        let breakdown = &analysis.visual.breakdown;
        assert!(breakdown.palette.is_empty());
        assert_eq!(breakdown.colour_diversity, 0);
        assert_eq!(breakdown.whitespace_ratio, 0.0);
        assert_eq!(breakdown.element_count, 0);
    }
}
