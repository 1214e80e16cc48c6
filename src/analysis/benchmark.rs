use super::insights::{generate_recommendations, InsightInputs};
use super::round1;
use crate::models::benchmark::{BenchmarkResult, PaletteOverlap, SiteAnalysis};
use crate::models::visual::ColorSwatch;
use std::collections::BTreeSet;

pub fn hex_set(palette: &[ColorSwatch]) -> BTreeSet<String> {
    palette.iter().map(|s| s.hex.clone()).collect()
}

/// |primary ∩ competitor| / |primary| × 100, one decimal.
/// Relative to the primary palette, so the measure is asymmetric.
pub fn palette_overlap(primary: &BTreeSet<String>, competitor: &BTreeSet<String>) -> f64 {
    if primary.is_empty() || competitor.is_empty() {
        return 0.0;
    }
    let shared = primary.intersection(competitor).count();
    round1(shared as f64 / primary.len() as f64 * 100.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Compose a benchmark from already-analysed sites. `competitors` keeps
/// input URL order, and every derived list follows it.
pub fn compose_benchmark(primary: SiteAnalysis, competitors: Vec<SiteAnalysis>) -> BenchmarkResult {
    let competitor_visual: Vec<f64> = competitors.iter().map(|c| c.visual.score).collect();
    let competitor_cognitive: Vec<f64> = competitors.iter().map(|c| c.cognitive.score).collect();
    let competitor_complexity: Vec<f64> = competitors
        .iter()
        .map(|c| c.cognitive.breakdown.complexity)
        .collect();

    let avg_visual = round1(mean(&competitor_visual));
    let avg_cognitive = round1(mean(&competitor_cognitive));
    let avg_complexity = round1(mean(&competitor_complexity));
    let complexity_delta = round1(primary.cognitive.breakdown.complexity - avg_complexity);

    let primary_hexes = hex_set(&primary.visual.breakdown.palette);
    let palette_overlaps: Vec<PaletteOverlap> = competitors
        .iter()
        .map(|c| PaletteOverlap {
            competitor: c.url.clone(),
            overlap_pct: palette_overlap(&primary_hexes, &hex_set(&c.visual.breakdown.palette)),
        })
        .collect();

    let primary_visual = primary.visual.score;
    let primary_cognitive = primary.cognitive.score;
    let insights = build_insights(
        primary_visual,
        primary_cognitive,
        avg_visual,
        avg_cognitive,
        &palette_overlaps,
        complexity_delta,
    );
    let recommendations = generate_recommendations(&InsightInputs {
        primary_visual,
        primary_cognitive,
        avg_visual,
        avg_cognitive,
        palette_overlaps: &palette_overlaps,
        complexity_delta,
    });

    let mut visual_scores = vec![primary_visual];
    visual_scores.extend(&competitor_visual);
    let mut cognitive_scores = vec![primary_cognitive];
    cognitive_scores.extend(&competitor_cognitive);

    let primary_url = primary.url.clone();
    let competitor_urls = competitors.iter().map(|c| c.url.clone()).collect();
    let mut sites = Vec::with_capacity(competitors.len() + 1);
    sites.push(primary);
    sites.extend(competitors);

    BenchmarkResult {
        primary_url,
        competitor_urls,
        visual_scores,
        cognitive_scores,
        avg_visual,
        avg_cognitive,
        palette_overlaps,
        complexity_delta,
        insights,
        recommendations,
        sites,
    }
}

fn build_insights(
    primary_visual: f64,
    primary_cognitive: f64,
    avg_visual: f64,
    avg_cognitive: f64,
    overlaps: &[PaletteOverlap],
    complexity_delta: f64,
) -> Vec<String> {
    let mut insights = vec![format!(
        "Your visual distinctiveness: {primary_visual:.1} vs industry average of {avg_visual:.1}"
    )];

    let side = if primary_cognitive >= avg_cognitive { "above" } else { "below" };
    insights.push(format!(
        "Your cognitive load: {primary_cognitive:.1} ({side} average of {avg_cognitive:.1})"
    ));

    for overlap in overlaps {
        insights.push(format!(
            "Your colour palette overlaps {:.1}% with {}",
            overlap.overlap_pct, overlap.competitor
        ));
    }

    if complexity_delta != 0.0 {
        let direction = if complexity_delta > 0.0 { "higher than" } else { "lower than" };
        insights.push(format!(
            "Your content complexity is {:.1} points {direction} competitor average",
            complexity_delta.abs()
        ));
    }

    insights
}
